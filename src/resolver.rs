//! Executable resolution through the search path
//!
//! Resolves a bare command name to the first matching executable on `PATH`,
//! caching lookups. A name containing `/` is taken as an explicit path and
//! only checked for being an executable file.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Resolves command names to executable paths
pub struct ExecutableResolver {
    /// Parsed PATH directories
    path_dirs: Vec<PathBuf>,
    /// Cached lookup results
    cache: HashMap<String, Option<PathBuf>>,
}

impl Default for ExecutableResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutableResolver {
    /// Create a resolver from the `PATH` environment variable
    pub fn new() -> Self {
        let path_dirs = env::var("PATH")
            .unwrap_or_default()
            .split(':')
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .collect();

        ExecutableResolver {
            path_dirs,
            cache: HashMap::new(),
        }
    }

    /// Create a resolver with a custom search path (for testing)
    #[cfg(test)]
    pub fn with_path(path_dirs: Vec<PathBuf>) -> Self {
        ExecutableResolver {
            path_dirs,
            cache: HashMap::new(),
        }
    }

    /// Resolve a command name to the full path of its executable
    pub fn resolve(&mut self, name: &str) -> Option<PathBuf> {
        // Explicit paths bypass the search
        if name.contains('/') {
            let path = PathBuf::from(name);
            if is_executable_file(&path) {
                return Some(path);
            }
            return None;
        }

        if let Some(cached) = self.cache.get(name) {
            return cached.clone();
        }

        let found = self
            .path_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable_file(candidate));
        self.cache.insert(name.to_string(), found.clone());
        found
    }
}

/// Whether a path names a regular file with an execute bit set
fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match path.metadata() {
            Ok(metadata) => metadata.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }
    #[cfg(not(unix))]
    {
        true
    }
}
