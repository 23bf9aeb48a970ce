//! The `filesearch` utility
//!
//! Substring search over directory entries, optionally recursive and
//! optionally opening each match with the desktop viewer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Recursion guard for `-r`
const MAX_DEPTH: usize = 64;

/// Search the current directory for entries whose name contains `term`,
/// print each match, and optionally open it with `xdg-open`.
pub fn run(term: &str, recursive: bool, open: bool) -> io::Result<()> {
    let matches = if recursive {
        let mut found = Vec::new();
        walk(Path::new("."), term, 0, &mut found)?;
        found
    } else {
        scan(Path::new("."), term)?
    };

    for path in &matches {
        println!("{}", path.display());
        if open {
            open_viewer(path);
        }
    }
    Ok(())
}

/// Matching entry names of a single directory
fn scan(dir: &Path, term: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        if name.to_string_lossy().contains(term) {
            found.push(PathBuf::from(name));
        }
    }
    Ok(found)
}

/// Depth-guarded recursive search; unreadable subdirectories are skipped
fn walk(dir: &Path, term: &str, depth: usize, found: &mut Vec<PathBuf>) -> io::Result<()> {
    if depth >= MAX_DEPTH {
        return Ok(());
    }
    for entry in fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let path = dir.join(&name);
        if name.to_string_lossy().contains(term) {
            found.push(path.clone());
        }
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            let _ = walk(&path, term, depth + 1, found);
        }
    }
    Ok(())
}

fn open_viewer(path: &Path) {
    match std::process::Command::new("xdg-open").arg(path).status() {
        Ok(_) => {}
        Err(err) => eprintln!("filesearch: xdg-open: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn sorted(mut paths: Vec<PathBuf>) -> Vec<String> {
        paths.sort();
        paths
            .into_iter()
            .map(|p| p.display().to_string())
            .collect()
    }

    #[test]
    fn scan_matches_by_substring() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("notebook.md")).unwrap();
        File::create(dir.path().join("unrelated.rs")).unwrap();

        let found = scan(dir.path(), "note").unwrap();
        assert_eq!(sorted(found), vec!["notebook.md", "notes.txt"]);
    }

    #[test]
    fn scan_does_not_descend() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("match.txt")).unwrap();

        let found = scan(dir.path(), "match").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn walk_finds_nested_matches_with_full_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a").join("b")).unwrap();
        File::create(dir.path().join("hit.txt")).unwrap();
        File::create(dir.path().join("a").join("b").join("hit.log")).unwrap();

        let mut found = Vec::new();
        walk(dir.path(), "hit", 0, &mut found).unwrap();
        let root = dir.path().display().to_string();
        assert_eq!(
            sorted(found),
            vec![
                format!("{}/a/b/hit.log", root),
                format!("{}/hit.txt", root),
            ]
        );
    }

    #[test]
    fn walk_matches_directory_names_too() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("matching_dir")).unwrap();

        let mut found = Vec::new();
        walk(dir.path(), "matching", 0, &mut found).unwrap();
        assert_eq!(found.len(), 1);
    }
}
