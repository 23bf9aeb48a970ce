//! The shell session
//!
//! `Shell` owns everything that lives across input lines: the directory
//! history, the undo log, the PATH resolver, and the background job table.
//! `execute` drives one line through lex → parse → built-in intercept →
//! process executor.

use crate::builtins;
use crate::executor;
use crate::history::{DirectoryHistory, HistoryError, UndoLog};
use crate::jobs::JobTable;
use crate::lexer;
use crate::parser::{self, ParseError};
use crate::resolver::ExecutableResolver;
use std::env;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Navigation(#[from] builtins::NavigationError),
    #[error("{0}")]
    History(#[from] HistoryError),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("failed to spawn pipeline: {0}")]
    Spawn(nix::Error),
}

/// What the driver loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Session state, owned for the lifetime of the shell
pub struct Shell {
    pub(crate) history: DirectoryHistory,
    pub(crate) undo: UndoLog,
    resolver: ExecutableResolver,
    jobs: JobTable,
    last_status: i32,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            history: DirectoryHistory::new(),
            undo: UndoLog::default(),
            resolver: ExecutableResolver::new(),
            jobs: JobTable::new(),
            last_status: 0,
        }
    }

    /// Execute one input line
    pub fn execute(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let tokens = lexer::lex(line.trim()).map_err(ParseError::from)?;
        if tokens.is_empty() {
            return Ok(Outcome::Continue);
        }
        let pipeline = parser::parse(tokens)?;

        // Built-ins run in-process and never inside a multi-stage pipeline
        if pipeline.stages.len() == 1 {
            if let Some(result) = builtins::try_dispatch(self, &pipeline.stages[0]) {
                return result;
            }
        }

        let status = executor::run(&pipeline, &mut self.resolver, &mut self.jobs)
            .map_err(ShellError::Spawn)?;
        self.last_status = status;
        Ok(Outcome::Continue)
    }

    /// Exit status of the most recent foreground pipeline
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn has_jobs(&self) -> bool {
        !self.jobs.is_empty()
    }

    /// Collect finished background children without blocking
    pub fn reap_jobs(&mut self) {
        self.jobs.reap();
    }

    /// The interactive prompt: `user@host:cwd flint$ `
    pub fn prompt(&self) -> String {
        let user = env::var("USER").unwrap_or_else(|_| "user".to_string());
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_string());
        let cwd = env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        format!("{}@{}:{} flint$ ", user, host, cwd)
    }
}
