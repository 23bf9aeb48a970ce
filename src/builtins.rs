//! Built-in commands
//!
//! Built-ins run in-process against the session state; they are intercepted
//! before any child is forked and only for single-stage pipelines. `cd` and
//! `take` feed the directory history and the undo log; `cdh` and `ctrlz`
//! consume them.

use crate::ast::Command;
use crate::history::UndoEntry;
use crate::search;
use crate::shell::{Outcome, Shell, ShellError};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("cd: {path}: {source}")]
    ChangeDir { path: String, source: io::Error },
    #[error("take: {path}: {source}")]
    CreateDir { path: String, source: io::Error },
    #[error("ctrlz: {path}: {source}")]
    RemoveDir { path: String, source: io::Error },
}

/// Run `command` as a built-in if its name is one; `None` means the caller
/// should launch it as an external program instead.
pub(crate) fn try_dispatch(
    shell: &mut Shell,
    command: &Command,
) -> Option<Result<Outcome, ShellError>> {
    let result = match command.name.as_str() {
        "exit" => return Some(Ok(Outcome::Exit)),
        "cd" => cd(shell, &command.args),
        "cdh" => cdh(shell),
        "take" => take(shell, &command.args),
        "ctrlz" => ctrlz(shell),
        "filesearch" => filesearch(&command.args),
        "joker" => joker(),
        "poet" => poet(),
        _ => return None,
    };
    Some(result.map(|_| Outcome::Continue))
}

fn expand_tilde(arg: &str) -> PathBuf {
    if arg == "~" || arg.starts_with("~/") {
        if let Some(home) = env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            if let Some(rest) = arg.strip_prefix("~/") {
                path.push(rest);
            }
            return path;
        }
    }
    PathBuf::from(arg)
}

/// `cd <path>`: change directory, remember where we were
fn cd(shell: &mut Shell, args: &[String]) -> Result<(), ShellError> {
    let target = match args.first() {
        Some(arg) => expand_tilde(arg),
        None => PathBuf::from(env::var_os("HOME").unwrap_or_default()),
    };

    let previous = env::current_dir()?;
    env::set_current_dir(&target).map_err(|source| NavigationError::ChangeDir {
        path: target.display().to_string(),
        source,
    })?;

    // Snapshot only after the chdir succeeded; a failed cd must leave both
    // the history and the undo log untouched
    shell.undo.record(UndoEntry::DirectoryChange {
        previous_path: previous,
        previous_history: shell.history.clone(),
    });
    shell.history.push(env::current_dir()?);
    Ok(())
}

/// `cdh`: list remembered directories and chdir to the chosen one
fn cdh(shell: &mut Shell) -> Result<(), ShellError> {
    let listing = shell.history.listing();
    if listing.is_empty() {
        println!("cdh: no directories remembered yet, cd somewhere first");
        return Ok(());
    }

    for line in &listing {
        println!("{}\t{}) {}", line.letter, line.number, line.path.display());
    }
    print!("Select directory by letter or number: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let selection = input.trim();

    let target = shell.history.select(selection)?.to_path_buf();
    env::set_current_dir(&target).map_err(|source| NavigationError::ChangeDir {
        path: target.display().to_string(),
        source,
    })?;
    Ok(())
}

/// `take <a/b/c>`: create-and-enter each path segment in turn
fn take(shell: &mut Shell, args: &[String]) -> Result<(), ShellError> {
    let arg = match args.first() {
        Some(arg) => arg,
        None => {
            eprintln!("usage: take <dir[/dir...]>");
            return Ok(());
        }
    };

    let mut created: Option<PathBuf> = None;
    for segment in arg.split('/').filter(|s| !s.is_empty()) {
        let dir = env::current_dir()?.join(segment);
        if !dir.is_dir() {
            fs::create_dir(&dir).map_err(|source| NavigationError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;
            created = Some(dir.clone());
        }
        env::set_current_dir(&dir).map_err(|source| NavigationError::ChangeDir {
            path: dir.display().to_string(),
            source,
        })?;
        shell.history.push(env::current_dir()?);
    }

    if let Some(path) = created {
        shell.undo.record(UndoEntry::DirectoryCreated { path });
    }
    Ok(())
}

/// `ctrlz`: reverse the last mutating navigation built-in
fn ctrlz(shell: &mut Shell) -> Result<(), ShellError> {
    let entry = match shell.undo.take() {
        Some(entry) => entry,
        None => {
            println!("ctrlz: nothing to undo");
            return Ok(());
        }
    };

    match entry {
        UndoEntry::DirectoryChange {
            previous_path,
            previous_history,
        } => {
            if let Err(source) = env::set_current_dir(&previous_path) {
                let err = NavigationError::ChangeDir {
                    path: previous_path.display().to_string(),
                    source,
                };
                // Keep the entry so the state is unchanged on failure
                shell.undo.record(UndoEntry::DirectoryChange {
                    previous_path,
                    previous_history,
                });
                return Err(err.into());
            }
            shell.history = previous_history;
        }
        UndoEntry::DirectoryCreated { path } => {
            if let Err(source) = fs::remove_dir(&path) {
                let err = NavigationError::RemoveDir {
                    path: path.display().to_string(),
                    source,
                };
                shell.undo.record(UndoEntry::DirectoryCreated { path });
                return Err(err.into());
            }
        }
    }
    Ok(())
}

/// `filesearch [-r] [-o] <term>`
fn filesearch(args: &[String]) -> Result<(), ShellError> {
    let mut recursive = false;
    let mut open = false;
    let mut term: Option<&str> = None;

    for arg in args {
        match arg.as_str() {
            "-r" => recursive = true,
            "-o" => open = true,
            other if term.is_none() => term = Some(other),
            _ => {
                term = None;
                break;
            }
        }
    }

    match term {
        Some(term) => {
            search::run(term, recursive, open)?;
            Ok(())
        }
        None => {
            eprintln!("usage: filesearch [-r] [-o] <term>");
            Ok(())
        }
    }
}

// Every 15 minutes: fetch a dad joke, notify-send it on the user's display
const JOKER_SCRIPT: &str = concat!(
    "crontab -l | { cat; echo \"*/15 * * * * XDG_RUNTIME_DIR=/run/user/$(id -u) ",
    "/usr/bin/notify-send \\\"\\$(curl -s https://icanhazdadjoke.com)\\\"\"; } | crontab -"
);

/// `joker`: schedule a recurring dad-joke notification via crontab
fn joker() -> Result<(), ShellError> {
    let status = std::process::Command::new("sh")
        .arg("-c")
        .arg(JOKER_SCRIPT)
        .status()?;
    if status.success() {
        println!("joker: a dad joke will knock every 15 minutes");
    } else {
        eprintln!("joker: crontab update failed");
    }
    Ok(())
}

/// `poet`: print one of the poems under ./poems
fn poet() -> Result<(), ShellError> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let pick = nanos as u64 % 10 + 1;
    let path = format!("poems/{}.txt", pick);
    let text = fs::read_to_string(&path)
        .map_err(|source| io::Error::new(source.kind(), format!("poet: {}: {}", path, source)))?;
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}
