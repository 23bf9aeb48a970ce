//! Process executor: turns a parsed pipeline into running children
//!
//! For `N` stages the executor creates `N-1` pipes, forks one child per
//! stage, and wires each child's stdin/stdout to the adjacent pipe ends
//! unless an explicit file redirection wins. Foreground pipelines are
//! waited for synchronously; background pipelines are handed to the job
//! table and reaped from the prompt loop.

use crate::ast::{Command, Pipeline};
use crate::jobs::JobTable;
use crate::resolver::ExecutableResolver;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, ForkResult};
use std::convert::Infallible;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd};
use thiserror::Error;

/// Failure inside a forked child, reported on its stderr before `_exit`
#[derive(Error, Debug)]
enum StageError {
    #[error("command not found")]
    NotFound,
    #[error("{path}: {source}")]
    Redirect { path: String, source: io::Error },
    #[error("{0}")]
    Sys(#[from] nix::Error),
    #[error("invalid command name")]
    BadName(#[from] std::ffi::NulError),
}

impl StageError {
    fn exit_code(&self) -> i32 {
        match self {
            StageError::NotFound => 127,
            _ => 126,
        }
    }
}

/// Run a pipeline to completion (foreground) or hand it to the job table
/// (background). Returns the exit status of the last stage, or 0 for a
/// backgrounded pipeline.
pub fn run(
    pipeline: &Pipeline,
    resolver: &mut ExecutableResolver,
    jobs: &mut JobTable,
) -> nix::Result<i32> {
    let stage_count = pipeline.stages.len();

    // One pipe between each pair of adjacent stages
    let mut pipes: Vec<(OwnedFd, OwnedFd)> = Vec::with_capacity(stage_count.saturating_sub(1));
    for _ in 1..stage_count {
        let (read_fd, write_fd) = unistd::pipe()?;
        pipes.push(unsafe { (OwnedFd::from_raw_fd(read_fd), OwnedFd::from_raw_fd(write_fd)) });
    }

    let mut children = Vec::with_capacity(stage_count);
    for (index, stage) in pipeline.stages.iter().enumerate() {
        match unsafe { unistd::fork() }? {
            ForkResult::Child => {
                exec_stage(stage, &pipes, index, stage_count, pipeline.background, resolver)
            }
            ForkResult::Parent { child } => children.push(child),
        }
    }

    // The parent holds no pipe ends once every child is spawned; keeping
    // them open would stop downstream stages from ever seeing EOF.
    drop(pipes);

    if pipeline.background {
        jobs.register(children, pipeline.to_string());
        return Ok(0);
    }

    let mut status = 0;
    for &pid in &children {
        // The loop ends on the last stage, whose status is the pipeline's
        status = match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => code,
            Ok(WaitStatus::Signaled(_, signal, _)) => 128 + signal as i32,
            Ok(_) => status,
            Err(_) => status,
        };
    }
    Ok(status)
}

/// Child side: wire descriptors, close every pipe end, and exec. Never
/// returns; any failure is printed to stderr and turned into an exit code.
fn exec_stage(
    stage: &Command,
    pipes: &[(OwnedFd, OwnedFd)],
    index: usize,
    stage_count: usize,
    background: bool,
    resolver: &mut ExecutableResolver,
) -> ! {
    let err = match wire_and_exec(stage, pipes, index, stage_count, background, resolver) {
        Err(err) => err,
        Ok(never) => match never {},
    };
    let _ = writeln!(io::stderr(), "flint: {}: {}", stage.name, err);
    unsafe { libc::_exit(err.exit_code() as libc::c_int) }
}

/// dup2 an opened file onto a standard descriptor and drop the extra fd
fn redirect_to(file: File, stdio_fd: libc::c_int) -> Result<(), StageError> {
    let fd = file.into_raw_fd();
    unistd::dup2(fd, stdio_fd)?;
    unistd::close(fd)?;
    Ok(())
}

fn open_for_redirect(path: &str, append: bool) -> Result<File, StageError> {
    let mut options = OpenOptions::new();
    if append {
        options.append(true).create(true);
    } else {
        options.write(true).create(true).truncate(true);
    }
    options.open(path).map_err(|source| StageError::Redirect {
        path: path.to_string(),
        source,
    })
}

fn wire_and_exec(
    stage: &Command,
    pipes: &[(OwnedFd, OwnedFd)],
    index: usize,
    stage_count: usize,
    background: bool,
    resolver: &mut ExecutableResolver,
) -> Result<Infallible, StageError> {
    let is_first = index == 0;
    let is_last = index + 1 == stage_count;

    // Stdin: an explicit `< file` beats the upstream pipe; a detached
    // pipeline's first stage reads from /dev/null instead of the terminal
    if let Some(path) = &stage.redirects.stdin {
        let file = File::open(path).map_err(|source| StageError::Redirect {
            path: path.clone(),
            source,
        })?;
        redirect_to(file, libc::STDIN_FILENO)?;
    } else if !is_first {
        unistd::dup2(pipes[index - 1].0.as_raw_fd(), libc::STDIN_FILENO)?;
    } else if background {
        let file = File::open("/dev/null").map_err(|source| StageError::Redirect {
            path: "/dev/null".to_string(),
            source,
        })?;
        redirect_to(file, libc::STDIN_FILENO)?;
    }

    // Stdout: an explicit `>`/`>>` beats the downstream pipe; a detached
    // pipeline's last stage writes to /dev/null
    if let Some(path) = &stage.redirects.stdout {
        redirect_to(open_for_redirect(path, false)?, libc::STDOUT_FILENO)?;
    } else if let Some(path) = &stage.redirects.stdout_append {
        redirect_to(open_for_redirect(path, true)?, libc::STDOUT_FILENO)?;
    } else if !is_last {
        unistd::dup2(pipes[index].1.as_raw_fd(), libc::STDOUT_FILENO)?;
    } else if background {
        redirect_to(open_for_redirect("/dev/null", false)?, libc::STDOUT_FILENO)?;
    }

    // A detached stage holds no terminal descriptors at all
    if background {
        redirect_to(open_for_redirect("/dev/null", false)?, libc::STDERR_FILENO)?;
    }

    // Close every pipe end this child inherited, including the unused ends
    // of its own adjacent pipes
    for (read_end, write_end) in pipes {
        let _ = unistd::close(read_end.as_raw_fd());
        let _ = unistd::close(write_end.as_raw_fd());
    }

    let program = resolver
        .resolve(&stage.name)
        .ok_or(StageError::NotFound)?;

    let path = {
        use std::os::unix::ffi::OsStrExt;
        CString::new(program.as_os_str().as_bytes())?
    };
    let mut argv = Vec::with_capacity(stage.args.len() + 1);
    argv.push(CString::new(stage.name.as_str())?);
    for arg in &stage.args {
        argv.push(CString::new(arg.as_str())?);
    }

    unistd::execv(&path, &argv)?;
    unreachable!()
}
