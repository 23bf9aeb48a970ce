//! Background job table
//!
//! A backgrounded pipeline hands its child pids to the table and the prompt
//! loop drains them with non-blocking waits, so finished children never
//! linger as zombies and running ones never block the prompt.

use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

struct Job {
    id: usize,
    pids: Vec<Pid>,
    command: String,
    last_status: i32,
}

/// Table of live background jobs
pub struct JobTable {
    jobs: Vec<Job>,
    next_id: usize,
}

impl JobTable {
    pub fn new() -> Self {
        JobTable {
            jobs: Vec::new(),
            next_id: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Register a backgrounded pipeline's children and announce the job
    pub fn register(&mut self, pids: Vec<Pid>, command: String) {
        let id = self.next_id;
        self.next_id += 1;

        // Announce like an interactive shell does
        if let Some(pid) = pids.last() {
            eprintln!("[{}] {}", id, pid);
        }

        self.jobs.push(Job {
            id,
            pids,
            command,
            last_status: 0,
        });
    }

    /// Collect finished children without blocking; announce finished jobs
    pub fn reap(&mut self) {
        for job in &mut self.jobs {
            let last_status = &mut job.last_status;
            job.pids.retain(|&pid| {
                match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
                    Ok(WaitStatus::StillAlive) => true,
                    Ok(WaitStatus::Exited(_, code)) => {
                        *last_status = code;
                        false
                    }
                    Ok(WaitStatus::Signaled(_, signal, _)) => {
                        *last_status = 128 + signal as i32;
                        false
                    }
                    Ok(_) => true,
                    // Already collected or gone
                    Err(_) => false,
                }
            });
        }

        self.jobs.retain(|job| {
            if !job.pids.is_empty() {
                return true;
            }
            if job.last_status == 0 {
                eprintln!("[{}]\tDone\t{}", job.id, job.command);
            } else {
                eprintln!("[{}]\tExit {}\t{}", job.id, job.last_status, job.command);
            }
            false
        });
    }
}
