// src/shell.rs
use crate::config::Config;
use crate::error::Result;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::debug;

/// What the interactive loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A child the shell launched but does not wait for: a background command
/// or the reader side of a pipeline.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: usize,
    pub pid: Pid,
    pub command: String,
}

#[derive(Debug, Default)]
pub struct JobTable {
    jobs: Vec<Job>,
    counter: usize,
}

impl JobTable {
    /// Record a running child, returns its job id
    pub fn track(&mut self, pid: Pid, command: String) -> usize {
        self.counter += 1;
        let id = self.counter;
        self.jobs.push(Job { id, pid, command });
        id
    }

    /// Non-blocking sweep. Terminated children are reaped and dropped from
    /// the table; the finished jobs are returned.
    pub fn reap(&mut self) -> Vec<Job> {
        let mut done = Vec::new();
        self.jobs.retain(|job| {
            match waitpid(job.pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) | Err(Errno::EINTR) => true,
                Ok(status) => match crate::executor::launch::exit_code(status) {
                    Some(code) => {
                        debug!(job = job.id, pid = job.pid.as_raw(), code, command = %job.command, "job finished");
                        done.push(job.clone());
                        false
                    }
                    None => true,
                },
                // ECHILD: someone else already reaped it
                Err(_) => {
                    done.push(job.clone());
                    false
                }
            }
        });
        done
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

pub struct Shell {
    pub config: Config,
    pub jobs: JobTable,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Shell { config, jobs: JobTable::default() }
    }

    /// Classify and run one line. Blank lines are a no-op.
    pub fn eval(&mut self, input: &str) -> Result<Flow> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }

        let cmd = crate::parser::parse(input)?;
        debug!(?cmd, "dispatch");
        crate::executor::execute(self, cmd)
    }

    pub fn build_prompt(&self) -> String {
        self.config.prompt(std::env::var("PS1").ok())
    }
}
