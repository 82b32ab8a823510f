// src/executor/redirect.rs
//
// Redirection manager. The shell rebinds its own stdin/stdout slot, launches
// the child so it inherits the substitution, then puts the slot back.

use super::launch::{self, Launch};
use crate::error::{Result, ShellError};
use nix::fcntl::{fcntl, FcntlArg};
use nix::unistd::dup2;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
}

impl Stream {
    fn fd(self) -> RawFd {
        match self {
            Stream::Stdin => libc::STDIN_FILENO,
            Stream::Stdout => libc::STDOUT_FILENO,
        }
    }
}

// ── Scoped descriptor substitution ────────────────────────────────────────────

/// Holds a duplicate of a standard stream while another descriptor occupies
/// its slot. Dropping the guard puts the original back.
pub struct StdioGuard {
    stream: Stream,
    saved: Option<OwnedFd>,
}

impl StdioGuard {
    /// Point `stream` at `with`. The caller may close `with` right after;
    /// the slot keeps its own copy.
    pub fn substitute(with: &impl AsRawFd, stream: Stream) -> Result<Self> {
        let _ = std::io::stdout().flush();
        // Close-on-exec so children only ever see the substituted slot
        let saved = fcntl(stream.fd(), FcntlArg::F_DUPFD_CLOEXEC(0)).map_err(ShellError::sys("dup"))?;
        let saved = unsafe { OwnedFd::from_raw_fd(saved) };
        dup2(with.as_raw_fd(), stream.fd()).map_err(ShellError::sys("dup2"))?;
        Ok(StdioGuard { stream, saved: Some(saved) })
    }

    /// Leave the substitution in place for the rest of the session.
    pub fn persist(mut self) {
        debug!(stream = ?self.stream, "substitution kept");
        self.saved = None;
    }
}

impl Drop for StdioGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            let _ = std::io::stdout().flush();
            if let Err(e) = dup2(saved.as_raw_fd(), self.stream.fd()) {
                eprintln!("minishell: restoring {:?}: {}", self.stream, e.desc());
            }
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// `args < path`. With `restore` false the shell's own stdin stays on the
/// file afterwards.
pub fn redirect_input(args: &[String], path: &str, restore: bool) -> Result<()> {
    let cmd = Launch::prepare(args)?;
    let file = open(path, OpenOptions::new().read(true))?;
    let guard = StdioGuard::substitute(&file, Stream::Stdin)?;
    drop(file);

    let result = launch::launch(&cmd, true);
    if !restore {
        guard.persist();
    }
    result.map(|_| ())
}

/// `args > path`. The file is created or truncated; stdout is always
/// restored, even when the launch fails. The exit-code line goes to the
/// restored stdout, never into the file.
pub fn redirect_output(args: &[String], path: &str) -> Result<()> {
    let cmd = Launch::prepare(args)?;
    let file = open(path, OpenOptions::new().write(true).create(true).truncate(true))?;
    let guard = StdioGuard::substitute(&file, Stream::Stdout)?;
    drop(file);

    let code = launch::run_foreground(&cmd);
    drop(guard);
    launch::report(code?);
    Ok(())
}

fn open(path: &str, options: &OpenOptions) -> Result<File> {
    options.open(path).map_err(|source| ShellError::Redirect {
        path: path.to_string(),
        source,
    })
}
