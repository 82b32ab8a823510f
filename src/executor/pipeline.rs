// src/executor/pipeline.rs
//
// Two-stage pipeline: `writer | reader` over one OS pipe.

use super::launch::{self, Launch};
use super::redirect::{Stream, StdioGuard};
use crate::error::{Result, ShellError};
use crate::shell::JobTable;
use nix::unistd::{dup2, fork, pipe, ForkResult};
use std::io::Write;
use std::os::fd::AsRawFd;
use tracing::debug;

/// Run `writer | reader`.
///
/// The reader child is forked first so the pipe has a reader attached before
/// anything is written. The shell then borrows its own stdout slot for the
/// writer launch and blocks until the writer exits. The reader goes into
/// `jobs` as soon as it exists and is reaped by the next sweep.
pub fn run_pipeline(writer: &[String], reader: &[String], jobs: &mut JobTable) -> Result<()> {
    let description = reader.join(" ");
    let writer = Launch::prepare(writer)?;
    let reader = Launch::prepare(reader)?;

    let (read_end, write_end) = pipe().map_err(ShellError::sys("pipe"))?;

    let _ = std::io::stdout().flush();
    let reader_pid = match unsafe { fork() }.map_err(ShellError::sys("fork"))? {
        ForkResult::Child => {
            if dup2(read_end.as_raw_fd(), libc::STDIN_FILENO).is_err() {
                unsafe { libc::_exit(1) }
            }
            // Only fd 0 may refer to the pipe once the reader execs
            drop(write_end);
            drop(read_end);
            reader.exec()
        }
        ForkResult::Parent { child } => child,
    };
    let id = jobs.track(reader_pid, description);
    debug!(job = id, pid = reader_pid.as_raw(), "pipeline reader spawned");
    drop(read_end);

    let guard = StdioGuard::substitute(&write_end, Stream::Stdout)?;
    drop(write_end);
    let code = launch::run_foreground(&writer);
    // Restoring stdout drops the shell's last copy of the write end, so the
    // reader sees end-of-stream once the writer exits.
    drop(guard);

    launch::report(code?);
    Ok(())
}
