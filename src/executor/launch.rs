// src/executor/launch.rs
//
// Process launcher: fork, exec in the child, optionally wait in the parent.

use crate::error::{Result, ShellError};
use nix::errno::Errno;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{execvp, fork, ForkResult, Pid};
use std::ffi::CString;
use std::io::Write;
use tracing::debug;

// ── Prepared command ──────────────────────────────────────────────────────────

/// Everything the child needs after `fork`, built up front so the child only
/// makes async-signal-safe calls before `execvp`.
#[derive(Debug)]
pub struct Launch {
    argv: Vec<CString>,
    not_found: Vec<u8>,
}

impl Launch {
    pub fn prepare(args: &[String]) -> Result<Self> {
        if args.is_empty() {
            return Err(ShellError::EmptyCommand);
        }
        let argv = args
            .iter()
            .map(|a| CString::new(a.as_str()).map_err(|_| ShellError::NulByte { arg: a.clone() }))
            .collect::<Result<Vec<_>>>()?;
        let not_found = format!("Couldn't find command '{}'\n", args[0]).into_bytes();
        Ok(Launch { argv, not_found })
    }

    pub fn name(&self) -> &str {
        self.argv[0].to_str().unwrap_or("?")
    }

    /// Replace the calling process image. Only returns control by exiting.
    pub fn exec(&self) -> ! {
        // The shell ignores SIGPIPE; the program must not inherit that
        let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
        let _ = execvp(&self.argv[0], &self.argv);
        unsafe {
            libc::write(libc::STDERR_FILENO, self.not_found.as_ptr().cast(), self.not_found.len());
            libc::_exit(1)
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launched {
    /// Foreground child was reaped with this exit code.
    Finished(i32),
    /// Background child still running, not reaped.
    Detached(Pid),
}

/// Spawn one child running `cmd`. With `wait` the call blocks until that
/// child terminates and reports a non-zero exit code on standard output.
pub fn launch(cmd: &Launch, wait: bool) -> Result<Launched> {
    if !wait {
        return spawn(cmd).map(Launched::Detached);
    }
    let code = run_foreground(cmd)?;
    report(code);
    Ok(Launched::Finished(code))
}

/// Spawn `cmd` and block until it exits, without reporting. Callers that
/// lent the child their stdout report once the slot is restored.
pub fn run_foreground(cmd: &Launch) -> Result<i32> {
    let pid = spawn(cmd)?;
    wait_for(pid)
}

/// Fork a child that execs `cmd` with whatever standard streams the shell
/// currently has in place.
pub fn spawn(cmd: &Launch) -> Result<Pid> {
    let _ = std::io::stdout().flush();
    match unsafe { fork() }.map_err(ShellError::sys("fork"))? {
        ForkResult::Child => cmd.exec(),
        ForkResult::Parent { child } => {
            debug!(pid = child.as_raw(), program = cmd.name(), "spawned");
            Ok(child)
        }
    }
}

/// Block until `pid` terminates. Other children are left alone.
pub fn wait_for(pid: Pid) -> Result<i32> {
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                if let Some(code) = exit_code(status) {
                    debug!(pid = pid.as_raw(), code, "reaped");
                    return Ok(code);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(ShellError::Sys { context: "waitpid", source: e }),
        }
    }
}

/// Decoded exit code for a terminal status; `None` while the child lives.
/// This is the code the program passed to `exit`, not the raw wait status
/// (`false` gives 1, not 256). A signal maps to 128 + its number.
pub fn exit_code(status: WaitStatus) -> Option<i32> {
    match status {
        WaitStatus::Exited(_, code) => Some(code),
        WaitStatus::Signaled(_, signal, _) => Some(128 + signal as i32),
        _ => None,
    }
}

/// Print the termination line for a non-zero code. A closed stdout is
/// ignored rather than taking the shell down.
pub fn report(code: i32) {
    if code != 0 {
        let _ = writeln!(std::io::stdout(), "Program terminated: exit code {}", code);
    }
}
