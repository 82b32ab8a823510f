// src/executor/mod.rs - Command dispatcher
pub mod builtin;
pub mod launch;
pub mod pipeline;
pub mod redirect;

use crate::error::Result;
use crate::parser::ast::{Command, Redirect};
use crate::shell::{Flow, Shell};
use launch::{Launch, Launched};
use tracing::debug;

/// Route one classified line to its handler. Foreground work is finished
/// when this returns; background children are recorded in the job table.
pub fn execute(shell: &mut Shell, cmd: Command) -> Result<Flow> {
    crossterm::terminal::disable_raw_mode().ok();

    match cmd {
        Command::Quit => return Ok(Flow::Exit),
        Command::Pipeline { writer, reader } => {
            pipeline::run_pipeline(&writer, &reader, &mut shell.jobs)?;
        }
        Command::Redirect { args, redirect: Redirect::StdinFrom(path) } => {
            let restore = shell.config.compat.restore_stdin_after_redirect;
            redirect::redirect_input(&args, &path, restore)?;
        }
        Command::Redirect { args, redirect: Redirect::StdoutTo(path) } => {
            redirect::redirect_output(&args, &path)?;
        }
        Command::Echo { text } => builtin::builtin_echo(&text),
        Command::Cd { target } => builtin::builtin_cd(target.as_deref()),
        Command::Simple { args, background } => run_simple(shell, &args, background)?,
    }

    Ok(Flow::Continue)
}

fn run_simple(shell: &mut Shell, args: &[String], background: bool) -> Result<()> {
    if !background && shell.config.compat.foreground_requires_ampersand {
        debug!(?args, "foreground command ignored (compat)");
        return Ok(());
    }

    let cmd = Launch::prepare(args)?;
    match launch::launch(&cmd, !background)? {
        Launched::Finished(code) => debug!(program = cmd.name(), code, "foreground command finished"),
        Launched::Detached(pid) => {
            let id = shell.jobs.track(pid, args.join(" "));
            debug!(job = id, pid = pid.as_raw(), "background job started");
        }
    }
    Ok(())
}
