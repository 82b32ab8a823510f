// src/executor/builtin/core.rs
use crate::error::errno_message;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prints `text` verbatim followed by a newline.
pub fn builtin_echo(text: &str) {
    println!("{}", text);
}

/// Changes the process-wide working directory, which every later child
/// inherits. Failures are reported and never end the session.
pub fn builtin_cd(target: Option<&str>) {
    let target: PathBuf = match target {
        Some(path) => PathBuf::from(path),
        None => match dirs::home_dir() {
            Some(h) => h,
            None => { eprintln!("cd: cannot find home directory"); return; }
        },
    };

    if let Err(message) = change_dir(&target) {
        eprintln!("{}", message);
    }
}

fn change_dir(target: &Path) -> Result<(), String> {
    std::env::set_current_dir(target).map_err(|e| errno_message(&e))?;
    debug!(cwd = %target.display(), "changed directory");
    Ok(())
}
