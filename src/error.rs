// src/error.rs
use std::io;
use thiserror::Error;

/// Per-command failures. None of these end the interactive loop.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("empty command")]
    EmptyCommand,

    #[error("argument contains a NUL byte: {arg:?}")]
    NulByte { arg: String },

    #[error("only two-stage pipelines are supported")]
    UnsupportedPipeline,

    #[error("missing file name after '{symbol}'")]
    MissingRedirectTarget { symbol: char },

    #[error("{path}: {}", errno_message(.source))]
    Redirect { path: String, source: io::Error },

    #[error("{context}: {}", .source.desc())]
    Sys { context: &'static str, source: nix::Error },
}

impl ShellError {
    pub fn sys(context: &'static str) -> impl FnOnce(nix::Error) -> ShellError {
        move |source| ShellError::Sys { context, source }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;

/// The bare `strerror` text for an io error, e.g. "No such file or directory".
pub fn errno_message(e: &io::Error) -> String {
    match e.raw_os_error() {
        Some(code) => nix::errno::Errno::from_raw(code).desc().to_string(),
        None => e.to_string(),
    }
}
