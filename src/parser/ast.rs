// src/parser/ast.rs

/// One classified input line. Each variant maps to exactly one handler in
/// the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// `writer | reader`
    Pipeline {
        writer: Vec<String>,
        reader: Vec<String>,
    },
    Redirect {
        args: Vec<String>,
        redirect: Redirect,
    },
    /// Everything after the first whitespace run, unparsed.
    Echo { text: String },
    /// `None` means bare `cd`.
    Cd { target: Option<String> },
    Simple {
        args: Vec<String>,
        background: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    StdinFrom(String),
    StdoutTo(String),
}
