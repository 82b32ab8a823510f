// src/parser/mod.rs
//
// Line classification. The shell has no real grammar: a line is routed by
// which syntax characters it contains, checked in a fixed order.

pub mod ast;

use crate::error::{Result, ShellError};
use ast::{Command, Redirect};

pub const QUIT_COMMAND: &str = "exit";

/// Classify one trimmed, non-empty line.
///
/// Precedence, first match wins: quit, `|`, `<`, `>`, `echo`, `cd`, generic.
/// A line like `sort < in | head` is therefore a pipeline whose writer
/// arguments contain `<` as a plain word.
pub fn parse(line: &str) -> Result<Command> {
    if line == QUIT_COMMAND {
        return Ok(Command::Quit);
    }

    if let Some((left, right)) = line.split_once('|') {
        if right.contains('|') {
            return Err(ShellError::UnsupportedPipeline);
        }
        return Ok(Command::Pipeline {
            writer: tokenize(left),
            reader: tokenize(right),
        });
    }

    if let Some((left, right)) = line.split_once('<') {
        let path = redirect_target(right, '<')?;
        return Ok(Command::Redirect {
            args: tokenize(left),
            redirect: Redirect::StdinFrom(path),
        });
    }

    if let Some((left, right)) = line.split_once('>') {
        let path = redirect_target(right, '>')?;
        return Ok(Command::Redirect {
            args: tokenize(left),
            redirect: Redirect::StdoutTo(path),
        });
    }

    if let Some(rest) = strip_keyword(line, "echo") {
        return Ok(Command::Echo { text: rest.trim_start().to_string() });
    }

    if strip_keyword(line, "cd").is_some() {
        return Ok(Command::Cd { target: cd_target(&tokenize(line)) });
    }

    Ok(parse_simple(line))
}

/// Whitespace split. No quoting, no escapes, no expansion.
pub fn tokenize(segment: &str) -> Vec<String> {
    segment.split_whitespace().map(String::from).collect()
}

fn parse_simple(line: &str) -> Command {
    let (line, background) = match line.strip_suffix('&') {
        Some(stripped) => (stripped, true),
        None => (line, false),
    };
    let args = tokenize(line);

    // `cd` can still land here when glued to the marker, e.g. `cd&`
    if args.first().map(String::as_str) == Some("cd") {
        return Command::Cd { target: cd_target(&args) };
    }

    Command::Simple { args, background }
}

/// `cd` takes the last whitespace-delimited token, whatever precedes it.
fn cd_target(args: &[String]) -> Option<String> {
    match args {
        [] | [_] => None,
        [.., last] => Some(last.clone()),
    }
}

/// Returns the text after `keyword` when the line is exactly the keyword or
/// the keyword followed by whitespace.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

fn redirect_target(text: &str, symbol: char) -> Result<String> {
    let path = text.trim();
    if path.is_empty() {
        return Err(ShellError::MissingRedirectTarget { symbol });
    }
    Ok(path.to_string())
}
