// src/readline/mod.rs
// Line input: a reedline editor on a terminal, plain buffered reads otherwise

use reedline::{
    DefaultHinter, FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, Signal,
};
use std::borrow::Cow;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug)]
pub enum ReadlineError {
    Interrupted,
    Eof,
    Other(String),
}

/// Supplies one raw line per interactive turn.
pub trait LineSource {
    fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError>;
}

// ── Prompt ───────────────────────────────────────────────────────────────────

pub struct ShellPrompt {
    pub text: String,
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }
    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }
    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let indicator = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            indicator, history_search.term
        ))
    }
}

// ── Terminal editor ──────────────────────────────────────────────────────────

pub struct ShellReadline {
    editor: Reedline,
}

impl ShellReadline {
    pub fn new(history_path: PathBuf, history_size: usize) -> Self {
        let mut editor = Reedline::create().with_hinter(Box::new(
            DefaultHinter::default().with_style(
                nu_ansi_term::Style::new()
                    .italic()
                    .fg(nu_ansi_term::Color::DarkGray),
            ),
        ));

        match FileBackedHistory::with_file(history_size, history_path.clone()) {
            Ok(history) => editor = editor.with_history(Box::new(history)),
            Err(e) => warn!(path = %history_path.display(), "history disabled: {e}"),
        }

        ShellReadline { editor }
    }
}

impl LineSource for ShellReadline {
    fn readline(&mut self, prompt_text: &str) -> Result<String, ReadlineError> {
        let prompt = ShellPrompt {
            text: prompt_text.to_string(),
        };
        match self.editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => Ok(line),
            Ok(Signal::CtrlC) => Err(ReadlineError::Interrupted),
            Ok(Signal::CtrlD) => Err(ReadlineError::Eof),
            Err(e) => Err(ReadlineError::Other(e.to_string())),
        }
    }
}

// ── Piped input ──────────────────────────────────────────────────────────────

/// Reads lines from a non-terminal source without printing a prompt.
pub struct PipedInput<R> {
    reader: R,
}

impl<R: BufRead> PipedInput<R> {
    pub fn new(reader: R) -> Self {
        PipedInput { reader }
    }
}

impl<R: BufRead> LineSource for PipedInput<R> {
    fn readline(&mut self, _prompt: &str) -> Result<String, ReadlineError> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Err(ReadlineError::Eof),
            Ok(_) => Ok(line),
            Err(e) => Err(ReadlineError::Other(e.to_string())),
        }
    }
}
