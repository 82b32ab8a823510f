// src/main.rs
mod config;
mod error;
mod executor;
mod parser;
mod readline;
mod shell;

use config::Config;
use readline::{LineSource, PipedInput, ReadlineError, ShellReadline};
use shell::{Flow, Shell};
use std::io::IsTerminal;
use tracing::debug;

const LOG_ENV: &str = "MINISHELL_LOG";

fn main() {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("minishell: warning: ignoring config: {e:#}");
        Config::default()
    });
    init_logging(&config);

    let mut input: Box<dyn LineSource> = if std::io::stdin().is_terminal() {
        Box::new(ShellReadline::new(config.history_file(), config.history.size))
    } else {
        Box::new(PipedInput::new(std::io::stdin().lock()))
    };

    let mut shell = Shell::new(config);
    run(&mut shell, input.as_mut());

    shell.jobs.reap();
    if !shell.jobs.is_empty() {
        debug!(remaining = shell.jobs.len(), "leaving background jobs running");
    }
}

fn run(shell: &mut Shell, input: &mut dyn LineSource) {
    loop {
        shell.jobs.reap();
        let prompt = shell.build_prompt();

        match input.readline(&prompt) {
            Ok(line) => match shell.eval(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => eprintln!("minishell: {e}"),
            },

            // Ctrl+C discards the current line
            Err(ReadlineError::Interrupted) => {}

            Err(ReadlineError::Eof) => {
                println!("End of input file reached. Exiting the shell.");
                break;
            }

            Err(ReadlineError::Other(e)) => {
                eprintln!("minishell: readline error: {e}");
                break;
            }
        }
    }
}

fn init_logging(config: &Config) {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| config.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
}
