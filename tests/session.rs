// tests/session.rs
//
// Drives the built binary with a scripted stdin and inspects what comes out.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

struct Session {
    dir: TempDir,
    config: Option<String>,
}

impl Session {
    fn new() -> Self {
        Session { dir: TempDir::new().unwrap(), config: None }
    }

    fn with_config(toml: &str) -> Self {
        Session { dir: TempDir::new().unwrap(), config: Some(toml.to_string()) }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, script: &str) -> Output {
        let config_path = self.path().join("minishell.toml");
        if let Some(toml) = &self.config {
            std::fs::write(&config_path, toml).unwrap();
        }

        let mut child = Command::new(env!("CARGO_BIN_EXE_minishell"))
            .current_dir(self.path())
            .env("MINISHELL_CONFIG", &config_path)
            .env("HOME", self.path())
            .env_remove("MINISHELL_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child.stdin.take().unwrap().write_all(script.as_bytes()).unwrap();
        child.wait_with_output().unwrap()
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

const EOF_LINE: &str = "End of input file reached. Exiting the shell.\n";

#[test]
fn test_end_of_input_message() {
    let out = Session::new().run("");
    assert!(out.status.success());
    assert_eq!(stdout(&out), EOF_LINE);
}

#[test]
fn test_exit_stops_the_loop() {
    let out = Session::new().run("exit\necho after\n");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "");
}

#[test]
fn test_echo_prints_rest_of_line_verbatim() {
    let out = Session::new().run("echo  hello   big \tworld\necho\n");
    assert_eq!(stdout(&out), format!("hello   big \tworld\n\n{EOF_LINE}"));
}

#[test]
fn test_cd_changes_directory_for_later_children() {
    let session = Session::new();
    std::fs::create_dir(session.path().join("sub")).unwrap();
    let out = session.run("cd sub\npwd\n");

    let expected = session.path().join("sub").canonicalize().unwrap();
    let printed = stdout(&out);
    let first = printed.lines().next().unwrap();
    assert_eq!(Path::new(first).canonicalize().unwrap(), expected);
}

#[test]
fn test_cd_twice_to_same_absolute_path() {
    let session = Session::new();
    let target = session.path().join("sub");
    std::fs::create_dir(&target).unwrap();
    let line = format!("cd {}\n", target.display());
    let out = session.run(&format!("{line}{line}pwd\n"));

    let printed = stdout(&out);
    let first = printed.lines().next().unwrap();
    assert_eq!(
        Path::new(first).canonicalize().unwrap(),
        target.canonicalize().unwrap()
    );
    assert_eq!(stderr(&out), "");
}

#[test]
fn test_cd_failure_is_reported_and_not_fatal() {
    let session = Session::new();
    let out = session.run("cd does-not-exist\npwd\necho still here\n");

    assert_eq!(stderr(&out), "No such file or directory\n");
    let printed = stdout(&out);
    let first = printed.lines().next().unwrap();
    assert_eq!(
        Path::new(first).canonicalize().unwrap(),
        session.path().canonicalize().unwrap()
    );
    assert!(printed.contains("still here\n"));
}

#[test]
fn test_missing_program_reports_and_continues() {
    let out = Session::new().run("nonexistent_cmd_xyz --flag\necho next\n");

    assert_eq!(stderr(&out), "Couldn't find command 'nonexistent_cmd_xyz'\n");
    assert_eq!(
        stdout(&out),
        format!("Program terminated: exit code 1\nnext\n{EOF_LINE}")
    );
}

#[test]
fn test_exit_code_reported_only_when_non_zero() {
    let out = Session::new().run("true\nfalse\n");
    assert_eq!(
        stdout(&out),
        format!("Program terminated: exit code 1\n{EOF_LINE}")
    );
}

#[test]
fn test_output_redirection_restores_stdout() {
    let session = Session::new();
    let out = session.run("echo hi > out.txt\necho back\n");

    let written = std::fs::read_to_string(session.path().join("out.txt")).unwrap();
    assert_eq!(written, "hi\n");
    assert_eq!(stdout(&out), format!("back\n{EOF_LINE}"));
}

#[test]
fn test_output_redirection_truncates() {
    let session = Session::new();
    std::fs::write(session.path().join("out.txt"), "old contents that are long\n").unwrap();
    session.run("echo new > out.txt\n");

    let written = std::fs::read_to_string(session.path().join("out.txt")).unwrap();
    assert_eq!(written, "new\n");
}

#[test]
fn test_failed_redirected_command_reports_on_terminal() {
    let session = Session::new();
    let out = session.run("false > out.txt\n");

    let written = std::fs::read_to_string(session.path().join("out.txt")).unwrap();
    assert_eq!(written, "");
    assert_eq!(stdout(&out), format!("Program terminated: exit code 1\n{EOF_LINE}"));
}

#[test]
fn test_input_redirection() {
    let session = Session::new();
    std::fs::write(session.path().join("in.txt"), "alpha\nbeta\ngamma\n").unwrap();
    let out = session.run("wc -l < in.txt\necho done\n");

    let printed = stdout(&out);
    let mut lines = printed.lines();
    assert_eq!(lines.next().unwrap().trim(), "3");
    assert_eq!(lines.next().unwrap(), "done");
}

#[test]
fn test_stdin_restored_after_input_redirection() {
    let session = Session::new();
    std::fs::write(session.path().join("cmds.txt"), "echo from-file\n").unwrap();
    let out = session.run("true < cmds.txt\necho from-script\n");

    assert_eq!(stdout(&out), format!("from-script\n{EOF_LINE}"));
}

#[test]
fn test_compat_stdin_stays_on_redirected_file() {
    let session = Session::with_config("[compat]\nrestore_stdin_after_redirect = false\n");
    // `true` reads nothing, so the shell picks up the file from its start
    std::fs::write(session.path().join("cmds.txt"), "echo from-file\n").unwrap();
    let out = session.run("true < cmds.txt\n");

    assert_eq!(stdout(&out), format!("from-file\n{EOF_LINE}"));
}

#[test]
fn test_missing_redirect_file_is_recoverable() {
    let out = Session::new().run("cat < missing.txt\necho next\n");

    assert_eq!(stderr(&out), "minishell: missing.txt: No such file or directory\n");
    assert_eq!(stdout(&out), format!("next\n{EOF_LINE}"));
}

#[test]
fn test_pipeline_feeds_reader() {
    let out = Session::new().run("echo hello | wc -l\n");
    assert!(stdout(&out).lines().any(|l| l.trim() == "1"));
}

#[test]
fn test_pipeline_larger_than_pipe_buffer() {
    let out = Session::new().run("seq 1 200000 | wc -l\necho after\n");

    let printed = stdout(&out);
    assert!(printed.lines().any(|l| l.trim() == "200000"));
    assert!(printed.contains("after\n"));
}

#[test]
fn test_pipeline_writer_failure_reported_on_terminal() {
    let out = Session::new().run("false | wc -l\necho after\n");

    let printed = stdout(&out);
    assert!(printed.lines().any(|l| l.trim() == "0"));
    assert!(printed.contains("Program terminated: exit code 1\n"));
    assert!(printed.contains("after\n"));
}

#[test]
fn test_pipeline_reader_exiting_first_keeps_shell_alive() {
    let session = Session::new();
    std::fs::write(session.path().join("w.sh"), "sleep 0.5\nexit 3\n").unwrap();
    let out = session.run("sh w.sh | true\necho after\n");

    assert!(out.status.success());
    let printed = stdout(&out);
    assert!(printed.contains("Program terminated: exit code 3\n"));
    assert!(printed.contains("after\n"));
    assert!(printed.ends_with(EOF_LINE));
}

#[test]
fn test_pipeline_writer_stops_on_broken_pipe() {
    let out = Session::new().run("yes | head -n 1\n");

    // The writer dies of SIGPIPE instead of seeing write errors
    assert_eq!(stderr(&out), "");
    let printed = stdout(&out);
    assert!(printed.contains("y\n"));
    assert!(printed.contains("Program terminated: exit code 141\n"));
}

#[test]
fn test_second_pipe_is_rejected() {
    let out = Session::new().run("echo a | cat | cat\necho next\n");

    assert_eq!(stderr(&out), "minishell: only two-stage pipelines are supported\n");
    assert_eq!(stdout(&out), format!("next\n{EOF_LINE}"));
}

#[test]
fn test_background_command_does_not_block() {
    let session = Session::new();
    let mut child = Command::new(env!("CARGO_BIN_EXE_minishell"))
        .current_dir(session.path())
        .env("MINISHELL_CONFIG", session.path().join("none.toml"))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let started = Instant::now();
    child.stdin.take().unwrap().write_all(b"sleep 3 &\necho after\n").unwrap();
    assert!(child.wait().unwrap().success());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_compat_foreground_needs_ampersand() {
    let session = Session::with_config("[compat]\nforeground_requires_ampersand = true\n");
    session.run("touch plain.txt\ntouch marked.txt &\n");

    let marked = session.path().join("marked.txt");
    let deadline = Instant::now() + Duration::from_secs(5);
    while !marked.exists() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(marked.exists());
    assert!(!session.path().join("plain.txt").exists());
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let session = Session::with_config("prompt = \n");
    let out = session.run("echo ok\n");

    assert!(stderr(&out).starts_with("minishell: warning: ignoring config"));
    assert_eq!(stdout(&out), format!("ok\n{EOF_LINE}"));
}
