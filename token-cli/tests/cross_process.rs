//! Role negotiation between independent `token` processes.
//!
//! Each test gets its own directory for the lock and exchange files, and
//! drives real processes through their stdin.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use assert_cmd::Command as OneShot;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `token` process kept alive while the test talks to it
struct RunningShell {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl RunningShell {
    fn spawn(dir: &Path) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_token"))
            .arg("--dir")
            .arg(dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn token");
        let stdin = child.stdin.take();
        let stdout = BufReader::new(child.stdout.take().expect("stdout is piped"));
        Self {
            child,
            stdin,
            stdout,
        }
    }

    /// Read output lines until one contains `needle`, returning that line
    fn wait_for(&mut self, needle: &str) -> String {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.stdout.read_line(&mut line).expect("read stdout");
            assert!(read > 0, "process ended before printing '{}'", needle);
            if line.contains(needle) {
                return line.clone();
            }
        }
    }

    fn send(&mut self, command: &str) {
        let stdin = self.stdin.as_mut().expect("stdin still open");
        writeln!(stdin, "{}", command).expect("write stdin");
        stdin.flush().expect("flush stdin");
    }

    /// Close stdin and wait for a clean exit
    fn finish(mut self) {
        drop(self.stdin.take());
        let status = self.child.wait().expect("wait for token");
        assert!(status.success());
    }
}

fn one_shot(dir: &Path, script: &str) -> assert_cmd::assert::Assert {
    OneShot::new(env!("CARGO_BIN_EXE_token"))
        .arg("--dir")
        .arg(dir)
        .write_stdin(script)
        .assert()
}

#[test]
fn test_first_process_is_master_second_is_observer() {
    let dir = TempDir::new().unwrap();

    let mut master = RunningShell::spawn(dir.path());
    let line = master.wait_for("Starting as");
    assert!(line.contains("Starting as master"), "got: {}", line);

    one_shot(dir.path(), "read\nexit\n")
        .success()
        .stdout(predicate::str::contains("Starting as observer"))
        .stdout(predicate::str::contains("Content: '<no-file>'"))
        .stdout(predicate::str::contains("Release token controller"));

    master.finish();
}

#[test]
fn test_observer_reads_master_writes() {
    let dir = TempDir::new().unwrap();

    let mut master = RunningShell::spawn(dir.path());
    master.wait_for("Starting as master");
    master.send("write hello");
    master.wait_for("Content: 'hello'");

    one_shot(dir.path(), "read\n")
        .success()
        .stdout(predicate::str::contains("Content: 'hello'"));

    master.finish();
    assert_eq!(fs::read_to_string(dir.path().join("token.exchange")).unwrap(), "hello");
}

#[test]
fn test_retry_fails_while_master_alive() {
    let dir = TempDir::new().unwrap();

    let mut master = RunningShell::spawn(dir.path());
    master.wait_for("Starting as master");

    one_shot(dir.path(), "retry\nretry\nexit\n")
        .success()
        .stdout(predicate::str::contains("lock NOT acquired"))
        .stdout(predicate::str::contains("lock acquired\n").not());

    master.finish();
}

#[test]
fn test_observer_promoted_after_master_exits() {
    let dir = TempDir::new().unwrap();

    let mut master = RunningShell::spawn(dir.path());
    master.wait_for("Starting as master");

    let mut observer = RunningShell::spawn(dir.path());
    observer.wait_for("Starting as observer");

    observer.send("retry");
    let line = observer.wait_for("lock");
    assert!(line.contains("lock NOT acquired"), "got: {}", line);

    master.finish();

    observer.send("retry");
    let line = observer.wait_for("lock");
    assert!(line.contains("lock acquired") && !line.contains("NOT"), "got: {}", line);
    observer.wait_for("Starting as master");

    observer.send("write from the new master");
    observer.wait_for("Content: 'from the new master'");
    observer.finish();

    assert_eq!(
        fs::read_to_string(dir.path().join("token.exchange")).unwrap(),
        "from the new master"
    );
}

#[test]
fn test_killed_master_frees_lock() {
    let dir = TempDir::new().unwrap();

    let mut master = RunningShell::spawn(dir.path());
    master.wait_for("Starting as master");
    master.child.kill().expect("kill master");
    master.child.wait().expect("reap master");

    one_shot(dir.path(), "exit\n")
        .success()
        .stdout(predicate::str::contains("Starting as master"));
}

#[test]
fn test_observer_write_is_rejected() {
    let dir = TempDir::new().unwrap();

    let mut master = RunningShell::spawn(dir.path());
    master.wait_for("Starting as master");

    one_shot(dir.path(), "write hijack\nexit\n")
        .success()
        .stderr(predicate::str::contains("Invalid command: 'write hijack'"));

    master.finish();
    assert!(!dir.path().join("token.exchange").exists());
}

#[test]
fn test_unreachable_lock_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    one_shot(&missing, "exit\n")
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Release token controller"))
        .stderr(predicate::str::contains("Failure"));
}

#[test]
fn test_sequential_sessions_each_become_master() {
    let dir = TempDir::new().unwrap();

    one_shot(dir.path(), "write first\nexit\n")
        .success()
        .stdout(predicate::str::contains("Starting as master"));
    one_shot(dir.path(), "read\nexit\n")
        .success()
        .stdout(predicate::str::contains("Starting as master"))
        .stdout(predicate::str::contains("Content: 'first'"));
}
