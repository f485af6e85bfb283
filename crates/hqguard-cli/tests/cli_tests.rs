//! Integration tests for the `hqguard` binary against a fake `hq` script.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const FAKE_HQ: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
echo "$*" >> "$dir/calls.log"
case "$1 $2" in
  "server info")
    [ -f "$dir/running" ] && exit 0
    exit 1 ;;
  "server start")
    touch "$dir/running"
    echo $$ > "$dir/sleeper.pid"
    exec sleep 30 ;;
  "server stop")
    [ -f "$dir/sleeper.pid" ] && kill "$(cat "$dir/sleeper.pid")" 2>/dev/null
    rm -f "$dir/running" "$dir/sleeper.pid"
    exit 0 ;;
esac
exit 2
"#;

struct Fixture {
    bin: TempDir,
    work: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let bin = TempDir::new().unwrap();
        let hq = bin.path().join("hq");
        fs::write(&hq, FAKE_HQ).unwrap();
        fs::set_permissions(&hq, fs::Permissions::from_mode(0o755)).unwrap();
        Self {
            bin,
            work: TempDir::new().unwrap(),
        }
    }

    fn hq(&self) -> PathBuf {
        self.bin.path().join("hq")
    }

    fn mark_running(&self) {
        fs::write(self.bin.path().join("running"), "").unwrap();
    }

    fn calls(&self) -> String {
        fs::read_to_string(self.bin.path().join("calls.log")).unwrap_or_default()
    }

    fn current_dir(&self) -> PathBuf {
        self.work.path().join(".server").join("hq-current")
    }

    fn hqguard(&self, args: &[&str]) -> Output {
        hqguard_in(self.work.path(), &self.hq(), args)
    }
}

fn hqguard_in(work: &Path, hq: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hqguard"));
    for var in [
        "HQGUARD_WORK_DIR",
        "HQGUARD_HQ_BIN",
        "HQGUARD_SERVER_DIR_NAME",
        "HQGUARD_ENV_VAR",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.current_dir(work)
        .arg("--hq-bin")
        .arg(hq)
        .arg("--delay-ms")
        .arg("200")
        .args(args)
        .output()
        .expect("failed to run hqguard")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn no_subcommand_starts_server_and_prints_export() {
    let fx = Fixture::new();

    let out = fx.hqguard(&[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        stdout(&out),
        format!("export HQ_SERVER_DIR='{}'", fx.current_dir().display())
    );
    assert!(fx.work.path().join(".server").is_dir());
    assert_eq!(fx.calls().matches("server start").count(), 1);

    let stop = fx.hqguard(&["stop"]);
    assert!(stop.status.success());
    assert_eq!(stdout(&stop), "stopped");
}

#[test]
fn ensure_with_running_server_does_not_start() {
    let fx = Fixture::new();
    fx.mark_running();

    let out = fx.hqguard(&["ensure"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        format!("export HQ_SERVER_DIR='{}'", fx.current_dir().display())
    );
    assert!(!fx.calls().contains("server start"));
}

#[test]
fn json_format_reports_outcome() {
    let fx = Fixture::new();
    fx.mark_running();

    let out = fx.hqguard(&["--format", "json"]);
    assert!(out.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(parsed["name"], "HQ_SERVER_DIR");
    assert_eq!(parsed["outcome"]["state"], "already_running");
}

#[test]
fn status_exit_code_follows_server() {
    let fx = Fixture::new();

    let out = fx.hqguard(&["status"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout(&out), "not running");
    assert!(!fx.work.path().join(".server").exists());

    fx.mark_running();
    let out = fx.hqguard(&["status"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "running");
}

#[test]
fn env_works_without_hq_installed() {
    let work = TempDir::new().unwrap();
    let out = hqguard_in(
        work.path(),
        Path::new("/nonexistent/hq"),
        &["env", "--env-var", "MY_HQ"],
    );

    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        format!(
            "export MY_HQ='{}'",
            work.path().join(".server/hq-current").display()
        )
    );
    assert!(!work.path().join(".server").exists());
}

#[test]
fn missing_hq_binary_exits_unavailable() {
    let work = TempDir::new().unwrap();
    let out = hqguard_in(work.path(), Path::new("/nonexistent/hq"), &["ensure"]);

    assert_eq!(out.status.code(), Some(69));
    assert!(out.stdout.is_empty());
}

#[test]
fn invalid_env_var_exits_config() {
    let fx = Fixture::new();
    let out = fx.hqguard(&["--env-var", "not valid"]);
    assert_eq!(out.status.code(), Some(78));
}

#[test]
fn server_dir_blocked_by_file_exits_io() {
    let fx = Fixture::new();
    fs::write(fx.work.path().join(".server"), "in the way").unwrap();

    let out = fx.hqguard(&["ensure"]);
    assert_eq!(out.status.code(), Some(74));
    assert!(!fx.calls().contains("server"));
}

#[test]
fn exec_exports_variable_and_propagates_exit_code() {
    let fx = Fixture::new();
    fx.mark_running();

    let out = fx.hqguard(&["exec", "--", "sh", "-c", "echo \"$HQ_SERVER_DIR\"; exit 7"]);
    assert_eq!(out.status.code(), Some(7));
    assert_eq!(stdout(&out), fx.current_dir().display().to_string());
}

#[test]
fn paths_lists_layout_and_binary() {
    let fx = Fixture::new();
    let out = fx.hqguard(&["paths"]);
    assert!(out.status.success());

    let text = stdout(&out);
    assert!(text.contains(&format!("current_dir = {}", fx.current_dir().display())));
    assert!(text.contains(&format!("hq_bin = {}", fx.hq().display())));
}
