//! CLI tests for `treebeard-action run` against stand-in programs.
//!
//! The tool config points the interpreter, installer and CLI at small shell
//! scripts so the full binary can be exercised without Python.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;

use treebeard_action::error::PREREQUISITE_MESSAGE;
use treebeard_action::exit_codes;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod");
    path
}

fn write_config(dir: &Path, python: &Path, pip: &Path, cli: &Path) -> PathBuf {
    let path = dir.join("action.toml");
    let contents = format!(
        "[tool]\npython = \"{}\"\npip = \"{}\"\ncli = \"{}\"\n",
        python.display(),
        pip.display(),
        cli.display()
    );
    fs::write(&path, contents).expect("write config");
    path
}

fn run_action(dir: &Path, config: &Path, env: &[(&str, &str)]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_treebeard-action"))
        .arg("--config")
        .arg(config)
        .current_dir(dir)
        .env_clear()
        .env("PATH", std::env::var("PATH").unwrap_or_default())
        .envs(env.iter().copied())
        .output()
        .expect("treebeard-action run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn successful_run_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ok = script(temp.path(), "ok", "exit 0");
    let config = write_config(temp.path(), &ok, &ok, &ok);

    let output = run_action(temp.path(), &config, &[("GITHUB_EVENT_NAME", "push")]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let out = stdout(&output);
    assert!(out.contains("::group::Checking Python is Installed"));
    assert!(out.contains("::group::🌲 Install Treebeard"));
    assert!(!out.contains("::error::"));
}

#[test]
fn missing_python_reports_error_annotation() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ok = script(temp.path(), "ok", "exit 0");
    let no_python = script(temp.path(), "no-python", "exit 1");
    let marker = temp.path().join("installed");
    let pip = script(
        temp.path(),
        "pip",
        &format!("touch '{}'", marker.display()),
    );
    let config = write_config(temp.path(), &no_python, &pip, &ok);

    let output = run_action(temp.path(), &config, &[("GITHUB_EVENT_NAME", "push")]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout(&output).contains(&format!("::error::{PREREQUISITE_MESSAGE}")));
    assert!(!marker.exists(), "installer must not run");
}

#[test]
fn cli_failure_reports_status_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ok = script(temp.path(), "ok", "exit 0");
    let cli = script(temp.path(), "treebeard", "exit 3");
    let config = write_config(temp.path(), &ok, &ok, &cli);

    let output = run_action(temp.path(), &config, &[("GITHUB_EVENT_NAME", "push")]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout(&output).contains("::error::Treebeard CLI run failed with status code 3"));
}

#[test]
fn cli_receives_forwarded_env_and_args() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ok = script(temp.path(), "ok", "exit 0");
    let seen = temp.path().join("seen");
    let cli = script(
        temp.path(),
        "treebeard",
        &format!(
            "echo \"$@|$TB_FLAG|$TREEBEARD_REF|$DOCKER_USERNAME\" >> '{}'",
            seen.display()
        ),
    );
    let config = write_config(temp.path(), &ok, &ok, &cli);

    let output = run_action(
        temp.path(),
        &config,
        &[
            ("GITHUB_EVENT_NAME", "push"),
            ("TB_FLAG", "on"),
            ("INPUT_NOTEBOOKS", "nb/*.ipynb"),
            ("INPUT_DOCKER-USERNAME", "u"),
            ("INPUT_DOCKER-PASSWORD", "p"),
        ],
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let recorded = fs::read_to_string(&seen).expect("read seen");
    assert_eq!(
        recorded,
        "run --confirm --env TB_FLAG --notebooks nb/*.ipynb|on|master|u\n"
    );
}

#[test]
fn missing_working_path_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let ok = script(temp.path(), "ok", "exit 0");
    let config = write_config(temp.path(), &ok, &ok, &ok);

    let output = run_action(
        temp.path(),
        &config,
        &[("GITHUB_EVENT_NAME", "push"), ("INPUT_PATH", "nope")],
    );

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stdout(&output).contains("::error::change directory to"));
}
