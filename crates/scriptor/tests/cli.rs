// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end checks of the `scriptor` binary.

use std::path::Path;
use std::process::{Command, Output};

fn scriptor(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scriptor"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .env_remove("SCRIPTOR_LOGGING_LEVEL")
        .args(args)
        .output()
        .expect("scriptor binary should start")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn engines_lists_builtin_template_engine() {
    let dir = tempfile::tempdir().unwrap();
    let output = scriptor(dir.path(), &["engines"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Scriptor Template Engine"), "got: {text}");
    assert!(text.contains("tpl, template"), "got: {text}");
}

#[test]
fn mime_and_extension_lookups() {
    let dir = tempfile::tempdir().unwrap();

    let output = scriptor(dir.path(), &["mime", "page.tpl"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "text/x-scriptor-template");

    let output = scriptor(dir.path(), &["extension", "text/x-scriptor-template"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "tpl");

    let output = scriptor(dir.path(), &["mime", "page.lua"]);
    assert!(!output.status.success());
}

#[test]
fn run_renders_template_with_bindings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.tpl"), "Hello, ${name}! (${count})").unwrap();

    let output = scriptor(
        dir.path(),
        &["run", "hello.tpl", "--bind", "name=world", "--bind", "count=3"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output).trim(), "Hello, world! (3)");
}

#[test]
fn run_fails_for_unknown_extension_and_unbound_names() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.tpl"), "Hello, ${name}!").unwrap();

    let output = scriptor(dir.path(), &["run", "script.lua"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no script engine"));

    let output = scriptor(dir.path(), &["run", "hello.tpl"]);
    assert!(!output.status.success());
}

#[test]
fn source_without_known_factories_leaves_no_engines() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("engines");
    let manifest = source.join("META-INF/services/scriptor.EngineFactory");
    std::fs::create_dir_all(manifest.parent().unwrap()).unwrap();
    std::fs::write(&manifest, "acme.UnknownFactory\n").unwrap();

    let output = scriptor(dir.path(), &["--source", "engines", "engines"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("no engines registered"));
}

#[test]
fn invalid_config_file_fails_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[cache]\nmax_entires = 4\n").unwrap();

    let output = scriptor(dir.path(), &["--config", config.to_str().unwrap(), "engines"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_entires"), "got: {stderr}");
    assert!(stderr.contains("max_entries"), "got: {stderr}");
}

#[test]
fn config_prints_effective_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scriptor.toml"), "[cache]\nmax_entries = 7\n").unwrap();

    let output = scriptor(dir.path(), &["config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("max_entries = 7"), "got: {text}");
    assert!(text.contains("[engine]"), "got: {text}");
}
