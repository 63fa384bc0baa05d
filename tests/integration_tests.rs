mod common;

use common::{CommandOutput, TestContext};
use std::fs;

const REFERENCE_SCRIPT: &str = include_str!("fixtures/setup_rust.sh");

#[cfg(unix)]
fn mode_of(path: &std::path::Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[test]
fn test_help_and_version() {
    let ctx = TestContext::new();

    ctx.run(&["--help"])
        .assert_success()
        .assert_stdout_contains("Write a portable shell installer for rustup")
        .assert_stdout_contains("Usage: setup-rust");

    let output: CommandOutput = ctx.run(&["--version"]);
    output.assert_success().assert_stdout_contains("setup-rust");
}

#[test]
fn test_default_run_writes_reference_script() {
    let ctx = TestContext::new();

    let output = ctx.run(&[]);
    output
        .assert_success()
        .assert_stdout_contains("setup_rust.sh");

    let path = ctx.path("setup_rust.sh");
    let content = fs::read_to_string(&path).expect("script was not written");
    assert_eq!(content, REFERENCE_SCRIPT);

    #[cfg(unix)]
    assert_eq!(mode_of(&path), 0o755);
}

#[test]
fn test_explicit_destination() {
    let ctx = TestContext::new();
    fs::create_dir(ctx.path("out")).unwrap();
    let target = ctx.path("out").join("setup.sh");

    let output = ctx.run(&[target.to_str().unwrap()]);
    output.assert_success();
    assert_eq!(output.stdout.trim(), target.to_str().unwrap());

    let content = fs::read_to_string(&target).unwrap();
    assert!(content.starts_with("#!/usr/bin/env bash"));

    #[cfg(unix)]
    assert_eq!(mode_of(&target), 0o755);

    // Second run replaces the file with identical bytes
    ctx.run(&[target.to_str().unwrap()]).assert_success();
    assert_eq!(fs::read_to_string(&target).unwrap(), content);
}

#[test]
fn test_directory_destination_gets_default_name() {
    let ctx = TestContext::new();
    fs::create_dir(ctx.path("out")).unwrap();

    ctx.run(&["out"]).assert_success();
    assert!(ctx.path("out").join("setup_rust.sh").is_file());
}

#[test]
fn test_missing_directory_fails() {
    let ctx = TestContext::new();
    let target = ctx.path("nonexistent").join("setup.sh");

    ctx.run(&[target.to_str().unwrap()])
        .assert_failure()
        .assert_stderr_contains("does not exist");

    assert!(!target.exists());
    assert!(!ctx.path("nonexistent").exists());
}

#[test]
fn test_stdout_prints_without_writing() {
    let ctx = TestContext::new();

    let output = ctx.run(&["--stdout", "-t", "beta", "--no-components"]);
    output
        .assert_success()
        .assert_stdout_contains("#!/usr/bin/env bash")
        .assert_stdout_contains("rustup toolchain install beta\n")
        .assert_stdout_contains("rustup default beta\n");

    assert!(!ctx.path("setup_rust.sh").exists());
}

#[test]
fn test_config_env_and_cli_precedence() {
    let ctx = TestContext::new();
    fs::write(
        &ctx.config_path,
        r#"{ "toolchain": "nightly", "components": ["rust-src"], "profile": "default" }"#,
    )
    .unwrap();

    // Config file alone
    let output = ctx.run(&["--stdout"]);
    output
        .assert_success()
        .assert_stdout_contains("rustup toolchain install nightly --component rust-src\n")
        .assert_stdout_contains("--profile default\n");

    // Environment beats the file
    let output: CommandOutput = ctx
        .cmd()
        .env("SETUP_RUST_TOOLCHAIN", "beta")
        .env("SETUP_RUST_COMPONENTS", "")
        .arg("--stdout")
        .output()
        .expect("Failed to run setup-rust")
        .into();
    output
        .assert_success()
        .assert_stdout_contains("rustup toolchain install beta\n")
        .assert_stdout_contains("--profile default\n");

    // Command line beats both
    let output: CommandOutput = ctx
        .cmd()
        .env("SETUP_RUST_TOOLCHAIN", "beta")
        .args(["--stdout", "-t", "1.79.0", "-p", "minimal"])
        .output()
        .expect("Failed to run setup-rust")
        .into();
    output
        .assert_success()
        .assert_stdout_contains("rustup toolchain install 1.79.0 --component rust-src\n")
        .assert_stdout_contains("--profile minimal\n");
}

#[test]
fn test_env_destination_and_mode() {
    let ctx = TestContext::new();
    let target = ctx.path("from-env.sh");

    let output: CommandOutput = ctx
        .cmd()
        .env("SETUP_RUST_DEST", &target)
        .env("SETUP_RUST_MODE", "700")
        .output()
        .expect("Failed to run setup-rust")
        .into();
    output.assert_success();
    assert!(target.is_file());

    #[cfg(unix)]
    assert_eq!(mode_of(&target), 0o700);
}

#[test]
fn test_malformed_config_fails() {
    let ctx = TestContext::new();
    fs::write(&ctx.config_path, "{ not json").unwrap();

    ctx.run(&[])
        .assert_failure()
        .assert_stderr_contains("Could not parse config file");
    assert!(!ctx.path("setup_rust.sh").exists());
}

#[test]
fn test_invalid_values_are_rejected() {
    let ctx = TestContext::new();

    ctx.run(&["-t", "stable;reboot"])
        .assert_failure()
        .assert_stderr_contains("Invalid character ';'");

    ctx.run(&["-c", "clippy`id`"])
        .assert_failure()
        .assert_stderr_contains("Invalid character '`'");

    ctx.run(&["--mode", "644"])
        .assert_failure()
        .assert_stderr_contains("does not let the owner execute");

    ctx.run(&["--profile", "huge"]).assert_failure();

    assert!(!ctx.path("setup_rust.sh").exists());
}
