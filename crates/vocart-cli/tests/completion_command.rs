use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_vocart_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("vocart")
}

#[test]
fn test_completion_command_help() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completion scripts"))
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.zshrc"));
}

#[test]
fn test_completion_bash_generates_script() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_vocart()"))
        .stdout(predicate::str::contains("complete -F _vocart"));
}

#[test]
fn test_completion_fish_generates_script() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("completion").arg("--shell").arg("fish");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("complete -c vocart"));
}

#[test]
fn test_completion_requires_shell_flag() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("completion");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_main_help_lists_commands() {
    let mut cmd = Command::new(get_vocart_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("completion"));
}
