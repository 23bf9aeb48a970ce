//! End-to-end pipeline and redirection tests through the flint binary

#[path = "common/mod.rs"]
mod common;
use common::{flint, script_in};

use predicates::prelude::*;
use std::fs;
use std::time::Duration;

#[test]
fn runs_a_simple_command() {
    flint()
        .args(["-c", "echo hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn quoted_span_is_one_argument() {
    flint()
        .args(["-c", "echo \"a b\" c"])
        .assert()
        .success()
        .stdout(predicate::str::diff("a b c\n"));
}

#[test]
fn three_stage_pipeline_composes() {
    flint()
        .args(["-c", "printf 'b\\na\\nc\\n' | sort | head -2"])
        .assert()
        .success()
        .stdout(predicate::str::diff("a\nb\n"));
}

#[test]
fn output_redirect_truncates() {
    let dir = tempfile::tempdir().unwrap();
    script_in(
        dir.path(),
        "echo zulu > data.txt\n\
         echo alpha > data.txt\n",
    )
    .assert()
    .success();

    let contents = fs::read_to_string(dir.path().join("data.txt")).unwrap();
    assert_eq!(contents, "alpha\n");
}

#[test]
fn append_redirect_accumulates() {
    let dir = tempfile::tempdir().unwrap();
    script_in(
        dir.path(),
        "echo one > log.txt\n\
         echo two >> log.txt\n",
    )
    .assert()
    .success();

    let contents = fs::read_to_string(dir.path().join("log.txt")).unwrap();
    assert_eq!(contents, "one\ntwo\n");
}

#[test]
fn input_redirect_feeds_the_stage() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), "zulu\nalpha\n").unwrap();
    script_in(dir.path(), "sort < data.txt > out.txt\n")
        .assert()
        .success();

    let contents = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert_eq!(contents, "alpha\nzulu\n");
}

#[test]
fn redirect_on_last_pipeline_stage_wins_over_terminal() {
    let dir = tempfile::tempdir().unwrap();
    script_in(dir.path(), "printf 'c\\nb\\n' | sort > sorted.txt\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let contents = fs::read_to_string(dir.path().join("sorted.txt")).unwrap();
    assert_eq!(contents, "b\nc\n");
}

#[test]
fn background_pipeline_returns_promptly() {
    flint()
        .args(["-c", "sleep 5 &"])
        .timeout(Duration::from_secs(2))
        .assert()
        .success()
        .stderr(predicate::str::contains("[1]"));
}

#[test]
fn missing_command_is_confined_to_the_child() {
    flint()
        .args(["-c", "no_such_command_xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("command not found"));
}

#[test]
fn shell_survives_a_failing_stage() {
    // The failing first line must not stop the second from running
    flint()
        .args(["-c", "no_such_command_xyz"])
        .write_stdin("")
        .assert()
        .stderr(predicate::str::contains("command not found"));

    let dir = tempfile::tempdir().unwrap();
    script_in(
        dir.path(),
        "no_such_command_xyz\n\
         echo still here\n",
    )
    .assert()
    .stdout(predicate::str::contains("still here"));
}

#[test]
fn dangling_pipe_is_reported() {
    flint()
        .args(["-c", "echo hi |"])
        .assert()
        .stderr(predicate::str::contains("dangling '|'"));
}

#[test]
fn conflicting_output_redirects_are_reported() {
    flint()
        .args(["-c", "echo x > a.txt >> b.txt"])
        .assert()
        .stderr(predicate::str::contains("conflicting output"));
}

#[test]
fn comments_and_blank_lines_are_skipped_in_scripts() {
    let dir = tempfile::tempdir().unwrap();
    script_in(
        dir.path(),
        "# a comment\n\
         \n\
         echo ran\n",
    )
    .assert()
    .success()
    .stdout(predicate::str::diff("ran\n"));
}

#[test]
fn exit_stops_a_script() {
    let dir = tempfile::tempdir().unwrap();
    script_in(
        dir.path(),
        "echo before\n\
         exit\n\
         echo after\n",
    )
    .assert()
    .success()
    .stdout(predicate::str::diff("before\n"));
}

#[test]
fn help_and_version_flags() {
    flint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"));
    flint()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flint"));
}
