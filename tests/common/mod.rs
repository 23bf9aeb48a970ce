//! Common test utilities for flint integration tests

use assert_cmd::Command;
use std::path::Path;

/// Command for the flint binary
pub fn flint() -> Command {
    Command::cargo_bin("flint").unwrap()
}

/// Command that runs `script` (one line per command) with `dir` as the
/// working directory
#[allow(dead_code)]
pub fn script_in(dir: &Path, script: &str) -> Command {
    let path = dir.join("script.flint");
    std::fs::write(&path, script).unwrap();
    let mut cmd = flint();
    cmd.current_dir(dir).arg(path);
    cmd
}
