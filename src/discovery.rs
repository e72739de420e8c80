//! Dependency discovery for custom build rules.
//!
//! A rule may name a command that prints the extra inputs of its step, one
//! per line. The command runs synchronously through the platform shell.
//! Any failure yields no extra inputs.

use crate::diagnostics::Diagnostics;
use std::path::Path;
use std::process::Command;

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Runs `command` in `dir` and returns the non-empty lines it printed.
pub fn discover_inputs(command: &str, dir: &Path, diag: &mut Diagnostics) -> Vec<String> {
    let output = match shell(command).current_dir(dir).output() {
        Ok(output) => output,
        Err(e) => {
            diag.warn(format!(
                "dependency command '{}' could not be run in {}: {}",
                command,
                dir.display(),
                e
            ));
            return Vec::new();
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        diag.warn(format!(
            "dependency command '{}' failed (exit code {:?}){}",
            command,
            output.status.code(),
            stderr
                .lines()
                .next()
                .map(|l| format!(": {}", l.trim()))
                .unwrap_or_default()
        ));
        return Vec::new();
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
