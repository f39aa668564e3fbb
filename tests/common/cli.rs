#![allow(dead_code)]

use assert_cmd::Command;
use std::ffi::OsStr;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug)]
pub struct PulseRun {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// A scratch directory the `pulse` binary treats as its working directory,
/// so `.pulse/pulse.db` lands inside it.
pub struct PulseWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl PulseWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }
}

pub fn run_pulse<I, S>(workspace: &PulseWorkspace, args: I) -> PulseRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::cargo_bin("pulse").expect("pulse binary");
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env_remove("PULSE_DB");
    cmd.env("RUST_BACKTRACE", "1");

    let output = cmd.output().expect("run pulse");
    PulseRun {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    }
}

/// Pull the issue ID out of `Created issue_xxx: Title` output.
pub fn parse_created_id(stdout: &str) -> String {
    let line = stdout.lines().next().unwrap_or("");
    line.strip_prefix("Created ")
        .and_then(|rest| rest.split(':').next())
        .unwrap_or("")
        .trim()
        .to_string()
}
