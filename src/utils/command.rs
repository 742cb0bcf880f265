//! Process execution primitives with consistent error handling.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, ProcessSpawnFailedDetails, Result};
use crate::utils::shell;

/// Run a program with inherited stdin/stdout/stderr and return its exit code.
///
/// Processes killed by a signal report -1. Failing to start the process is an
/// error; a non-zero exit is not.
pub fn run_inherited(program: &str, args: &[String], cwd: Option<&Path>) -> Result<i32> {
    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    log::debug!(
        "spawn: {}{}",
        shell::render_command(program, args),
        cwd.map(|d| format!(" (in {})", d.display())).unwrap_or_default()
    );

    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| {
            Error::process_spawn_failed(ProcessSpawnFailedDetails {
                program: program.to_string(),
                args: args.to_vec(),
                cwd: cwd.map(|d| d.display().to_string()),
                error: e.to_string(),
            })
        })?;

    Ok(status.code().unwrap_or(-1))
}

/// Run a command string through `shell -c` with inherited stdio.
pub fn run_shell_inherited(shell: &str, command: &str, cwd: Option<&Path>) -> Result<i32> {
    run_inherited(shell, &["-c".to_string(), command.to_string()], cwd)
}
