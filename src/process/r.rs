//! R interpreter process bootstrap.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;

use super::ProcessHandle;
use crate::engine::EngineError;

/// Flags that make R read commands from stdin without echoing or touching `.RData`.
/// `--slave` is accepted by every R release (4.0 added `--no-echo` as its new name).
pub const BASE_ARGS: &[&str] = &["--slave", "--no-save", "--no-restore"];

pub fn command_line(binary: &str, forwarded: &[String]) -> Command {
    let mut cmd = Command::new(binary);
    cmd.args(BASE_ARGS)
        .args(forwarded)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        // R's warnings and messages go straight to the user.
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    cmd
}

pub fn start_r(binary: &str, forwarded: &[String]) -> Result<ProcessHandle, EngineError> {
    debug!(binary, ?forwarded, "starting R");
    let mut child: Child = command_line(binary, forwarded)
        .spawn()
        .map_err(|source| EngineError::Spawn {
            binary: binary.to_string(),
            source,
        })?;
    let stdin = child.stdin.take().ok_or(EngineError::MissingPipe("stdin"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or(EngineError::MissingPipe("stdout"))?;

    Ok(ProcessHandle {
        child,
        stdin,
        stdout,
    })
}
