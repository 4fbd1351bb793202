//! Interpreter process management (startup/IO).

use tokio::process::{Child, ChildStdin, ChildStdout};

pub mod r;

/// A running interpreter with its command pipes taken.
pub struct ProcessHandle {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}
