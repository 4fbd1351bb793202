//! Script engine: the capability the plot runner drives.

use std::{io, process::ExitStatus};

use thiserror::Error;

pub mod r;

pub use r::RProcessEngine;

/// Errors raised while talking to an interpreter session.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start interpreter `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("interpreter {0} pipe was not captured")]
    MissingPipe(&'static str),

    #[error("interpreter I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("interpreter exited before answering ({status})")]
    Exited { status: ExitStatus },

    #[error("script failed: {message}")]
    Script { message: String },

    #[error("malformed response from interpreter: {0}")]
    Protocol(String),
}

/// An interpreter that can run scripts inside a long-lived session.
#[allow(async_fn_in_trait)]
pub trait ScriptEngine {
    type Session;

    /// Start a session; `args` are handed to the interpreter untouched.
    async fn initialize(&self, args: &[String]) -> Result<Self::Session, EngineError>;

    /// Run `script` and return its value as text.
    async fn evaluate(&self, session: &mut Self::Session, script: &str) -> Result<String, EngineError>;

    /// Run `script` for its side effects only.
    async fn evaluate_quiet(&self, session: &mut Self::Session, script: &str) -> Result<(), EngineError>;

    async fn shutdown(&self, session: Self::Session) -> Result<(), EngineError>;
}
