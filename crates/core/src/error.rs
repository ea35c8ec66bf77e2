// Central Error Type for the Script Runner

use thiserror::Error;

/// Runner-level error type
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Child exited non-zero while the exit code was checked.
    /// Output streams are the raw bytes, before the output processor ran.
    #[error(
        "Command \"{command}\" failed with exit code {exit_code}\nstdout\n------\n{}\nstderr\n------\n{}",
        String::from_utf8_lossy(.stdout),
        String::from_utf8_lossy(.stderr)
    )]
    CommandFailed {
        command: String,
        exit_code: i32,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },

    #[error("Launch error: {0}")]
    Launch(#[from] crate::port::LaunchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RunnerError {
    /// Exit code carried by a `CommandFailed` error
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunnerError::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

/// Result type alias using RunnerError
pub type Result<T> = std::result::Result<T, RunnerError>;
