// Process Launcher Port
// Abstraction for spawning a resolved command and collecting its output

use crate::domain::ResolvedCommand;
use async_trait::async_trait;
use thiserror::Error;

/// Exit code and captured streams, before output processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Negative signal number when killed by a signal (POSIX)
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Launch errors
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process killed: {0}")]
    Killed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Process Launcher trait
///
/// Implementations:
/// - SubprocessLauncher: spawns an OS child process (infra-system)
/// - MockProcessLauncher: records invocations for unit tests
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Spawn `command`, capture both output streams and wait for exit
    ///
    /// # Errors
    /// - LaunchError::SpawnFailed if the process cannot be started
    /// - LaunchError::IoError if output cannot be collected
    async fn launch(&self, command: &ResolvedCommand) -> Result<RawOutput, LaunchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock launcher behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with the given code and output
        Exit {
            code: i32,
            stdout: Vec<u8>,
            stderr: Vec<u8>,
        },
        /// Fail to spawn with message
        SpawnFail(String),
    }

    /// Mock Process Launcher for testing
    pub struct MockProcessLauncher {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<ResolvedCommand>>>,
    }

    impl MockProcessLauncher {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_exit(code: i32, stdout: &[u8], stderr: &[u8]) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stdout: stdout.to_vec(),
                stderr: stderr.to_vec(),
            })
        }
        pub fn new_success() -> Self {
            Self::new_exit(0, b"", b"")
        }
        pub fn new_spawn_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
        pub fn calls(&self) -> Vec<ResolvedCommand> {
            self.calls.lock().unwrap().clone()
        }
        pub fn last_call(&self) -> Option<ResolvedCommand> {
            self.calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ProcessLauncher for MockProcessLauncher {
        async fn launch(&self, command: &ResolvedCommand) -> Result<RawOutput, LaunchError> {
            self.calls.lock().unwrap().push(command.clone());

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(RawOutput {
                    exit_code: code,
                    stdout,
                    stderr,
                }),
                MockBehavior::SpawnFail(msg) => Err(LaunchError::SpawnFailed(msg)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::MockProcessLauncher;
    use super::*;

    fn command(program: &str) -> ResolvedCommand {
        ResolvedCommand {
            program: program.to_string(),
            args: vec![],
            env_overrides: vec![],
        }
    }

    #[test]
    fn test_mock_records_calls() {
        let launcher = MockProcessLauncher::new_exit(2, b"o", b"e");

        let output = tokio_test::block_on(launcher.launch(&command("tool"))).unwrap();

        assert_eq!(output.exit_code, 2);
        assert_eq!(launcher.call_count(), 1);
        assert_eq!(launcher.last_call().unwrap().program, "tool");
    }

    #[test]
    fn test_mock_spawn_failure() {
        let launcher = MockProcessLauncher::new_spawn_fail("no such file");

        let result = tokio_test::block_on(launcher.launch(&command("tool")));

        assert!(matches!(result, Err(LaunchError::SpawnFailed(_))));
        assert_eq!(launcher.calls().len(), 1);
    }
}
