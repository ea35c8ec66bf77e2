// Subprocess launcher implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use dmri_testkit_core::domain::ResolvedCommand;
use dmri_testkit_core::port::{LaunchError, ProcessLauncher, RawOutput};

/// Subprocess launcher
/// Spawns a child with both output streams captured; the environment is
/// inherited with the command's overrides applied to the child only.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubprocessLauncher;

impl SubprocessLauncher {
    /// Create a new subprocess launcher
    ///
    /// # Example
    /// ```ignore
    /// let launcher = SubprocessLauncher::new();
    /// let output = launcher.launch(&resolved).await?;
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Build the tokio command for a resolved invocation
    fn build_command(&self, command: &ResolvedCommand) -> Command {
        let mut cmd = Command::new(program_path(&command.program));

        // Arguments are already quoted for Windows; append them verbatim
        #[cfg(windows)]
        {
            for arg in &command.args {
                cmd.raw_arg(arg);
            }
        }
        #[cfg(not(windows))]
        {
            cmd.args(&command.args);
        }

        cmd.envs(command.env_overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Spawn child process, drain both pipes while waiting for exit
    async fn spawn_and_wait(&self, command: &ResolvedCommand) -> Result<RawOutput, LaunchError> {
        let mut child = self
            .build_command(command)
            .spawn()
            .map_err(|e| LaunchError::SpawnFailed(format!("{}: {}", command.program, e)))?;

        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| LaunchError::IoError("stdout was not captured".to_string()))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| LaunchError::IoError("stderr was not captured".to_string()))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Reading sequentially could deadlock once the other pipe's buffer fills
        let (stdout_res, stderr_res, status) = tokio::join!(
            stdout_pipe.read_to_end(&mut stdout),
            stderr_pipe.read_to_end(&mut stderr),
            child.wait(),
        );
        stdout_res.map_err(|e| LaunchError::IoError(e.to_string()))?;
        stderr_res.map_err(|e| LaunchError::IoError(e.to_string()))?;
        let status = status.map_err(|e| LaunchError::IoError(e.to_string()))?;

        self.terminate_if_running(&mut child)?;

        Ok(RawOutput {
            exit_code: exit_code(status),
            stdout,
            stderr,
        })
    }

    /// Safety net after output collection; the child has normally exited already
    fn terminate_if_running(&self, child: &mut Child) -> Result<(), LaunchError> {
        let still_running = child
            .try_wait()
            .map_err(|e| LaunchError::IoError(e.to_string()))?
            .is_none();

        if still_running {
            warn!(pid = ?child.id(), "Process still running after output collection, terminating");
            terminate(child)?;
        }

        Ok(())
    }
}

/// Program path as passed to the OS; Windows quoting only applies to the command line
fn program_path(program: &str) -> &str {
    if cfg!(windows) {
        program.trim_matches('"')
    } else {
        program
    }
}

/// Exit code, or the negated signal number for a signal death
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

#[cfg(unix)]
fn terminate(child: &mut Child) -> Result<(), LaunchError> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
            .map_err(|e| LaunchError::Killed(format!("SIGTERM failed: {}", e))),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> Result<(), LaunchError> {
    child
        .start_kill()
        .map_err(|e| LaunchError::Killed(e.to_string()))
}

#[async_trait]
impl ProcessLauncher for SubprocessLauncher {
    async fn launch(&self, command: &ResolvedCommand) -> Result<RawOutput, LaunchError> {
        debug!(
            program = %command.program,
            args = ?command.args,
            "Starting subprocess"
        );

        let output = self.spawn_and_wait(command).await?;

        debug!(
            program = %command.program,
            exit_code = %output.exit_code,
            "Subprocess completed"
        );

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn resolved(program: &str, args: &[&str]) -> ResolvedCommand {
        ResolvedCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env_overrides: vec![],
        }
    }

    #[tokio::test]
    async fn test_launch_success() {
        let output = SubprocessLauncher::new()
            .launch(&resolved("echo", &["hello"]))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, b"hello\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_launch_non_zero_exit() {
        let output = SubprocessLauncher::new()
            .launch(&resolved("sh", &["-c", "echo oops >&2; exit 7"]))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 7);
        assert_eq!(output.stderr, b"oops\n");
    }

    #[tokio::test]
    async fn test_launch_missing_program() {
        let result = SubprocessLauncher::new()
            .launch(&resolved("definitely-not-a-real-program-xyz", &[]))
            .await;

        assert!(matches!(result, Err(LaunchError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_large_output_on_both_streams() {
        // Well past a 64KiB pipe buffer on each stream
        let script = "i=0; while [ $i -lt 20000 ]; do echo 0123456789; echo abcdefghij >&2; i=$((i+1)); done";
        let output = SubprocessLauncher::new()
            .launch(&resolved("sh", &["-c", script]))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout.len(), 20000 * 11);
        assert_eq!(output.stderr.len(), 20000 * 11);
    }

    #[tokio::test]
    async fn test_env_override_reaches_child_only() {
        let mut command = resolved("sh", &["-c", "printf %s \"$DMRI_TESTKIT_LAUNCH_PROBE\""]);
        command.env_overrides = vec![(
            "DMRI_TESTKIT_LAUNCH_PROBE".to_string(),
            "child-value".to_string(),
        )];

        let output = SubprocessLauncher::new().launch(&command).await.unwrap();

        assert_eq!(output.stdout, b"child-value");
        assert!(std::env::var("DMRI_TESTKIT_LAUNCH_PROBE").is_err());
    }

    #[tokio::test]
    async fn test_signal_death_is_negative() {
        let output = SubprocessLauncher::new()
            .launch(&resolved("sh", &["-c", "kill -TERM $$"]))
            .await
            .unwrap();

        assert_eq!(output.exit_code, -15);
    }
}
