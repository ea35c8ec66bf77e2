// Script runner: executes command-line entry points for end-to-end tests
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::command_resolution::resolve_command;
use crate::application::debug_flag::debug_print_enabled;
use crate::application::path_resolution::resolve_paths;
use crate::domain::{CommandLine, CommandResult, ResolvedCommand, ResolvedPaths, RunnerConfig};
use crate::error::{Result, RunnerError};
use crate::port::{EnvironmentProbe, FileSystemProbe, ProcessLauncher};

/// Receives the debug echo line for each resolved command
pub type DebugEcho = Arc<dyn Fn(&str) + Send + Sync>;

/// Line echoed before a command runs when debug printing is enabled
pub fn echo_line(resolved: &ResolvedCommand) -> String {
    format!("Running command '{}'", resolved)
}

/// Runs scripts and returns exit code, stdout and stderr
///
/// Finds local scripts and local modules when the package runs from its
/// development checkout, otherwise runs the installed entry points.
/// Development paths are resolved once, in [`ScriptRunner::new`], and never
/// change for the lifetime of the instance.
///
/// # Example
/// ```text
/// let runner = ScriptRunner::new(config, &StdFileSystem, env, launcher);
/// let result = runner.run_command(["my-script", "--help"], true).await?;
/// assert_eq!(result.exit_code, 0);
/// ```
pub struct ScriptRunner {
    config: RunnerConfig,
    paths: ResolvedPaths,
    debug_print: bool,
    echo: DebugEcho,
    env: Arc<dyn EnvironmentProbe>,
    launcher: Arc<dyn ProcessLauncher>,
}

impl ScriptRunner {
    /// Create a runner, probing the file system and environment once
    ///
    /// Missing directories or variables are not errors; they mean the
    /// package is treated as installed.
    pub fn new(
        config: RunnerConfig,
        fs: &dyn FileSystemProbe,
        env: Arc<dyn EnvironmentProbe>,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> Self {
        let paths = resolve_paths(&config, fs, env.as_ref());
        let debug_print = debug_print_enabled(&config, env.as_ref());

        Self {
            config,
            paths,
            debug_print,
            echo: Arc::new(|line: &str| println!("{}", line)),
            env,
            launcher,
        }
    }

    /// Send the debug echo somewhere other than stdout
    ///
    /// # Example
    /// ```text
    /// let runner = runner.with_debug_echo(|line| eprintln!("{}", line));
    /// ```
    pub fn with_debug_echo<F>(mut self, echo: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.echo = Arc::new(echo);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub fn debug_print_enabled(&self) -> bool {
        self.debug_print
    }

    /// Build the invocation for `cmd` without running it
    ///
    /// # Errors
    /// - RunnerError::InvalidArgument if `cmd` is empty
    pub fn resolve(&self, cmd: impl Into<CommandLine>) -> Result<ResolvedCommand> {
        let cmd = cmd.into();
        let inherited = self.env.var(&self.config.module_path_var);
        resolve_command(&cmd, &self.config, &self.paths, inherited.as_deref())
    }

    /// Run command `cmd`, returning exit code and processed stdout/stderr
    ///
    /// # Arguments
    /// * `cmd` - command name, or name followed by arguments
    /// * `check_code` - if true, a non-zero exit code is an error
    ///
    /// # Errors
    /// - RunnerError::InvalidArgument if `cmd` is empty
    /// - RunnerError::CommandFailed if `check_code` is set and the exit code is non-zero
    /// - RunnerError::Launch if the process cannot be spawned or read
    pub async fn run_command(
        &self,
        cmd: impl Into<CommandLine>,
        check_code: bool,
    ) -> Result<CommandResult> {
        let resolved = self.resolve(cmd)?;

        if self.debug_print {
            (self.echo)(&echo_line(&resolved));
        }
        debug!(
            program = %resolved.program,
            args = ?resolved.args,
            env_overrides = ?resolved.env_overrides,
            "Running command"
        );

        let output = self.launcher.launch(&resolved).await?;

        info!(
            command = %resolved,
            exit_code = %output.exit_code,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Command completed"
        );

        if check_code && output.exit_code != 0 {
            warn!(
                command = %resolved,
                exit_code = %output.exit_code,
                "Command exited with non-zero code"
            );
            return Err(RunnerError::CommandFailed {
                command: resolved.to_string(),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        let processor = &self.config.output_processor;
        Ok(CommandResult {
            exit_code: output.exit_code,
            stdout: processor.apply(output.stdout),
            stderr: processor.apply(output.stderr),
        })
    }

    /// Blocking variant of [`ScriptRunner::run_command`] for synchronous tests
    ///
    /// Drives the command on a private current-thread runtime, so it must not
    /// be called from inside an async context.
    pub fn run_command_blocking(
        &self,
        cmd: impl Into<CommandLine>,
        check_code: bool,
    ) -> Result<CommandResult> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run_command(cmd, check_code))
    }
}

impl std::fmt::Debug for ScriptRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptRunner")
            .field("config", &self.config)
            .field("paths", &self.paths)
            .field("debug_print", &self.debug_print)
            .finish_non_exhaustive()
    }
}
