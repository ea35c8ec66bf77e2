// dmri-testkit Infrastructure - System Adapters
// Implements: ProcessLauncher, FileSystemProbe, EnvironmentProbe

pub mod gradient_io;
pub mod std_probes;
pub mod subprocess_launcher;

use std::sync::Arc;

use dmri_testkit_core::domain::RunnerConfig;
use dmri_testkit_core::ScriptRunner;

pub use gradient_io::{read_gradient_table, write_gradient_table};
pub use std_probes::{ProcessEnvironment, StdFileSystem};
pub use subprocess_launcher::SubprocessLauncher;

/// ScriptRunner wired to the real file system, environment and subprocesses
pub fn system_script_runner(config: RunnerConfig) -> ScriptRunner {
    ScriptRunner::new(
        config,
        &StdFileSystem,
        Arc::new(ProcessEnvironment),
        Arc::new(SubprocessLauncher::new()),
    )
}
