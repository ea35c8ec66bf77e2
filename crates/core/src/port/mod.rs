// Port Layer - Interfaces for external dependencies

pub mod environment;
pub mod file_system;
pub mod process_launcher;

// Re-exports
pub use environment::EnvironmentProbe;
pub use file_system::FileSystemProbe;
pub use process_launcher::{LaunchError, ProcessLauncher, RawOutput};
