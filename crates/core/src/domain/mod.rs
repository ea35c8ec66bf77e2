// Domain Layer - Pure value types

pub mod command;
pub mod config;
pub mod gradient_table;
pub mod output;
pub mod platform;

// Re-exports
pub use command::{CommandLine, CommandResult, ResolvedCommand};
pub use config::{ResolvedPaths, RunnerConfig};
pub use gradient_table::GradientTable;
pub use output::OutputProcessor;
pub use platform::HostPlatform;
