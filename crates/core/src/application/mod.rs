// Application Layer - Use Cases

pub mod command_resolution;
pub mod constants;
pub mod debug_flag;
pub mod path_resolution;
pub mod script_runner;

// Re-exports
pub use script_runner::{echo_line, DebugEcho, ScriptRunner};
