// dmri-testkit Core - Domain Logic & Ports
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::ScriptRunner;
pub use error::{Result, RunnerError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
