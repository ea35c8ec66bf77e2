// Environment Probe Port (for testability)

use std::path::PathBuf;

/// Read-only view of the process environment
///
/// Nothing in the runner writes through this port; child processes get
/// overrides applied to their own copy of the environment.
pub trait EnvironmentProbe: Send + Sync {
    /// Value of variable `name`, `None` if unset or not valid unicode
    fn var(&self, name: &str) -> Option<String>;

    /// Current working directory, `None` if it cannot be determined
    fn current_dir(&self) -> Option<PathBuf>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;

    /// Fixed environment for testing
    #[derive(Default)]
    pub struct MockEnvironment {
        vars: HashMap<String, String>,
        cwd: Option<PathBuf>,
    }

    impl MockEnvironment {
        pub fn new() -> Self {
            Self::default()
        }
        pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.vars.insert(name.into(), value.into());
            self
        }
        pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
            self.cwd = Some(cwd.into());
            self
        }
    }

    impl EnvironmentProbe for MockEnvironment {
        fn var(&self, name: &str) -> Option<String> {
            self.vars.get(name).cloned()
        }
        fn current_dir(&self) -> Option<PathBuf> {
            self.cwd.clone()
        }
    }
}
