// Host platform model (which OS code path a command is resolved for)

/// OS family a command line is resolved for
///
/// Windows installs console entry points as `.bat` shims and delimits
/// arguments by quoting; POSIX passes each argument as a discrete element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    Posix,
}

impl HostPlatform {
    /// Platform of the running binary
    pub const fn current() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Posix
        }
    }

    /// Separator between entries of a search-path variable
    pub const fn path_separator(self) -> char {
        match self {
            HostPlatform::Windows => ';',
            HostPlatform::Posix => ':',
        }
    }

    pub const fn is_windows(self) -> bool {
        matches!(self, HostPlatform::Windows)
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostPlatform::Windows => write!(f, "windows"),
            HostPlatform::Posix => write!(f, "posix"),
        }
    }
}
