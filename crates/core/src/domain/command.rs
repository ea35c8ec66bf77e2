// Command Domain Model

use serde::{Serialize, Serializer};

/// Command as supplied by a test: executable/script name followed by arguments
///
/// A single string is a one-element command; it is never split on spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Split into executable name and remaining arguments
    ///
    /// Returns `None` for an empty command.
    pub fn split_first(&self) -> Option<(&str, &[String])> {
        self.0.split_first().map(|(head, rest)| (head.as_str(), rest))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for CommandLine {
    fn from(cmd: &str) -> Self {
        Self(vec![cmd.to_string()])
    }
}

impl From<String> for CommandLine {
    fn from(cmd: String) -> Self {
        Self(vec![cmd])
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

impl From<Vec<&str>> for CommandLine {
    fn from(parts: Vec<&str>) -> Self {
        Self::new(parts)
    }
}

impl From<&[&str]> for CommandLine {
    fn from(parts: &[&str]) -> Self {
        Self::new(parts.iter().copied())
    }
}

impl From<&[String]> for CommandLine {
    fn from(parts: &[String]) -> Self {
        Self(parts.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for CommandLine {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}

/// Fully resolved invocation handed to a process launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Variables set on top of the inherited environment (child only)
    pub env_overrides: Vec<(String, String)>,
}

impl ResolvedCommand {
    /// Program followed by arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl std::fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Outcome of a completed command, after output processing
///
/// Serializes the streams as (lossy) UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub exit_code: i32,
    #[serde(serialize_with = "serialize_lossy")]
    pub stdout: Vec<u8>,
    #[serde(serialize_with = "serialize_lossy")]
    pub stderr: Vec<u8>,
}

fn serialize_lossy<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}
