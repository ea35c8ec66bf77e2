// Runner constants (No magic values)

/// Values of the debug toggle variable that enable command echo
/// (compared case-insensitively after trimming)
pub const TRUTHY_TOKENS: &[&str] = &["1", "true", "yes", "on", "y", "t"];

/// Quote delimiting a Windows argument that contains a space
pub const WINDOWS_ARG_QUOTE: char = '"';
