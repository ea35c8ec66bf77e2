// Debug toggle parsing
use crate::application::constants::TRUTHY_TOKENS;
use crate::domain::RunnerConfig;
use crate::port::EnvironmentProbe;
use tracing::debug;

/// Parse a boolean flag value against `TRUTHY_TOKENS`
///
/// Anything else, including the empty string, is false.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    TRUTHY_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(value))
}

/// Whether the runner should echo each resolved command
pub fn debug_print_enabled(config: &RunnerConfig, env: &dyn EnvironmentProbe) -> bool {
    let var = config.debug_print_var_name();
    let enabled = env.var(&var).map(|v| parse_flag(&v)).unwrap_or(false);

    debug!(var = %var, enabled = %enabled, "Debug print toggle resolved");

    enabled
}
