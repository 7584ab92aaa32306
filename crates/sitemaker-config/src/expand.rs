//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

/// A `${VAR}` reference without a `:-default`.
static REQUIRED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("invalid env var regex")
});

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present,
/// so URLs containing a bare `$` pass through untouched. Substituted values
/// are never expanded again, so a value may itself contain `${...}`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    // Required references are checked against the input, before substitution.
    if let Some(var) = REQUIRED_PATTERN
        .captures_iter(value)
        .map(|caps| caps[1].to_owned())
        .find(|var| std::env::var(var).is_err())
    {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var}}} not set"),
        });
    }

    // Unset variables resolve to None so `:-default` applies.
    Ok(shellexpand::env_with_context_no_errors(value, |var| std::env::var(var).ok()).into_owned())
}
