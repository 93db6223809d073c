//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(|cow| cow.into_owned())
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDV_TEST_SERVER", "https://uml.example.com");
        }
        let result = expand_env("${MDV_TEST_SERVER}", "plantuml.server_url").unwrap();
        assert_eq!(result, "https://uml.example.com");
        unsafe {
            std::env::remove_var("MDV_TEST_SERVER");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDV_UNSET_TEST");
        }
        let result = expand_env("${MDV_UNSET_TEST:-http://localhost}", "plantuml.server_url").unwrap();
        assert_eq!(result, "http://localhost");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDV_HOST_TEST", "uml.internal");
        }
        let result = expand_env("https://${MDV_HOST_TEST}/plantuml", "plantuml.server_url").unwrap();
        assert_eq!(result, "https://uml.internal/plantuml");
        unsafe {
            std::env::remove_var("MDV_HOST_TEST");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDV_MISSING_TEST");
        }
        let err = expand_env("${MDV_MISSING_TEST}", "plantuml.server_url").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MDV_MISSING_TEST"));
        assert!(err.to_string().contains("plantuml.server_url"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        assert_eq!(
            expand_env("https://www.plantuml.com/plantuml", "f").unwrap(),
            "https://www.plantuml.com/plantuml"
        );
        assert_eq!(expand_env("https://x.com/$path", "f").unwrap(), "https://x.com/$path");
    }
}
