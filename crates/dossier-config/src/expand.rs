//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Bare `$VAR` is left as is. An unset variable without a default is an
/// error naming `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DOSSIER_TEST_EXPAND_OUT", "site");
        }
        let result = expand_env("build/${DOSSIER_TEST_EXPAND_OUT}", "outputs.path").unwrap();
        assert_eq!(result, "build/site");
        unsafe {
            std::env::remove_var("DOSSIER_TEST_EXPAND_OUT");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DOSSIER_TEST_EXPAND_UNSET");
        }
        let result = expand_env("${DOSSIER_TEST_EXPAND_UNSET:-docs}", "outputs.path").unwrap();
        assert_eq!(result, "docs");
    }

    #[test]
    fn test_expand_missing_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DOSSIER_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${DOSSIER_TEST_EXPAND_MISSING}", "project.source").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("DOSSIER_TEST_EXPAND_MISSING"));
        assert!(message.contains("project.source"));
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        assert_eq!(expand_env("$HOME/docs", "outputs.path").unwrap(), "$HOME/docs");
    }
}
