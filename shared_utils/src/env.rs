use std::path::PathBuf;

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an optional override. Unset and blank values are both `None`.
pub fn env_override(name: &str) -> Option<String> {
    get_env_var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Like [`env_override`] but yields a filesystem path.
pub fn env_path_override(name: &str) -> Option<PathBuf> {
    env_override(name).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_is_reported_by_name() {
        let err = get_env_var("SHARED_UTILS_SURELY_UNSET_VAR").unwrap_err();
        assert_eq!(err.0, "SHARED_UTILS_SURELY_UNSET_VAR");
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SHARED_UTILS_SURELY_UNSET_VAR"
        );
    }

    #[test]
    fn unset_override_is_none() {
        assert!(env_override("SHARED_UTILS_SURELY_UNSET_VAR").is_none());
        assert!(env_path_override("SHARED_UTILS_SURELY_UNSET_VAR").is_none());
    }
}
