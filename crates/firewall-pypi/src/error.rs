//! Errors specific to the PyPI registry client.

use thiserror::Error;

/// Errors raised while querying the PyPI registry.
#[derive(Error, Debug)]
pub enum PypiError {
    /// PyPI registry request failed.
    #[error("PyPI registry request failed for '{package}': {source}")]
    Registry {
        package: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to deserialize a PyPI API response.
    #[error("failed to parse PyPI API response for '{package}': {source}")]
    ApiResponse {
        package: String,
        #[source]
        source: serde_json::Error,
    },

    /// Cache-layer failure surfaced while checking or storing a lookup.
    #[error("cache error: {0}")]
    Cache(#[from] firewall_core::FirewallError),
}

/// Result type alias for PyPI registry operations.
pub type Result<T> = std::result::Result<T, PypiError>;

impl PypiError {
    /// Builds a [`PypiError::Registry`] from a `reqwest` failure.
    pub fn registry(package: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Registry {
            package: package.into(),
            source,
        }
    }

    /// Builds a [`PypiError::ApiResponse`] from a deserialization failure.
    pub fn api_response(package: impl Into<String>, source: serde_json::Error) -> Self {
        Self::ApiResponse {
            package: package.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = PypiError::api_response("requests", json_err);
        assert!(err.to_string().contains("requests"));
    }

    #[test]
    fn test_cache_error_from_core() {
        let core_err = firewall_core::FirewallError::Cache("boom".into());
        let err: PypiError = core_err.into();
        assert!(err.to_string().contains("boom"));
    }
}
