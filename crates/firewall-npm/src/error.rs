//! Errors specific to the npm registry client.

use thiserror::Error;

/// Errors raised while querying the npm registry.
#[derive(Error, Debug)]
pub enum NpmError {
    /// npm registry request failed.
    #[error("npm registry request failed for '{package}': {source}")]
    Registry {
        package: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to deserialize an npm API response.
    #[error("failed to parse npm API response for '{package}': {source}")]
    ApiResponse {
        package: String,
        #[source]
        source: serde_json::Error,
    },

    /// Cache-layer failure surfaced while checking or storing a lookup.
    #[error("cache error: {0}")]
    Cache(#[from] firewall_core::FirewallError),
}

/// Result type alias for npm registry operations.
pub type Result<T> = std::result::Result<T, NpmError>;

impl NpmError {
    /// Builds a [`NpmError::Registry`] from a `reqwest` failure.
    pub fn registry(package: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Registry {
            package: package.into(),
            source,
        }
    }

    /// Builds a [`NpmError::ApiResponse`] from a deserialization failure.
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
        let err = NpmError::api_response("lodash", json_err);
        assert!(err.to_string().contains("lodash"));
    }

    #[test]
    fn test_cache_error_from_core() {
        let core_err = firewall_core::FirewallError::Cache("boom".into());
        let err: NpmError = core_err.into();
        assert!(err.to_string().contains("boom"));
    }
}
