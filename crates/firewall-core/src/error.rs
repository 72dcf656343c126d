use thiserror::Error;

/// Core error types shared across the firewall workspace.
///
/// All errors provide structured error handling with source error tracking,
/// so a failure in the cache or a registry client can be traced back to its
/// cause without losing context.
///
/// # Examples
///
/// ```
/// use firewall_core::error::{FirewallError, Result};
///
/// fn load(key: &str) -> Result<()> {
///     if key.is_empty() {
///         return Err(FirewallError::Cache("empty key".into()));
///     }
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum FirewallError {
    #[error("cache error: {0}")]
    Cache(String),

    #[error("registry request failed for {package}: {source}")]
    Registry {
        package: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Convenience type alias for `Result<T, FirewallError>`.
///
/// This is the standard `Result` type used throughout the firewall codebase.
pub type Result<T> = std::result::Result<T, FirewallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = FirewallError::Cache("test error".into());
        assert_eq!(error.to_string(), "cache error: test error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: FirewallError = io_err.into();
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_url() {
        let error = FirewallError::InvalidUrl("ftp://example.com".into());
        assert_eq!(error.to_string(), "invalid URL: ftp://example.com");
    }
}
