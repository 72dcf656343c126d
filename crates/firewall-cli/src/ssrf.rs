//! Blocks `firewall parse --url` from being used to probe internal network
//! addresses (SSRF prevention).

use crate::error::{CliError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

static BLOCKED_HOSTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(localhost|127\.\d+\.\d+\.\d+|10\.\d+\.\d+\.\d+|\
172\.(1[6-9]|2\d|3[01])\.\d+\.\d+|\
192\.168\.\d+\.\d+|169\.254\.\d+\.\d+|\
\[?::1\]?|0\.0\.0\.0)$",
    )
    .expect("static regex is valid")
});

/// Parses `url`, rejecting non-HTTP(S) schemes and hostnames that resolve to
/// loopback, link-local, or private address ranges.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|_| CliError::UnsupportedScheme(url.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CliError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    let host = parsed.host_str().unwrap_or("");
    if BLOCKED_HOSTS.is_match(host) {
        return Err(CliError::BlockedHost(host.to_string()));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_localhost() {
        assert!(validate_url("http://localhost/secrets").is_err());
    }

    #[test]
    fn test_blocks_loopback_ip() {
        assert!(validate_url("http://127.0.0.1:8080/").is_err());
    }

    #[test]
    fn test_blocks_private_ranges() {
        assert!(validate_url("http://10.0.0.5/").is_err());
        assert!(validate_url("http://172.16.0.1/").is_err());
        assert!(validate_url("http://192.168.1.1/").is_err());
    }

    #[test]
    fn test_blocks_non_http_scheme() {
        assert!(validate_url("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_allows_public_host() {
        assert!(validate_url("https://gist.githubusercontent.com/foo/bar.md").is_ok());
    }
}
