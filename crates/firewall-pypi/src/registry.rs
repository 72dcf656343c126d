//! PyPI registry client.
//!
//! Verifies package existence and fetches flat metadata from PyPI's JSON
//! API (<https://pypi.org/pypi/{package}/json>). Results are cached by a
//! shared [`RegistryCache`] under the `pypi:exists:{name}` / `pypi:info:{name}`
//! key scheme.

use crate::error::{PypiError, Result};
use crate::types::{PypiDocument, PypiPackageInfo};
use firewall_core::RegistryCache;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const PYPI_BASE: &str = "https://pypi.org/pypi";

/// Normalizes a package name the way the import checker does before
/// looking it up: lowercase, with underscores turned into hyphens.
///
/// This is narrower than full PEP 503 normalization (it doesn't fold dots
/// or collapse repeated separators) because it only needs to match names
/// as they commonly appear in `import` statements.
///
/// # Examples
///
/// ```
/// use firewall_pypi::registry::normalize_package_name;
/// assert_eq!(normalize_package_name("Flask"), "flask");
/// assert_eq!(normalize_package_name("django_rest_framework"), "django-rest-framework");
/// ```
pub fn normalize_package_name(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

/// Client for checking package existence and metadata on PyPI.
///
/// Network failures during an existence check are treated as "exists" —
/// fail open, so a registry outage never blocks validation on a false
/// positive. Failures during a metadata lookup simply return `None`.
#[derive(Clone)]
pub struct PypiRegistry {
    client: Client,
    cache: Arc<RegistryCache>,
}

impl PypiRegistry {
    /// Builds a registry client with the given request timeout, backed by
    /// `cache` for existence/info lookups.
    pub fn new(cache: Arc<RegistryCache>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| PypiError::registry("<client-build>", e))?;
        Ok(Self { client, cache })
    }

    /// Returns whether `package_name` exists on PyPI.
    ///
    /// Fails open: a transport-level error is treated as "exists" and is
    /// never cached, so a transient outage is retried on the next call.
    pub async fn package_exists(&self, package_name: &str) -> bool {
        if package_name.trim().is_empty() {
            return false;
        }

        let cache_key = format!("pypi:exists:{package_name}");
        if let Ok(Some(cached)) = self.cache.get(&cache_key) {
            if let Some(exists) = cached.as_bool() {
                return exists;
            }
        }

        match self
            .client
            .get(format!("{PYPI_BASE}/{package_name}/json"))
            .send()
            .await
        {
            Ok(response) => {
                let exists = response.status().is_success();
                let _ = self.cache.set(&cache_key, &serde_json::json!(exists));
                exists
            }
            Err(e) => {
                tracing::debug!(package = package_name, error = %e, "PyPI existence check failed, failing open");
                true
            }
        }
    }

    /// Fetches flat metadata for `package_name`, or `None` if it doesn't
    /// exist or the request/parse fails.
    pub async fn get_package_info(&self, package_name: &str) -> Option<PypiPackageInfo> {
        let cache_key = format!("pypi:info:{package_name}");
        if let Ok(Some(cached)) = self.cache.get(&cache_key) {
            if let Ok(info) = serde_json::from_value::<PypiPackageInfo>(cached) {
                return Some(info);
            }
        }

        let response = self
            .client
            .get(format!("{PYPI_BASE}/{package_name}/json"))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let body = response.text().await.ok()?;
        let doc: PypiDocument = serde_json::from_str(&body).ok()?;

        let info = PypiPackageInfo {
            name: doc.info.name,
            version: doc.info.version,
            summary: doc.info.summary,
            requires_python: doc.info.requires_python,
        };

        let _ = self.cache.set(&cache_key, &serde_json::to_value(&info).ok()?);
        Some(info)
    }

    /// Closes the underlying HTTP client.
    ///
    /// `reqwest::Client` has no explicit close; this exists for interface
    /// symmetry with the pipeline's shutdown sequence.
    pub async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache() -> Arc<RegistryCache> {
        Arc::new(RegistryCache::open_in_memory(3600).unwrap())
    }

    #[test]
    fn test_normalize_package_name() {
        assert_eq!(normalize_package_name("Flask"), "flask");
        assert_eq!(
            normalize_package_name("django_rest_framework"),
            "django-rest-framework"
        );
    }

    #[tokio::test]
    async fn test_empty_package_name_does_not_exist() {
        let registry = PypiRegistry::new(test_cache(), 10).unwrap();
        assert!(!registry.package_exists("").await);
        assert!(!registry.package_exists("   ").await);
    }

    #[tokio::test]
    async fn test_exists_cache_hit_skips_network() {
        let cache = test_cache();
        cache.set("pypi:exists:requests", &serde_json::json!(true)).unwrap();
        let registry = PypiRegistry::new(cache, 10).unwrap();
        assert!(registry.package_exists("requests").await);
    }

    #[tokio::test]
    async fn test_info_cache_hit_skips_network() {
        let cache = test_cache();
        let info = PypiPackageInfo {
            name: "requests".into(),
            version: "2.31.0".into(),
            summary: Some("HTTP for Humans".into()),
            requires_python: Some(">=3.8".into()),
        };
        cache
            .set("pypi:info:requests", &serde_json::to_value(&info).unwrap())
            .unwrap();
        let registry = PypiRegistry::new(cache, 10).unwrap();
        let fetched = registry.get_package_info("requests").await.unwrap();
        assert_eq!(fetched, info);
    }
}
