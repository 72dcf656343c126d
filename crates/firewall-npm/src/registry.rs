//! npm registry client.
//!
//! Verifies package existence and fetches flat metadata from the npm
//! registry (<https://registry.npmjs.org/{package}>). Results are cached by
//! a shared [`RegistryCache`] under the `npm:exists:{name}` / `npm:info:{name}`
//! key scheme, so a process that repeatedly checks the same package only
//! pays the network cost once per TTL window.

use crate::error::{NpmError, Result};
use crate::types::{NpmPackageDocument, NpmPackageInfo};
use firewall_core::RegistryCache;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const REGISTRY_BASE: &str = "https://registry.npmjs.org";

/// Client for checking package existence and metadata on the npm registry.
///
/// Network failures during an existence check are treated as "exists" —
/// fail open, so a registry outage never blocks validation on a false
/// positive. Failures during a metadata lookup simply return `None`.
#[derive(Clone)]
pub struct NpmRegistry {
    client: Client,
    cache: Arc<RegistryCache>,
}

impl NpmRegistry {
    /// Builds a registry client with the given request timeout, backed by
    /// `cache` for existence/info lookups.
    pub fn new(cache: Arc<RegistryCache>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| NpmError::registry("<client-build>", e))?;
        Ok(Self { client, cache })
    }

    /// Returns whether `package_name` exists on npm.
    ///
    /// Fails open: a transport-level error is treated as "exists" and is
    /// never cached, so a transient outage is retried on the next call.
    pub async fn package_exists(&self, package_name: &str) -> bool {
        if package_name.trim().is_empty() {
            return false;
        }

        let cache_key = format!("npm:exists:{package_name}");
        if let Ok(Some(cached)) = self.cache.get(&cache_key) {
            if let Some(exists) = cached.as_bool() {
                return exists;
            }
        }

        match self
            .client
            .get(format!("{REGISTRY_BASE}/{package_name}"))
            .send()
            .await
        {
            Ok(response) => {
                let exists = response.status().is_success();
                let _ = self.cache.set(&cache_key, &serde_json::json!(exists));
                exists
            }
            Err(e) => {
                tracing::debug!(package = package_name, error = %e, "npm existence check failed, failing open");
                true
            }
        }
    }

    /// Fetches flat metadata for `package_name`, or `None` if it doesn't
    /// exist or the request/parse fails.
    pub async fn get_package_info(&self, package_name: &str) -> Option<NpmPackageInfo> {
        let cache_key = format!("npm:info:{package_name}");
        if let Ok(Some(cached)) = self.cache.get(&cache_key) {
            if let Ok(info) = serde_json::from_value::<NpmPackageInfo>(cached) {
                return Some(info);
            }
        }

        let response = self
            .client
            .get(format!("{REGISTRY_BASE}/{package_name}"))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let body = response.text().await.ok()?;
        let doc: NpmPackageDocument = serde_json::from_str(&body).ok()?;

        let info = NpmPackageInfo {
            name: doc.name.unwrap_or_else(|| package_name.to_string()),
            version: doc.dist_tags.latest,
            description: doc.description.unwrap_or_default(),
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

    #[tokio::test]
    async fn test_empty_package_name_does_not_exist() {
        let registry = NpmRegistry::new(test_cache(), 10).unwrap();
        assert!(!registry.package_exists("").await);
        assert!(!registry.package_exists("   ").await);
    }

    #[tokio::test]
    async fn test_exists_cache_hit_skips_network() {
        let cache = test_cache();
        cache.set("npm:exists:left-pad", &serde_json::json!(true)).unwrap();
        let registry = NpmRegistry::new(cache, 10).unwrap();
        assert!(registry.package_exists("left-pad").await);
    }

    #[tokio::test]
    async fn test_info_cache_hit_skips_network() {
        let cache = test_cache();
        let info = NpmPackageInfo {
            name: "lodash".into(),
            version: "4.17.21".into(),
            description: "a utility library".into(),
        };
        cache
            .set("npm:info:lodash", &serde_json::to_value(&info).unwrap())
            .unwrap();
        let registry = NpmRegistry::new(cache, 10).unwrap();
        let fetched = registry.get_package_info("lodash").await.unwrap();
        assert_eq!(fetched, info);
    }
}
