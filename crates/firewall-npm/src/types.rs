//! Wire types for the npm registry API.

use serde::Deserialize;

/// The subset of an npm registry document this client cares about.
#[derive(Debug, Deserialize)]
pub(crate) struct NpmPackageDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: NpmDistTags,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NpmDistTags {
    #[serde(default)]
    pub latest: String,
}

/// Flat package metadata projection returned by
/// [`crate::registry::NpmRegistry::get_package_info`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct NpmPackageInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_document() {
        let raw = r#"{"name": "lodash", "description": "a utility library", "dist-tags": {"latest": "4.17.21"}}"#;
        let doc: NpmPackageDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.name.as_deref(), Some("lodash"));
        assert_eq!(doc.dist_tags.latest, "4.17.21");
    }

    #[test]
    fn test_deserialize_missing_dist_tags() {
        let raw = r#"{"name": "lodash"}"#;
        let doc: NpmPackageDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.dist_tags.latest, "");
    }
}
