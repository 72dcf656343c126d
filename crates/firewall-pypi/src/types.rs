//! Wire types for the PyPI registry API.

use serde::Deserialize;

/// The subset of a PyPI `/pypi/{name}/json` document this client cares about.
#[derive(Debug, Deserialize)]
pub(crate) struct PypiDocument {
    pub info: PypiInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PypiInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub requires_python: Option<String>,
}

/// Flat package metadata projection returned by
/// [`crate::registry::PypiRegistry::get_package_info`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct PypiPackageInfo {
    pub name: String,
    pub version: String,
    pub summary: Option<String>,
    pub requires_python: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_document() {
        let raw = r#"{"info": {"name": "requests", "version": "2.31.0", "summary": "HTTP for Humans", "requires_python": ">=3.8"}}"#;
        let doc: PypiDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.info.name, "requests");
        assert_eq!(doc.info.requires_python.as_deref(), Some(">=3.8"));
    }

    #[test]
    fn test_deserialize_missing_optional_fields() {
        let raw = r#"{"info": {"name": "requests", "version": "2.31.0"}}"#;
        let doc: PypiDocument = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.info.summary, None);
        assert_eq!(doc.info.requires_python, None);
    }
}
