//! Maps file extensions and markdown fence tags to a [`Language`].

use firewall_core::Language;

/// Detects a language from a file path's extension. Unrecognized or missing
/// extensions map to [`Language::Unknown`].
pub fn detect_language(file_path: &str) -> Language {
    let suffix = file_path.rsplit('.').next().unwrap_or("");
    match suffix.to_ascii_lowercase().as_str() {
        "py" | "pyi" => Language::Python,
        "js" | "jsx" | "mjs" => Language::Javascript,
        "ts" | "tsx" => Language::Typescript,
        _ => Language::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_python() {
        assert_eq!(detect_language("a/b.py"), Language::Python);
        assert_eq!(detect_language("stub.pyi"), Language::Python);
    }

    #[test]
    fn test_detect_javascript() {
        assert_eq!(detect_language("app.js"), Language::Javascript);
        assert_eq!(detect_language("comp.jsx"), Language::Javascript);
    }

    #[test]
    fn test_detect_typescript() {
        assert_eq!(detect_language("app.ts"), Language::Typescript);
        assert_eq!(detect_language("comp.tsx"), Language::Typescript);
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_language("README.md"), Language::Unknown);
        assert_eq!(detect_language("noext"), Language::Unknown);
    }
}
