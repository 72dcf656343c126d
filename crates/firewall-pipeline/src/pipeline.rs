//! Orchestrates the layered validation pipeline: syntax, imports,
//! signatures, and deprecations.

use crate::error::{PipelineError, Result};
use crate::language::detect_language;
use firewall_analyzer::{
    FunctionCallExtractor, check_deprecations, check_js_imports, check_python_imports,
    check_signatures, extract_import_aliases, extract_imports, rewrite_call_alias, validate_syntax,
};
use firewall_core::{
    FirewallConfig, IssueType, Language, RegistryCache, Severity, SourceLocation, ValidationIssue,
    ValidationResult, load_config,
};
use firewall_npm::NpmRegistry;
use firewall_pypi::PypiRegistry;
use std::sync::Arc;

/// Maximum size of a single file passed to [`ValidationPipeline::validate_file`].
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Runs the four-layer hallucination check over a piece of code.
///
/// Layer 1 (syntax) gates everything downstream: once tree-sitter reports an
/// `ERROR`/missing node the rest of the AST can't be trusted, so layers 2-4
/// are skipped and the result is returned immediately.
pub struct ValidationPipeline {
    config: FirewallConfig,
    pypi: Arc<PypiRegistry>,
    npm: Arc<NpmRegistry>,
}

impl ValidationPipeline {
    /// Builds a pipeline from `config`, or from the discovered `.firewall.toml`
    /// (falling back to defaults) when `config` is `None`.
    pub fn new(config: Option<FirewallConfig>) -> Result<Self> {
        let config = match config {
            Some(c) => c,
            None => load_config(None)?,
        };
        let cache = Arc::new(RegistryCache::open(
            &config.cache_dir,
            config.cache_ttl_seconds,
        )?);
        let pypi = Arc::new(PypiRegistry::new(
            Arc::clone(&cache),
            config.registries.timeout_seconds,
        )?);
        let npm = Arc::new(NpmRegistry::new(cache, config.registries.timeout_seconds)?);

        Ok(Self {
            config,
            pypi,
            npm,
        })
    }

    /// Runs every layer over `code`, treating it as a file at `file_path`
    /// (used only to pick a [`Language`] and to label issues).
    pub async fn validate_code(&self, code: &str, file_path: &str) -> ValidationResult {
        let language = detect_language(file_path);
        let checked_at = chrono::Utc::now().to_rfc3339();

        let syntax_issues = validate_syntax(code, language, file_path);
        if !syntax_issues.is_empty() {
            tracing::debug!(
                file = file_path,
                issues = syntax_issues.len(),
                "syntax gate failed, skipping remaining layers"
            );
            return ValidationResult {
                file: file_path.to_string(),
                language,
                issues: syntax_issues,
                passed: false,
                checked_at,
            };
        }

        let mut issues = Vec::new();

        let imports = extract_imports(code, language);
        let import_issues = match language {
            Language::Python => check_python_imports(&imports, file_path, &self.pypi).await,
            Language::Javascript | Language::Typescript => {
                check_js_imports(&imports, file_path, &self.npm).await
            }
            Language::Unknown => Vec::new(),
        };
        issues.extend(import_issues);

        if language == Language::Python {
            let mut extractor = FunctionCallExtractor::new();
            let mut calls = extractor.extract_calls(code);
            let aliases = extract_import_aliases(code, language);
            for call in &mut calls {
                call.name = rewrite_call_alias(&call.name, &aliases);
            }
            issues.extend(check_signatures(&calls, file_path));
            issues.extend(check_deprecations(&calls, file_path));
        }

        let passed = issues.iter().all(|i| i.severity != firewall_core::Severity::Error);
        ValidationResult {
            file: file_path.to_string(),
            language,
            issues,
            passed,
            checked_at,
        }
    }

    /// Reads `file_path` from disk and validates its contents.
    ///
    /// Files over [`MAX_FILE_SIZE`] and files that fail to decode as UTF-8
    /// are not read/parsed; both are recovered locally into a single
    /// error-severity issue on the returned result rather than aborting the
    /// caller's batch. Only a failure to stat the file at all (missing,
    /// permission denied) propagates as an `Err`.
    pub async fn validate_file(&self, file_path: &str) -> Result<ValidationResult> {
        let metadata = tokio::fs::metadata(file_path)
            .await
            .map_err(|source| PipelineError::ReadFile {
                path: file_path.to_string(),
                source,
            })?;
        if metadata.len() > MAX_FILE_SIZE {
            tracing::warn!(file = file_path, size = metadata.len(), "file exceeds max size, rejecting");
            return Ok(unreadable_file_result(
                file_path,
                format!(
                    "File exceeds maximum size ({} MB)",
                    MAX_FILE_SIZE / (1024 * 1024)
                ),
            ));
        }

        match tokio::fs::read_to_string(file_path).await {
            Ok(code) => Ok(self.validate_code(&code, file_path).await),
            Err(source) if source.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!(file = file_path, "cannot decode file as utf-8, rejecting");
                Ok(unreadable_file_result(
                    file_path,
                    format!("Cannot decode file: {source}"),
                ))
            }
            Err(source) => Err(PipelineError::ReadFile {
                path: file_path.to_string(),
                source,
            }),
        }
    }

    /// Exposed for tests and callers that need the resolved configuration
    /// (e.g. the CLI's `--language` override).
    pub fn config(&self) -> &FirewallConfig {
        &self.config
    }

    /// Clears expired cache entries and drops the registry clients. The
    /// underlying `reqwest::Client`s have no explicit teardown; this exists
    /// for symmetry with callers that manage pipeline lifecycle explicitly
    /// (the HTTP service's shutdown hook, the CLI's `finally`-equivalent).
    pub async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Builds the single-issue, failed [`ValidationResult`] returned when a file
/// can't be read at all (too large, undecodable), mirroring the shape every
/// other layer produces rather than surfacing a bare I/O error.
fn unreadable_file_result(file_path: &str, message: String) -> ValidationResult {
    ValidationResult {
        file: file_path.to_string(),
        language: Language::Unknown,
        issues: vec![ValidationIssue {
            severity: Severity::Error,
            issue_type: IssueType::SyntaxError,
            location: SourceLocation::at_line(file_path, 0),
            message,
            suggestion: None,
            confidence: 1.0,
            source: "runner".to_string(),
        }],
        passed: false,
        checked_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_core::Severity;

    fn test_pipeline(tmp: &tempfile::TempDir) -> ValidationPipeline {
        let config = FirewallConfig {
            cache_dir: tmp.path().to_path_buf(),
            ..Default::default()
        };
        ValidationPipeline::new(Some(config)).unwrap()
    }

    #[tokio::test]
    async fn test_syntax_error_short_circuits_other_layers() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let result = pipeline.validate_code("def f(:\n    pass\n", "a.py").await;
        assert!(!result.passed);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].issue_type, firewall_core::IssueType::SyntaxError);
    }

    #[tokio::test]
    async fn test_deprecated_call_flagged_as_warning_not_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let result = pipeline.validate_code("os.popen('ls')\n", "a.py").await;
        assert!(result.issues.iter().any(|i| i.severity == Severity::Warning));
    }

    #[tokio::test]
    async fn test_clean_python_passes() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let result = pipeline
            .validate_code("import os\nprint(os.getcwd())\n", "a.py")
            .await;
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_unknown_language_skips_import_and_signature_layers() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let result = pipeline.validate_code("print('hi')\n", "a.txt").await;
        assert_eq!(result.language, Language::Unknown);
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_aliased_stdlib_call_checked_against_canonical_signature() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let result = pipeline
            .validate_code(
                "import os.path as ospath\nospath.join(a, b, c, d, e)\n",
                "a.py",
            )
            .await;
        assert!(
            result
                .issues
                .iter()
                .any(|i| i.issue_type == firewall_core::IssueType::WrongSignature)
        );
    }

    #[tokio::test]
    async fn test_oversized_file_recovers_into_failed_result() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let path = tmp.path().join("big.py");
        tokio::fs::write(&path, vec![b'a'; (MAX_FILE_SIZE + 1) as usize])
            .await
            .unwrap();

        let result = pipeline
            .validate_file(&path.to_string_lossy())
            .await
            .unwrap();
        assert!(!result.passed);
        assert_eq!(result.language, Language::Unknown);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].source, "runner");
    }

    #[tokio::test]
    async fn test_undecodable_file_recovers_into_failed_result() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let path = tmp.path().join("bad.py");
        tokio::fs::write(&path, [0xff, 0xfe, 0xfd]).await.unwrap();

        let result = pipeline
            .validate_file(&path.to_string_lossy())
            .await
            .unwrap();
        assert!(!result.passed);
        assert_eq!(result.language, Language::Unknown);
        assert!(result.issues[0].message.contains("Cannot decode file"));
    }

    #[tokio::test]
    async fn test_missing_file_still_returns_err() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(&tmp);
        let missing = tmp.path().join("nope.py");
        assert!(pipeline.validate_file(&missing.to_string_lossy()).await.is_err());
    }
}
