//! Shared data model for validation results, issues, and configuration.
//!
//! These types are serialized across every external surface — CLI JSON
//! output, SARIF reports, and the HTTP service's `/validate` response — so
//! their `serde` representations are load-bearing and kept in lockstep with
//! a lowercase, snake_case wire form.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// The category of hallucination a validation issue represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    NonexistentPackage,
    NonexistentMethod,
    WrongSignature,
    DeprecatedApi,
    InvalidImport,
    SyntaxError,
    VersionMismatch,
    MissingRequiredArg,
    UnknownParameter,
}

/// A language a code block may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Python,
    Javascript,
    Typescript,
    Unknown,
}

impl Language {
    /// Returns the file extension conventionally associated with this language.
    pub fn extension(self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Javascript => "js",
            Language::Typescript => "ts",
            Language::Unknown => "txt",
        }
    }
}

/// The position of an issue within a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl SourceLocation {
    /// Builds a location at the start of `line` with no column or end span.
    pub fn at_line(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: 0,
            end_line: None,
            end_column: None,
        }
    }
}

/// A single hallucination finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub issue_type: IssueType,
    pub location: SourceLocation,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub source: String,
}

fn default_confidence() -> f64 {
    0.9
}

impl ValidationIssue {
    /// Clamps `confidence` into the `[0.0, 1.0]` range before storing it.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

/// The result of validating a single code file or block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub file: String,
    pub language: Language,
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
    pub passed: bool,
    #[serde(default)]
    pub checked_at: String,
}

impl ValidationResult {
    /// Number of issues at [`Severity::Error`].
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Number of issues at [`Severity::Warning`].
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }
}

/// A fenced code block extracted from LLM-generated markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
    pub line_number: u32,
    pub block_index: usize,
    #[serde(default)]
    pub raw_tag: String,
}

/// Aggregated validation results across every block in an LLM response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmValidationReport {
    pub total_blocks: usize,
    pub blocks_passed: usize,
    pub blocks_failed: usize,
    #[serde(default)]
    pub results: Vec<ValidationResult>,
}

impl LlmValidationReport {
    /// True when no block failed validation.
    pub fn passed(&self) -> bool {
        self.blocks_failed == 0
    }
}

/// Configuration for package registry lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub pypi_enabled: bool,
    pub npm_enabled: bool,
    pub timeout_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            pypi_enabled: true,
            npm_enabled: true,
            timeout_seconds: 10,
        }
    }
}

/// Top-level configuration for the hallucination firewall.
///
/// Loaded from a `.firewall.toml` file (see [`crate::config`]) and filled
/// in with defaults for any field the file omits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallConfig {
    pub languages: Vec<Language>,
    pub severity_threshold: Severity,
    pub cache_ttl_seconds: u64,
    pub cache_dir: PathBuf,
    pub registries: RegistryConfig,
    pub fail_on_network_error: bool,
    pub output_format: String,
    #[serde(default)]
    pub ci_mode: bool,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            languages: vec![Language::Python, Language::Javascript],
            severity_threshold: Severity::Warning,
            cache_ttl_seconds: 3600,
            cache_dir: default_cache_dir(),
            registries: RegistryConfig::default(),
            fail_on_network_error: false,
            output_format: "terminal".to_string(),
            ci_mode: false,
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs_cache_dir().join("hallucination-firewall")
}

fn dirs_cache_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".cache"))
        .unwrap_or_else(|| PathBuf::from(".cache"))
}
