//! Core abstractions for the hallucination firewall.
//!
//! This crate provides the foundations shared by every layer of the
//! validation pipeline: the persistent TTL cache backing registry lookups,
//! the `.firewall.toml` configuration loader, the data model for issues and
//! results, and the crate-local error type.
//!
//! # Architecture
//!
//! `firewall-core` defines:
//! - **Cache**: [`cache::RegistryCache`], a SQLite-backed TTL cache shared
//!   by the PyPI and npm registry clients.
//! - **Config**: [`config::load_config`] and [`models::FirewallConfig`],
//!   loaded from a `.firewall.toml` file.
//! - **Model**: [`models`], the wire-format types for issues, results, and
//!   code blocks shared across the CLI, HTTP service, and reporters.
//! - **Errors**: [`error::FirewallError`], a unified error type for
//!   cache and config failures.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::RegistryCache;
pub use config::{find_config_file, load_config};
pub use error::{FirewallError, Result};
pub use models::{
    CodeBlock, FirewallConfig, IssueType, Language, LlmValidationReport, RegistryConfig,
    Severity, SourceLocation, ValidationIssue, ValidationResult,
};
