//! npm/JavaScript registry support for the hallucination firewall.
//!
//! This crate checks whether a package name exists on the npm registry and
//! fetches flat metadata for it, backed by the shared [`firewall_core`]
//! cache. It has no knowledge of `package.json` parsing or dependency
//! resolution — that scope belongs to a build tool, not a validation
//! pipeline.

pub mod error;
pub mod registry;
pub mod types;

pub use error::{NpmError, Result};
pub use registry::NpmRegistry;
pub use types::NpmPackageInfo;
