//! PyPI/Python registry support for the hallucination firewall.
//!
//! This crate checks whether a package name exists on PyPI and fetches
//! flat metadata for it, backed by the shared [`firewall_core`] cache. It
//! has no knowledge of `pyproject.toml` parsing or dependency resolution —
//! that scope belongs to a build tool, not a validation pipeline.

pub mod error;
pub mod registry;
pub mod types;

pub use error::{PypiError, Result};
pub use registry::{PypiRegistry, normalize_package_name};
pub use types::PypiPackageInfo;
