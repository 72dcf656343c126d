//! Output formats for validation results: a colored terminal view for
//! interactive use, JSON for CI scripting, and SARIF for code-scanning
//! integrations like GitHub's.

pub mod json;
pub mod sarif;
pub mod terminal;

pub use json::print_json;
pub use sarif::print_sarif;
pub use terminal::{print_result, print_summary};
