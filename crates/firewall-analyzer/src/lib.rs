//! Static and registry-backed validation passes over a single code block:
//! AST syntax checking, import existence, call-signature validation, and
//! deprecated-API detection.

pub mod ast;
pub mod calls;
pub mod deprecations;
pub mod error;
pub mod imports;
pub mod signatures;

pub use ast::{extract_import_aliases, extract_imports, rewrite_call_alias, validate_syntax};
pub use calls::{FunctionCall, FunctionCallExtractor};
pub use deprecations::{DeprecationRule, PYTHON_DEPRECATIONS, check_deprecations};
pub use error::{AnalyzerError, Result};
pub use imports::{
    COMMON_LOCAL_PACKAGES, JS_BUILTINS, PYTHON_STDLIB, check_js_imports, check_python_imports,
};
pub use signatures::{
    ParamInfo, ParamKind, SAFE_MODULES, SignatureInfo, check_signatures, lookup_signature,
    validate_call,
};
