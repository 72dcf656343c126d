//! Static function signature table and call-site validation.
//!
//! Dynamic signature resolution (following imports into installed packages,
//! or introspecting with `inspect.signature()`) needs an interpreter to
//! execute or introspect, which would mean running the snippet under test —
//! exactly what this checker refuses to do. This module substitutes a
//! static table of allowlisted stdlib functions: the signatures are fixed
//! program data rather than the product of introspecting a live
//! interpreter, but the validation policy downstream is unchanged.

use crate::calls::FunctionCall;
use firewall_core::{IssueType, Severity, SourceLocation, ValidationIssue};

/// Parameter passing convention, mirroring `inspect.Parameter.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    PositionalOrKeyword,
    PositionalOnly,
    KeywordOnly,
}

/// A single parameter in a resolved signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub required: bool,
    pub kind: ParamKind,
}

const fn required(name: &'static str) -> ParamInfo {
    ParamInfo {
        name,
        required: true,
        kind: ParamKind::PositionalOrKeyword,
    }
}

const fn optional(name: &'static str) -> ParamInfo {
    ParamInfo {
        name,
        required: false,
        kind: ParamKind::PositionalOrKeyword,
    }
}

/// A resolved function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureInfo {
    pub params: &'static [ParamInfo],
    pub has_var_positional: bool,
    pub has_var_keyword: bool,
}

struct SignatureEntry {
    name: &'static str,
    signature: SignatureInfo,
}

/// Static signature table for the stdlib functions [`SAFE_MODULES`] permits
/// resolving. Entries cover the dotted call names most commonly
/// hallucinated with the wrong arity or keyword names.
static SIGNATURE_TABLE: &[SignatureEntry] = &[
    SignatureEntry {
        name: "os.path.join",
        signature: SignatureInfo {
            params: &[],
            has_var_positional: true,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "os.path.exists",
        signature: SignatureInfo {
            params: &[required("path")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "os.path.basename",
        signature: SignatureInfo {
            params: &[required("p")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "os.getenv",
        signature: SignatureInfo {
            params: &[required("key"), optional("default")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "json.loads",
        signature: SignatureInfo {
            params: &[required("s")],
            has_var_positional: false,
            has_var_keyword: true,
        },
    },
    SignatureEntry {
        name: "json.dumps",
        signature: SignatureInfo {
            params: &[required("obj")],
            has_var_positional: false,
            has_var_keyword: true,
        },
    },
    SignatureEntry {
        name: "re.match",
        signature: SignatureInfo {
            params: &[required("pattern"), required("string"), optional("flags")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "re.sub",
        signature: SignatureInfo {
            params: &[
                required("pattern"),
                required("repl"),
                required("string"),
                optional("count"),
                optional("flags"),
            ],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "re.findall",
        signature: SignatureInfo {
            params: &[required("pattern"), required("string"), optional("flags")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "math.sqrt",
        signature: SignatureInfo {
            params: &[required("x")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "hashlib.md5",
        signature: SignatureInfo {
            params: &[optional("data")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "base64.b64encode",
        signature: SignatureInfo {
            params: &[required("s"), optional("altchars")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "shutil.copy",
        signature: SignatureInfo {
            params: &[required("src"), required("dst")],
            has_var_positional: false,
            has_var_keyword: false,
        },
    },
    SignatureEntry {
        name: "textwrap.wrap",
        signature: SignatureInfo {
            params: &[required("text")],
            has_var_positional: false,
            has_var_keyword: true,
        },
    },
];

/// Allowlisted module prefixes the signature table may resolve calls
/// against, mirroring `SignatureLookup._SAFE_MODULES`'s inspect-based
/// fallback.
pub const SAFE_MODULES: &[&str] = &[
    "os",
    "os.path",
    "sys",
    "json",
    "re",
    "math",
    "datetime",
    "pathlib",
    "collections",
    "itertools",
    "functools",
    "typing",
    "io",
    "csv",
    "hashlib",
    "base64",
    "urllib",
    "urllib.parse",
    "shutil",
    "tempfile",
    "logging",
    "string",
    "textwrap",
];

/// Looks up a static signature for `dotted_name`, or `None` if it isn't in
/// the table or its owning module isn't allowlisted.
pub fn lookup_signature(dotted_name: &str) -> Option<&'static SignatureInfo> {
    let (module, _) = dotted_name.rsplit_once('.')?;
    if !SAFE_MODULES.contains(&module) {
        return None;
    }
    SIGNATURE_TABLE
        .iter()
        .find(|entry| entry.name == dotted_name)
        .map(|entry| &entry.signature)
}

/// Compares a call site against a resolved signature, returning
/// `(issue_type, message)` pairs for every arity/keyword mismatch found.
pub fn validate_call(call: &FunctionCall, sig: &SignatureInfo) -> Vec<(IssueType, String)> {
    if call.has_star_args || call.has_star_kwargs {
        return Vec::new();
    }
    if sig.has_var_positional && sig.has_var_keyword {
        return Vec::new();
    }

    let mut errors = Vec::new();
    let required_params: Vec<&ParamInfo> = sig.params.iter().filter(|p| p.required).collect();
    let total_params = sig.params.len();

    if !sig.has_var_positional && call.positional_count > total_params {
        errors.push((
            IssueType::WrongSignature,
            format!(
                "too many arguments: got {}, expected at most {}",
                call.positional_count, total_params
            ),
        ));
    }

    let provided = call.positional_count + call.keywords.len();
    let min_required = required_params.len();
    if provided < min_required {
        let missing: Vec<&str> = required_params[provided.min(min_required)..]
            .iter()
            .map(|p| p.name)
            .collect();
        errors.push((
            IssueType::MissingRequiredArg,
            format!("missing required argument(s): {}", missing.join(", ")),
        ));
    }

    if !sig.has_var_keyword {
        let known: Vec<&str> = sig.params.iter().map(|p| p.name).collect();
        for kw in &call.keywords {
            if !known.contains(&kw.as_str()) {
                errors.push((
                    IssueType::UnknownParameter,
                    format!("unknown keyword argument: '{kw}'"),
                ));
            }
        }
    }

    errors
}

/// Checks every dotted call in `calls` against the static signature table,
/// emitting a warning-severity issue per mismatch. Calls with no resolvable
/// signature are skipped silently (fail-open), the same way an unresolvable
/// Jedi/inspect lookup would be.
pub fn check_signatures(calls: &[FunctionCall], file_path: &str) -> Vec<ValidationIssue> {
    calls
        .iter()
        .filter_map(|call| {
            let sig = lookup_signature(&call.name)?;
            let errors = validate_call(call, sig);
            if errors.is_empty() {
                return None;
            }
            Some(errors.into_iter().map(move |(issue_type, message)| {
                ValidationIssue {
                    severity: Severity::Warning,
                    issue_type,
                    location: SourceLocation::at_line(file_path, call.line + 1),
                    message: format!("{}(): {}", call.name, message),
                    suggestion: None,
                    confidence: 0.8,
                    source: "signature_checker".to_string(),
                }
            }))
        })
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, positional: usize, keywords: &[&str]) -> FunctionCall {
        FunctionCall {
            name: name.to_string(),
            positional_count: positional,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            has_star_args: false,
            has_star_kwargs: false,
            line: 0,
        }
    }

    #[test]
    fn test_lookup_known_signature() {
        assert!(lookup_signature("os.path.exists").is_some());
    }

    #[test]
    fn test_lookup_unknown_signature() {
        assert!(lookup_signature("numpy.array").is_none());
    }

    #[test]
    fn test_missing_required_arg() {
        let sig = lookup_signature("shutil.copy").unwrap();
        let errors = validate_call(&call("shutil.copy", 1, &[]), sig);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, IssueType::MissingRequiredArg);
    }

    #[test]
    fn test_too_many_positional_args() {
        let sig = lookup_signature("math.sqrt").unwrap();
        let errors = validate_call(&call("math.sqrt", 2, &[]), sig);
        assert!(errors.iter().any(|(t, _)| *t == IssueType::WrongSignature));
    }

    #[test]
    fn test_unknown_keyword_arg() {
        let sig = lookup_signature("math.sqrt").unwrap();
        let errors = validate_call(&call("math.sqrt", 1, &["base"]), sig);
        assert!(errors.iter().any(|(t, _)| *t == IssueType::UnknownParameter));
    }

    #[test]
    fn test_var_positional_allows_any_count() {
        let sig = lookup_signature("os.path.join").unwrap();
        let errors = validate_call(&call("os.path.join", 5, &[]), sig);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_star_args_skips_validation() {
        let sig = lookup_signature("shutil.copy").unwrap();
        let mut c = call("shutil.copy", 0, &[]);
        c.has_star_args = true;
        assert!(validate_call(&c, sig).is_empty());
    }
}
