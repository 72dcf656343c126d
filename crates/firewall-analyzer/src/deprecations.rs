//! Static table of deprecated Python stdlib call patterns.

use crate::calls::FunctionCall;
use firewall_core::{IssueType, Severity, SourceLocation, ValidationIssue};

/// A single deprecation pattern: a dotted call name, its suggested
/// replacement, and the Python version it was deprecated in.
pub struct DeprecationRule {
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub since: &'static str,
    pub severity: Severity,
}

/// Deprecated stdlib patterns this checker flags, keyed by dotted call name.
///
/// Mirrors the documented deprecation schedule rather than every deprecation
/// CPython has ever issued — entries are additions, never heuristics.
pub const PYTHON_DEPRECATIONS: &[DeprecationRule] = &[
    DeprecationRule {
        pattern: "os.popen",
        replacement: "subprocess.run()",
        since: "3.0",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "os.system",
        replacement: "subprocess.run()",
        since: "3.0",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "unittest.makeSuite",
        replacement: "TestLoader.loadTestsFromTestCase()",
        since: "3.11",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "unittest.getTestCaseNames",
        replacement: "TestLoader.getTestCaseNames()",
        since: "3.11",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "unittest.findTestCases",
        replacement: "TestLoader.discover()",
        since: "3.11",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "typing.Dict",
        replacement: "dict",
        since: "3.9",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "typing.List",
        replacement: "list",
        since: "3.9",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "typing.Tuple",
        replacement: "tuple",
        since: "3.9",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "typing.Set",
        replacement: "set",
        since: "3.9",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "typing.FrozenSet",
        replacement: "frozenset",
        since: "3.9",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "typing.Optional",
        replacement: "X | None",
        since: "3.10",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "imp.find_module",
        replacement: "importlib.util.find_spec()",
        since: "3.4",
        severity: Severity::Warning,
    },
    DeprecationRule {
        pattern: "imp.load_module",
        replacement: "importlib.import_module()",
        since: "3.4",
        severity: Severity::Warning,
    },
];

fn lookup(pattern: &str) -> Option<&'static DeprecationRule> {
    PYTHON_DEPRECATIONS.iter().find(|r| r.pattern == pattern)
}

/// Scans already-extracted `calls` for names matching [`PYTHON_DEPRECATIONS`].
/// Callers gate this to Python call sites; the rule table has no entries for
/// any other language.
pub fn check_deprecations(calls: &[FunctionCall], file_path: &str) -> Vec<ValidationIssue> {
    calls
        .iter()
        .filter_map(|call| {
            let rule = lookup(&call.name)?;
            Some(ValidationIssue {
                severity: rule.severity,
                issue_type: IssueType::DeprecatedApi,
                location: SourceLocation::at_line(file_path, call.line + 1),
                message: format!("'{}()' is deprecated since Python {}", call.name, rule.since),
                suggestion: Some(format!("Use {} instead", rule.replacement)),
                confidence: 0.95,
                source: "deprecation_checker".to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::FunctionCallExtractor;

    fn extract(code: &str) -> Vec<FunctionCall> {
        let mut extractor = FunctionCallExtractor::new();
        extractor.extract_calls(code)
    }

    #[test]
    fn test_detects_os_popen() {
        let calls = extract("os.popen('ls')\n");
        let issues = check_deprecations(&calls, "a.py");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::DeprecatedApi);
        assert!(issues[0].message.contains("os.popen"));
    }

    #[test]
    fn test_clean_code_no_issues() {
        let calls = extract("subprocess.run(['ls'])\n");
        let issues = check_deprecations(&calls, "a.py");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_no_calls_no_issues() {
        let issues = check_deprecations(&[], "a.py");
        assert!(issues.is_empty());
    }
}
