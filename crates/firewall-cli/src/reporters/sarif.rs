//! SARIF v2.1.0 output for GitHub Code Scanning and similar consumers.

use firewall_core::{IssueType, Severity, ValidationResult};
use serde_json::{Value, json};

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "hallucination-firewall";
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

fn severity_to_sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn issue_type_rule_id(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::NonexistentPackage => "nonexistent_package",
        IssueType::NonexistentMethod => "nonexistent_method",
        IssueType::WrongSignature => "wrong_signature",
        IssueType::DeprecatedApi => "deprecated_api",
        IssueType::InvalidImport => "invalid_import",
        IssueType::SyntaxError => "syntax_error",
        IssueType::VersionMismatch => "version_mismatch",
        IssueType::MissingRequiredArg => "missing_required_arg",
        IssueType::UnknownParameter => "unknown_parameter",
    }
}

fn rule_description(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::NonexistentPackage => "Reference to a package that does not exist in the registry",
        IssueType::NonexistentMethod => "Reference to a method or function that does not exist",
        IssueType::WrongSignature => "Function or method called with incorrect signature",
        IssueType::DeprecatedApi => "Usage of deprecated API that should be updated",
        IssueType::InvalidImport => "Import statement that cannot be resolved",
        IssueType::SyntaxError => "Code contains syntax errors",
        IssueType::VersionMismatch => "Package version incompatibility detected",
        IssueType::MissingRequiredArg => "Missing required argument in function call",
        IssueType::UnknownParameter => "Unknown parameter passed to function",
    }
}

const ALL_ISSUE_TYPES: &[IssueType] = &[
    IssueType::NonexistentPackage,
    IssueType::NonexistentMethod,
    IssueType::WrongSignature,
    IssueType::DeprecatedApi,
    IssueType::InvalidImport,
    IssueType::SyntaxError,
    IssueType::VersionMismatch,
    IssueType::MissingRequiredArg,
    IssueType::UnknownParameter,
];

fn build_rules() -> Vec<Value> {
    ALL_ISSUE_TYPES
        .iter()
        .map(|&issue_type| {
            let id = issue_type_rule_id(issue_type);
            let description = rule_description(issue_type);
            json!({
                "id": id,
                "name": id,
                "shortDescription": { "text": description },
                "fullDescription": { "text": description },
                "defaultConfiguration": { "level": "warning" },
            })
        })
        .collect()
}

/// Builds and prints a complete SARIF document for `results` to stdout.
pub fn print_sarif(results: &[ValidationResult]) {
    let mut sarif_results = Vec::new();

    for result in results {
        for issue in &result.issues {
            let mut message = issue.message.clone();
            if let Some(suggestion) = &issue.suggestion {
                message.push_str(&format!("\nSuggestion: {suggestion}"));
            }

            let mut region = json!({
                "startLine": issue.location.line,
                "startColumn": if issue.location.column == 0 { 1 } else { issue.location.column },
            });
            if let Some(end_line) = issue.location.end_line {
                region["endLine"] = json!(end_line);
            }
            if let Some(end_column) = issue.location.end_column {
                region["endColumn"] = json!(end_column);
            }

            sarif_results.push(json!({
                "ruleId": issue_type_rule_id(issue.issue_type),
                "level": severity_to_sarif_level(issue.severity),
                "message": { "text": message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": { "uri": issue.location.file },
                        "region": region,
                    },
                }],
            }));
        }
    }

    let document = json!({
        "$schema": SARIF_SCHEMA,
        "version": SARIF_VERSION,
        "runs": [{
            "tool": {
                "driver": {
                    "name": TOOL_NAME,
                    "version": TOOL_VERSION,
                    "informationUri": "https://github.com/bug-ops/hallucination-firewall",
                    "rules": build_rules(),
                },
            },
            "results": sarif_results,
        }],
    });

    println!("{}", serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string()));
}
