//! Plain JSON output, meant for CI pipelines that parse the result rather
//! than a human reading it.

use firewall_core::ValidationResult;
use serde_json::json;

/// Writes `results` as a single JSON document to stdout: the per-file
/// results verbatim, plus a `summary` block totaling files/errors/warnings.
pub fn print_json(results: &[ValidationResult]) {
    let summary = json!({
        "total_files": results.len(),
        "passed": results.iter().filter(|r| r.passed).count(),
        "failed": results.iter().filter(|r| !r.passed).count(),
        "total_errors": results.iter().map(ValidationResult::error_count).sum::<usize>(),
        "total_warnings": results.iter().map(ValidationResult::warning_count).sum::<usize>(),
    });

    let document = json!({
        "results": results,
        "summary": summary,
    });

    println!("{}", serde_json::to_string(&document).unwrap_or_else(|_| "{}".to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_core::Language;

    #[test]
    fn test_print_json_does_not_panic_on_empty_results() {
        print_json(&[]);
    }

    #[test]
    fn test_print_json_does_not_panic_with_results() {
        print_json(&[ValidationResult {
            file: "a.py".into(),
            language: Language::Python,
            issues: Vec::new(),
            passed: true,
            checked_at: String::new(),
        }]);
    }
}
