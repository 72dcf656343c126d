//! Plain-text terminal output for interactive `firewall check`/`parse` runs.

use firewall_core::{Severity, ValidationResult};

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "x",
        Severity::Warning => "!",
        Severity::Info => "i",
    }
}

/// Prints one file's result: a pass/fail header followed by one line per issue.
pub fn print_result(result: &ValidationResult) {
    if result.passed && result.issues.is_empty() {
        println!("[PASS] {} — no issues found", result.file);
        return;
    }

    let status = if result.passed { "PASSED" } else { "FAILED" };
    println!(
        "{} ({}) — {} — {} errors, {} warnings",
        result.file,
        format!("{:?}", result.language).to_lowercase(),
        status,
        result.error_count(),
        result.warning_count(),
    );

    for issue in &result.issues {
        println!(
            "  [{}] L{}:{} {:?} — {}",
            severity_icon(issue.severity),
            issue.location.line,
            issue.location.column,
            issue.issue_type,
            issue.message,
        );
        if let Some(suggestion) = &issue.suggestion {
            println!("      -> {suggestion}");
        }
    }
}

/// Prints a one-line summary across multiple files' results.
pub fn print_summary(results: &[ValidationResult]) {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;
    let total_errors: usize = results.iter().map(ValidationResult::error_count).sum();
    let total_warnings: usize = results.iter().map(ValidationResult::warning_count).sum();

    println!();
    if failed == 0 {
        println!("All {total} files passed validation");
    } else {
        println!("{failed}/{total} files failed — {total_errors} errors, {total_warnings} warnings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewall_core::Language;

    #[test]
    fn test_print_result_passing_file_does_not_panic() {
        print_result(&ValidationResult {
            file: "a.py".into(),
            language: Language::Python,
            issues: Vec::new(),
            passed: true,
            checked_at: String::new(),
        });
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        print_summary(&[]);
    }
}
