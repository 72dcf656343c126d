use thiserror::Error;

/// Errors raised by the analyzer layer.
///
/// Parsing and extraction failures are deliberately rare here: every
/// tree-sitter call site already treats a parse failure as "no findings"
/// rather than propagating an error, matching the fail-open posture the
/// rest of the pipeline takes toward malformed LLM output. This type exists
/// for the few operations that can't reasonably swallow a failure, such as
/// building the tree-sitter parser itself.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("failed to initialize {language} parser: {message}")]
    ParserInit { language: String, message: String },
}

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_init_display() {
        let err = AnalyzerError::ParserInit {
            language: "python".into(),
            message: "language version mismatch".into(),
        };
        assert!(err.to_string().contains("python"));
    }
}
