//! Validates every code block in an LLM markdown response.

use crate::error::{PipelineError, Result};
use crate::markdown::{MAX_INPUT_SIZE, extract_code_blocks};
use crate::pipeline::ValidationPipeline;
use firewall_core::{FirewallConfig, LlmValidationReport, ValidationResult};

const SUPPORTED_LANGUAGES: &[&str] = &["python", "javascript", "typescript"];

/// Extracts code blocks from `markdown` and validates every one written in
/// a supported language; unsupported-language blocks pass through untouched
/// (counted, but never flagged as a failure).
pub async fn validate_llm_output(
    markdown: &str,
    config: Option<FirewallConfig>,
) -> Result<LlmValidationReport> {
    if markdown.len() > MAX_INPUT_SIZE {
        return Err(PipelineError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        });
    }

    let blocks = extract_code_blocks(markdown);
    tracing::debug!(blocks = blocks.len(), "extracted code blocks from markdown");
    if blocks.is_empty() {
        return Ok(LlmValidationReport {
            total_blocks: 0,
            blocks_passed: 0,
            blocks_failed: 0,
            results: Vec::new(),
        });
    }

    let pipeline = ValidationPipeline::new(config)?;
    let mut results: Vec<ValidationResult> = Vec::with_capacity(blocks.len());

    for block in &blocks {
        if !SUPPORTED_LANGUAGES.contains(&block.language.as_str()) {
            results.push(ValidationResult {
                file: format!("<llm-block-{}>", block.block_index),
                language: firewall_core::Language::Unknown,
                issues: Vec::new(),
                passed: true,
                checked_at: chrono::Utc::now().to_rfc3339(),
            });
            continue;
        }

        let ext = match block.language.as_str() {
            "python" => "py",
            "javascript" => "js",
            "typescript" => "ts",
            _ => "txt",
        };
        let file_name = format!("<llm-block-{}>.{ext}", block.block_index);
        results.push(pipeline.validate_code(&block.code, &file_name).await);
    }

    pipeline.close().await?;

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;
    tracing::info!(blocks_passed = passed, blocks_failed = failed, "llm output validation complete");

    Ok(LlmValidationReport {
        total_blocks: blocks.len(),
        blocks_passed: passed,
        blocks_failed: failed,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_markdown_yields_empty_report() {
        let report = validate_llm_output("no code here", None).await.unwrap();
        assert_eq!(report.total_blocks, 0);
        assert!(report.passed());
    }

    #[tokio::test]
    async fn test_oversized_markdown_rejected() {
        let huge = "a".repeat(MAX_INPUT_SIZE + 1);
        let err = validate_llm_output(&huge, None).await.unwrap_err();
        assert!(matches!(err, PipelineError::InputTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_language_block_passes_through() {
        let markdown = "```sql\nSELECT * FROM users;\n```\n";
        let report = validate_llm_output(markdown, None).await.unwrap();
        assert_eq!(report.total_blocks, 1);
        assert_eq!(report.blocks_passed, 1);
    }

    #[tokio::test]
    async fn test_python_block_with_syntax_error_fails() {
        let markdown = "```python\ndef f(:\n    pass\n```\n";
        let report = validate_llm_output(markdown, None).await.unwrap();
        assert_eq!(report.total_blocks, 1);
        assert_eq!(report.blocks_failed, 1);
    }
}
