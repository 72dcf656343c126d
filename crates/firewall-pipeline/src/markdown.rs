//! Extracts fenced code blocks from LLM-generated markdown responses.

use firewall_core::CodeBlock;
use once_cell::sync::Lazy;
use regex::Regex;

/// Hard cap on code blocks extracted from a single markdown document, so a
/// pathological response can't fan out into an unbounded validation run.
pub const MAX_BLOCKS: usize = 100;

/// Hard cap on markdown input size (10 MiB) before extraction is skipped entirely.
pub const MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

static CODE_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```([^\n]*)\n(.*?)```").expect("static regex is valid"));

/// Extracts every fenced code block from `markdown`, stopping after
/// [`MAX_BLOCKS`]. A block with no fence-tag language is classified with
/// [`detect_language_heuristic`].
pub fn extract_code_blocks(markdown: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();

    for (index, capture) in CODE_FENCE_PATTERN.captures_iter(markdown).enumerate() {
        if index >= MAX_BLOCKS {
            break;
        }

        let whole = capture.get(0).expect("capture 0 always matches");
        let tag = capture[1].trim().to_lowercase();
        let code = capture[2].trim_end().to_string();
        let line_number = markdown[..whole.start()].matches('\n').count() as u32 + 1;
        let language = if tag.is_empty() {
            detect_language_heuristic(&code)
        } else {
            normalize_language(&tag)
        };

        blocks.push(CodeBlock {
            language,
            code,
            line_number,
            block_index: index,
            raw_tag: tag,
        });
    }

    blocks
}

/// Maps a fence tag (`py`, `js`, `sh`, ...) to its canonical language name.
/// Unrecognized tags pass through unchanged.
fn normalize_language(tag: &str) -> String {
    match tag {
        "py" | "python3" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "sh" | "shell" | "zsh" => "bash",
        other => other,
    }
    .to_string()
}

/// Returns the byte offset of the boundary after at most `n` chars of `s`,
/// so a truncating slice `&s[..char_boundary_at(s, n)]` never lands inside a
/// multibyte UTF-8 sequence.
fn char_boundary_at(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx)
}

/// Guesses a language for an untagged code block from its content. Tried in
/// order: JSON parse, SQL keywords, shell shebang/prompt, XML/HTML, Python
/// tokens, JS/TS tokens — falling back to `"text"`.
pub fn detect_language_heuristic(code: &str) -> String {
    if serde_json::from_str::<serde_json::Value>(code).is_ok() {
        return "json".to_string();
    }

    let head = &code[..char_boundary_at(code, 300)];
    let head_upper = head.to_uppercase();
    const SQL_KEYWORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE", "CREATE TABLE", "ALTER TABLE"];
    if SQL_KEYWORDS.iter().any(|kw| head_upper.contains(kw)) {
        return "sql".to_string();
    }

    if code.starts_with("#!") || head.trim_start().starts_with("$ ") {
        return "bash".to_string();
    }

    let stripped = head.trim_start();
    if stripped.starts_with('<') && stripped[..char_boundary_at(stripped, 100)].contains('>') {
        return "xml".to_string();
    }

    if head.contains("import ") || head.contains("from ") || head.contains("def ") {
        return "python".to_string();
    }

    const JS_KEYWORDS: &[&str] = &["function ", "const ", "let ", "var ", "=>"];
    if JS_KEYWORDS.iter().any(|kw| head.contains(kw)) {
        return "javascript".to_string();
    }

    "text".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tagged_python_block() {
        let markdown = "Here:\n```python\nimport os\nprint(os.getcwd())\n```\n";
        let blocks = extract_code_blocks(markdown);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "python");
        assert!(blocks[0].code.contains("import os"));
    }

    #[test]
    fn test_extract_multiple_blocks() {
        let markdown = "```py\nx = 1\n```\nand\n```js\nconst x = 1;\n```\n";
        let blocks = extract_code_blocks(markdown);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language, "python");
        assert_eq!(blocks[1].language, "javascript");
    }

    #[test]
    fn test_untagged_block_uses_heuristic() {
        let markdown = "```\nimport sys\nprint(sys.argv)\n```\n";
        let blocks = extract_code_blocks(markdown);
        assert_eq!(blocks[0].language, "python");
    }

    #[test]
    fn test_untagged_json_block() {
        let markdown = "```\n{\"a\": 1}\n```\n";
        let blocks = extract_code_blocks(markdown);
        assert_eq!(blocks[0].language, "json");
    }

    #[test]
    fn test_no_fences_returns_empty() {
        assert!(extract_code_blocks("just plain text, no fences here").is_empty());
    }

    #[test]
    fn test_line_number_tracks_preceding_newlines() {
        let markdown = "line one\nline two\n```python\nx = 1\n```\n";
        let blocks = extract_code_blocks(markdown);
        assert_eq!(blocks[0].line_number, 3);
    }

    #[test]
    fn test_heuristic_does_not_panic_on_multibyte_boundary() {
        let mut code = "#".repeat(299);
        code.push('日');
        code.push_str("\nmore text to pad past the window\n");
        let _ = detect_language_heuristic(&code);

        let mut xml_like = "<".to_string();
        xml_like.push_str(&"a".repeat(98));
        xml_like.push('日');
        xml_like.push('>');
        let _ = detect_language_heuristic(&xml_like);
    }
}
