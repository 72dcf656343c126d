//! AST-based syntax validation, import extraction, and alias extraction via tree-sitter.
//!
//! Python and JavaScript get dedicated grammars; TypeScript is parsed with
//! the JavaScript grammar, which is lossy for TS-only syntax but sufficient
//! for import and call-site extraction.

use crate::error::{AnalyzerError, Result};
use firewall_core::{IssueType, Language, Severity, SourceLocation, ValidationIssue};
use std::collections::HashMap;
use tree_sitter::{Node, Parser, Tree};

fn parser_for(language: Language) -> Option<Result<Parser>> {
    let ts_language = match language {
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::Javascript | Language::Typescript => tree_sitter_javascript::LANGUAGE.into(),
        Language::Unknown => return None,
    };

    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&ts_language) {
        return Some(Err(AnalyzerError::ParserInit {
            language: format!("{language:?}"),
            message: e.to_string(),
        }));
    }
    Some(Ok(parser))
}

fn parse(code: &str, language: Language) -> Option<Tree> {
    let mut parser = match parser_for(language)? {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "tree-sitter parser init failed");
            return None;
        }
    };
    parser.parse(code.as_bytes(), None)
}

/// Parses `code` and reports every `ERROR`/missing node tree-sitter produces.
///
/// A language with no configured grammar (or a parse that tree-sitter can't
/// even attempt) yields no issues rather than an error — syntax validation
/// fails open just like every other analyzer stage.
pub fn validate_syntax(code: &str, language: Language, file_path: &str) -> Vec<ValidationIssue> {
    let Some(tree) = parse(code, language) else {
        return Vec::new();
    };

    let mut issues = Vec::new();
    collect_errors(tree.root_node(), file_path, &mut issues);
    issues
}

fn collect_errors(node: Node, file_path: &str, issues: &mut Vec<ValidationIssue>) {
    if node.is_error() || node.is_missing() {
        let start = node.start_position();
        let end = node.end_position();
        issues.push(ValidationIssue {
            severity: Severity::Error,
            issue_type: IssueType::SyntaxError,
            location: SourceLocation {
                file: file_path.to_string(),
                line: start.row as u32 + 1,
                column: start.column as u32,
                end_line: Some(end.row as u32 + 1),
                end_column: Some(end.column as u32),
            },
            message: format!("syntax error: unexpected {} node", node.kind()),
            suggestion: None,
            confidence: 1.0,
            source: "tree-sitter".to_string(),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, file_path, issues);
    }
}

/// Extracts top-level import targets (root package/module names) from `code`.
pub fn extract_imports(code: &str, language: Language) -> Vec<String> {
    let Some(tree) = parse(code, language) else {
        return Vec::new();
    };

    let mut imports = Vec::new();
    match language {
        Language::Python => extract_python_imports(tree.root_node(), code.as_bytes(), &mut imports),
        Language::Javascript | Language::Typescript => {
            extract_js_imports(tree.root_node(), code.as_bytes(), &mut imports)
        }
        Language::Unknown => {}
    }
    imports
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn extract_python_imports(node: Node, source: &[u8], imports: &mut Vec<String>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "dotted_name" {
                    let text = node_text(child, source);
                    if let Some(root) = text.split('.').next() {
                        imports.push(root.to_string());
                    }
                }
            }
        }
        "import_from_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "dotted_name" {
                    let text = node_text(child, source);
                    if let Some(root) = text.split('.').next() {
                        imports.push(root.to_string());
                    }
                    break;
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        extract_python_imports(child, source, imports);
    }
}

fn extract_js_imports(node: Node, source: &[u8], imports: &mut Vec<String>) {
    if node.kind() == "import_statement" {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "string" {
                let raw = node_text(child, source).trim_matches(|c| c == '\'' || c == '"');
                if let Some(rest) = raw.strip_prefix('@') {
                    let parts: Vec<&str> = rest.splitn(2, '/').collect();
                    if parts.len() >= 2 {
                        imports.push(format!("@{}/{}", parts[0], parts[1]));
                    }
                } else if !raw.starts_with('.') {
                    if let Some(first) = raw.split('/').next() {
                        imports.push(first.to_string());
                    }
                }
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        extract_js_imports(child, source, imports);
    }
}

/// Extracts Python import aliases (`import pandas as pd` -> `{"pd": "pandas"}`).
///
/// Only Python has aliasing relevant to signature resolution; other
/// languages return an empty map.
pub fn extract_import_aliases(code: &str, language: Language) -> HashMap<String, String> {
    let mut aliases = HashMap::new();
    if language != Language::Python {
        return aliases;
    }

    let Some(tree) = parse(code, language) else {
        return aliases;
    };

    extract_python_aliases(tree.root_node(), code.as_bytes(), &mut aliases);
    aliases
}

fn extract_python_aliases(node: Node, source: &[u8], aliases: &mut HashMap<String, String>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "aliased_import" {
                    if let (Some(module), Some(alias)) = (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("alias"),
                    ) {
                        aliases.insert(
                            node_text(alias, source).to_string(),
                            node_text(module, source).to_string(),
                        );
                    }
                }
            }
        }
        "import_from_statement" => {
            let mut module_name = None;
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "dotted_name" {
                    module_name = Some(node_text(child, source).to_string());
                    break;
                }
            }

            if let Some(module_name) = module_name {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.kind() == "aliased_import" {
                        if let (Some(name), Some(alias)) = (
                            child.child_by_field_name("name"),
                            child.child_by_field_name("alias"),
                        ) {
                            let full_name =
                                format!("{}.{}", module_name, node_text(name, source));
                            aliases.insert(node_text(alias, source).to_string(), full_name);
                        }
                    }
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        extract_python_aliases(child, source, aliases);
    }
}

/// Rewrites `name`'s leading dotted segment through `aliases`, so an aliased
/// call like `ospath.join` resolves to its canonical `os.path.join` before
/// signature/deprecation lookup. Names with no matching alias (including
/// those with no dot at all) pass through unchanged.
pub fn rewrite_call_alias(name: &str, aliases: &HashMap<String, String>) -> String {
    let Some((head, rest)) = name.split_once('.') else {
        return name.to_string();
    };
    match aliases.get(head) {
        Some(canonical) => format!("{canonical}.{rest}"),
        None => name.to_string(),
    }
}
