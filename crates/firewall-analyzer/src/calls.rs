//! Extraction of dotted-name function calls from Python source, used by
//! both the signature checker and the deprecation checker.

use tree_sitter::{Node, Parser};

/// A single function call site extracted from Python source.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub positional_count: usize,
    pub keywords: Vec<String>,
    pub has_star_args: bool,
    pub has_star_kwargs: bool,
    pub line: u32,
}

/// Walks a Python AST and extracts every checkable call site.
pub struct FunctionCallExtractor {
    parser: Parser,
}

impl FunctionCallExtractor {
    /// Builds an extractor with a fresh Python tree-sitter parser.
    pub fn new() -> Self {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("tree-sitter-python grammar is bundled and always loads");
        Self { parser }
    }

    /// Extracts all function calls with dotted names (e.g. `os.popen(...)`)
    /// from `code`. Bare-name calls like `print(...)` are skipped — see
    /// [`is_checkable`].
    pub fn extract_calls(&mut self, code: &str) -> Vec<FunctionCall> {
        let Some(tree) = self.parser.parse(code.as_bytes(), None) else {
            return Vec::new();
        };

        let mut calls = Vec::new();
        walk(tree.root_node(), code.as_bytes(), &mut calls);
        calls
    }
}

impl Default for FunctionCallExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn walk(node: Node, source: &[u8], calls: &mut Vec<FunctionCall>) {
    if node.kind() == "call" {
        if let Some(call) = parse_call(node, source) {
            calls.push(call);
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, calls);
    }
}

fn parse_call(node: Node, source: &[u8]) -> Option<FunctionCall> {
    let func_node = node.child_by_field_name("function")?;
    let args_node = node.child_by_field_name("arguments");

    let name = get_name(func_node, source);
    if name.is_empty() || !is_checkable(&name) {
        return None;
    }

    let mut positional = 0usize;
    let mut keywords = Vec::new();
    let mut has_star_args = false;
    let mut has_star_kwargs = false;

    if let Some(args_node) = args_node {
        let mut cursor = args_node.walk();
        for child in args_node.children(&mut cursor) {
            match child.kind() {
                "keyword_argument" => {
                    if let Some(key_node) = child.child_by_field_name("name") {
                        keywords.push(key_node.utf8_text(source).unwrap_or("").to_string());
                    }
                }
                "list_splat" => has_star_args = true,
                "dictionary_splat" => has_star_kwargs = true,
                "(" | ")" | "," => {}
                _ => positional += 1,
            }
        }
    }

    Some(FunctionCall {
        name,
        positional_count: positional,
        keywords,
        has_star_args,
        has_star_kwargs,
        line: func_node.start_position().row as u32,
    })
}

fn get_name(node: Node, source: &[u8]) -> String {
    match node.kind() {
        "identifier" => node.utf8_text(source).unwrap_or("").to_string(),
        "attribute" => {
            let obj = node.child_by_field_name("object");
            let attr = node.child_by_field_name("attribute");
            match (obj, attr) {
                (Some(obj), Some(attr)) => {
                    let obj_name = get_name(obj, source);
                    let attr_name = attr.utf8_text(source).unwrap_or("");
                    if obj_name.is_empty() {
                        attr_name.to_string()
                    } else {
                        format!("{obj_name}.{attr_name}")
                    }
                }
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

/// Only dotted names (`module.func`) are checkable — bare calls to local
/// functions or builtins like `print`/`len` have no resolvable module path.
fn is_checkable(name: &str) -> bool {
    name.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_dotted_call_with_keyword_arg() {
        let mut extractor = FunctionCallExtractor::new();
        let calls = extractor.extract_calls("os.popen(cmd, mode='r')\n");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "os.popen");
        assert_eq!(calls[0].positional_count, 1);
        assert_eq!(calls[0].keywords, vec!["mode".to_string()]);
    }

    #[test]
    fn test_bare_name_call_skipped() {
        let mut extractor = FunctionCallExtractor::new();
        let calls = extractor.extract_calls("print('hello')\n");
        assert!(calls.is_empty());
    }

    #[test]
    fn test_star_args_detected() {
        let mut extractor = FunctionCallExtractor::new();
        let calls = extractor.extract_calls("os.system(*args, **kwargs)\n");
        assert_eq!(calls.len(), 1);
        assert!(calls[0].has_star_args);
        assert!(calls[0].has_star_kwargs);
    }
}
