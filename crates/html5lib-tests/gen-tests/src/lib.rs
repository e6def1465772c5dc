//! Parses html5lib-tests `.dat` fixtures and renders a [`Dom`] back into the
//! same canonical `#document` tree notation those fixtures use, so generated
//! tests can do a plain string comparison.

use html5_core::dom::{Dom, NodeId, NodeKind};

const TREE_INDENT: &str = "  ";

pub struct TestCase {
    pub input: String,
    pub errors: Vec<(usize, usize, String)>, // (line, col, message)
    pub expected_document: String,
    pub line_number: usize,
}

/// Splits a `.dat` fixture file into its `#data`/`#errors`/`#document` test cases.
pub fn parse_test_file(content: &str) -> Vec<TestCase> {
    let mut tests = Vec::new();
    let mut current_section = None;
    let mut current_test = TestCase {
        input: String::new(),
        errors: Vec::new(),
        expected_document: String::new(),
        line_number: 0,
    };
    let mut line_number = 0;

    for line in content.lines() {
        line_number += 1;
        if line.starts_with("#data") {
            if !current_test.input.is_empty() || !current_test.expected_document.is_empty() {
                tests.push(current_test);
                current_test = TestCase {
                    input: String::new(),
                    errors: Vec::new(),
                    expected_document: String::new(),
                    line_number: 0,
                };
            }
            current_test.line_number = line_number + 1;
            current_section = Some("data");
        } else if line.starts_with("#errors") {
            current_section = Some("errors");
        } else if line.starts_with("#document") {
            current_section = Some("document");
        } else {
            match current_section {
                Some("data") => {
                    if !current_test.input.is_empty() {
                        current_test.input.push('\n');
                    }
                    current_test.input.push_str(line);
                }
                Some("errors") => {
                    if !line.is_empty() {
                        let parts: Vec<_> = line.splitn(2, ": ").collect();
                        if parts.len() == 2 {
                            let coords = parts[0].trim_matches(|c| c == '(' || c == ')');
                            let message = parts[1];
                            if let Some((line, col)) = coords.split_once(',') {
                                if let (Ok(line), Ok(col)) = (line.parse(), col.parse()) {
                                    current_test.errors.push((line, col, message.to_string()));
                                }
                            }
                        }
                    }
                }
                Some("document") => {
                    current_test.expected_document.push_str(line);
                    current_test.expected_document.push('\n');
                }
                _ => {}
            }
        }
    }

    if !current_test.input.is_empty() || !current_test.expected_document.is_empty() {
        tests.push(current_test);
    }

    tests
}

/// Renders a parsed [`Dom`] in the html5lib-tests canonical tree notation:
/// one line per node, `"| "` plus two spaces of indent per depth, attributes
/// sorted by name on their own indented line, text content quoted.
///
/// @see https://github.com/html5lib/html5lib-tests/blob/master/tree-construction/README.md
pub fn build_tree(dom: &Dom) -> String {
    let mut output = String::new();
    for child in dom.children(dom.document) {
        write_node(dom, child, 0, &mut output);
    }
    output
}

fn write_node(dom: &Dom, node: NodeId, depth: usize, out: &mut String) {
    let indent = TREE_INDENT.repeat(depth);
    match &dom.node(node).kind {
        NodeKind::Document | NodeKind::DocumentFragment => {}
        NodeKind::Doctype(d) => {
            out.push_str(&format!("| {indent}<!DOCTYPE {}", d.name));
            if !d.public_id.is_empty() || !d.system_id.is_empty() {
                out.push_str(&format!(" \"{}\" \"{}\"", d.public_id, d.system_id));
            }
            out.push_str(">\n");
        }
        NodeKind::Element(e) => {
            let qualified = match e.namespace.as_str() {
                "html" => e.name.as_str().to_string(),
                ns => format!("{ns} {}", e.name.as_str()),
            };
            out.push_str(&format!("| {indent}<{qualified}>\n"));

            let mut attrs: Vec<_> = e.attrs.iter().collect();
            attrs.sort_by(|a, b| a.name.cmp(&b.name));
            for attr in attrs {
                out.push_str(&format!(
                    "| {}{}=\"{}\"\n",
                    TREE_INDENT.repeat(depth + 1),
                    attr.name,
                    attr.value
                ));
            }

            if let Some(content) = e.template_content {
                out.push_str(&format!("| {}content\n", TREE_INDENT.repeat(depth + 1)));
                for child in dom.children(content) {
                    write_node(dom, child, depth + 2, out);
                }
            }

            for child in dom.children(node) {
                write_node(dom, child, depth + 1, out);
            }
        }
        NodeKind::Text(text) => {
            out.push_str(&format!("| {indent}\"{text}\"\n"));
        }
        NodeKind::Comment(text) => {
            out.push_str(&format!("| {indent}<!-- {text} -->\n"));
        }
    }
}

/// Normalizes an expected `#document` block from a fixture file for
/// comparison against [`build_tree`]'s output (trailing-newline insensitive).
pub fn parse_expected_document(expected: &str) -> String {
    let trimmed = expected.trim_end_matches('\n');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
