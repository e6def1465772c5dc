//! Reads an HTML file and prints the parsed tree, one line per node,
//! indented by depth — a debugging aid, not a conformance tool.

use html5_core::dom::{Dom, NodeId, NodeKind};
use html5_core::Options;
use std::env;
use std::fs;

pub fn main() {
    env_logger::init();

    let path = env::args().nth(1).expect("usage: dump <file.html>");
    let bytes = fs::read(&path).expect("failed to read input file");

    let options = Options::new().collect_errors(true);
    let result = html5_core::parse_bytes(&bytes, options);

    let mut count = 0u32;
    dump_node(&result.dom, result.dom.document, 0, &mut count);

    for error in &result.errors {
        println!("parse error: {:?} at byte {}", error.code, error.offset);
    }
    println!("Found {count} nodes!");
}

fn dump_node(dom: &Dom, node: NodeId, depth: usize, count: &mut u32) {
    *count += 1;
    let indent = "  ".repeat(depth);
    match &dom.node(node).kind {
        NodeKind::Document => println!("{indent}#document"),
        NodeKind::DocumentFragment => println!("{indent}#fragment"),
        NodeKind::Doctype(d) => println!("{indent}<!DOCTYPE {}>", d.name),
        NodeKind::Element(e) => {
            let attrs: String = e
                .attrs
                .iter()
                .map(|a| format!(" {}=\"{}\"", a.name, a.value))
                .collect();
            println!("{indent}<{}{attrs}>", e.name.as_str());
            if let Some(content) = e.template_content {
                dump_node(dom, content, depth + 1, count);
            }
        }
        NodeKind::Text(text) => println!("{indent}#text {text:?}"),
        NodeKind::Comment(text) => println!("{indent}<!-- {text} -->"),
    }

    for child in dom.children(node) {
        dump_node(dom, child, depth + 1, count);
    }
}
