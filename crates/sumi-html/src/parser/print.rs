//! Indented text rendering of a parsed tree, for debugging and the CLI.

use core::fmt::Write;

use sumi_dom::{DomTree, NodeId, NodeType};

/// Print a DOM subtree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_subtree(tree, id, indent, &mut out);
    print!("{out}");
}

/// Render the whole tree, one node per line, children indented two spaces
/// under their parent.
#[must_use]
pub fn format_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    write_subtree(tree, NodeId::ROOT, 0, &mut out);
    out
}

/// Pre-order walk on an explicit stack.
fn write_subtree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let mut stack = vec![(id, indent)];
    while let Some((id, indent)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        write_node(&node.node_type, indent, out);
        if let Some(children) = tree.children(id) {
            stack.extend(children.iter().rev().map(|&child| (child, indent + 1)));
        }
    }
}

fn write_node(node_type: &NodeType, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let _ = match node_type {
        NodeType::Document => writeln!(out, "{prefix}#document"),
        NodeType::DocumentType(doctype) => {
            if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                writeln!(out, "{prefix}<!DOCTYPE {}>", doctype.name)
            } else {
                writeln!(
                    out,
                    "{prefix}<!DOCTYPE {} \"{}\" \"{}\">",
                    doctype.name, doctype.public_id, doctype.system_id
                )
            }
        }
        NodeType::Element(data) => {
            if data.attributes().is_empty() {
                writeln!(out, "{prefix}<{}>", data.tag_name)
            } else {
                let attrs: Vec<String> = data
                    .attributes()
                    .iter()
                    .map(|attr| {
                        if attr.value.is_empty() {
                            attr.name.clone()
                        } else {
                            format!("{}=\"{}\"", attr.name, attr.value)
                        }
                    })
                    .collect();
                writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "))
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingFlags;
    use crate::parser::parse_document;

    #[test]
    fn test_format_tree_indents_children() {
        let tree = parse_document("<!DOCTYPE html><p class=x>Hi<!--c-->", ParsingFlags::empty());
        let expected = "\
#document
  <!DOCTYPE html>
  <html>
    <head>
    <body>
      <p class=\"x\">
        \"Hi\"
        <!-- c -->
";
        assert_eq!(format_tree(&tree), expected);
    }

    #[test]
    fn test_format_tree_escapes_newlines() {
        let tree = parse_document("<pre>\n\na</pre>", ParsingFlags::empty());
        assert!(format_tree(&tree).contains("\"\\na\""));
    }

    #[test]
    fn test_format_tree_handles_deep_nesting() {
        let depth = 2_000;
        let tree = parse_document(&"<div>".repeat(depth), ParsingFlags::empty());
        let text = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(move || format_tree(&tree))
            .expect("spawn printer thread")
            .join()
            .expect("printer thread finished");
        let innermost = format!("{}<div>\n", "  ".repeat(depth + 2));
        assert!(text.ends_with(&innermost));
    }
}
