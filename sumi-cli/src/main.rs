//! sumi CLI
//!
//! Parses an HTML document and prints the resulting tree, the token
//! stream, or the parse issues.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};
use sumi_dom::{DomTree, NodeId, NodeType};
use sumi_html::{HTMLParser, HTMLTokenizer, ParsingFlags, format_tree};

/// Parse HTML the way a browser does and show what came out
#[derive(Parser, Debug)]
#[command(name = "sumi")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r"EXAMPLES:
    # Print the DOM tree of a file
    sumi ./index.html

    # Parse inline HTML as JSON
    sumi --html '<p>Hello' --format json

    # Fail on the first parse error
    sumi --strict ./index.html
")]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of reading a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Parse with the scripting flag set
    #[arg(short, long)]
    scripting: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Exit with an error on the first parse error
    #[arg(long)]
    strict: bool,

    /// List parse issues after the output
    #[arg(short, long)]
    issues: bool,

    /// Silence parser warnings on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented DOM tree
    Tree,
    /// DOM tree as JSON
    Json,
    /// Raw token stream, without tree construction
    Tokens,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let html = load_source(&cli)?;
    let flags = if cli.scripting {
        ParsingFlags::SCRIPTING
    } else {
        ParsingFlags::empty()
    };

    if cli.format == Format::Tokens {
        for (index, token) in HTMLTokenizer::new(&html).enumerate() {
            println!("{index:4}: {token:?}");
        }
        return Ok(());
    }

    let parser = HTMLParser::new(HTMLTokenizer::new(&html))
        .with_flags(flags)
        .with_stderr_warnings(!cli.quiet);
    let (tree, issues) = if cli.strict {
        (parser.run_strict().context("document is not conforming")?, Vec::new())
    } else {
        parser.run_with_issues()
    };

    match cli.format {
        Format::Json => {
            println!("{}", tree_to_json(&tree, NodeId::ROOT)?);
        }
        Format::Tree | Format::Tokens => print!("{}", format_tree(&tree)),
    }

    if cli.issues {
        println!();
        println!("{}", format!("{} parse issue(s)", issues.len()).bold());
        for issue in &issues {
            let label = if issue.is_error { "error" } else { "note" };
            println!("  [{:>5}] {label}: {}", issue.token_index, issue.message);
        }
    }

    Ok(())
}

fn load_source(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        Ok(html.clone())
    } else if let Some(path) = &cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
    } else {
        bail!("no input file or --html given")
    }
}

/// One step of the JSON walk.
enum Frame {
    /// Write a node; `last` omits the trailing comma.
    Open { id: NodeId, depth: usize, last: bool },
    /// Close the children array and object of a node with children.
    Close { depth: usize, last: bool },
}

/// Pretty-printed JSON for the subtree at `root`, walked on an explicit stack.
fn tree_to_json(tree: &DomTree, root: NodeId) -> serde_json::Result<String> {
    let mut out = String::new();
    let mut stack = vec![Frame::Open {
        id: root,
        depth: 0,
        last: true,
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Open { id, depth, last } => {
                let indent = "  ".repeat(depth);
                out.push_str(&indent);
                out.push_str("{\n");
                let fields = node_fields(tree, id);
                let children = tree.children(id).unwrap_or_default();
                for (index, (key, value)) in fields.iter().enumerate() {
                    let comma = if index + 1 < fields.len() || !children.is_empty() {
                        ","
                    } else {
                        ""
                    };
                    let value = serde_json::to_string(value)?;
                    out.push_str(&format!("{indent}  \"{key}\": {value}{comma}\n"));
                }
                if children.is_empty() {
                    close_object(&mut out, &indent, last);
                } else {
                    out.push_str(&format!("{indent}  \"children\": [\n"));
                    stack.push(Frame::Close { depth, last });
                    let count = children.len();
                    stack.extend(children.iter().enumerate().rev().map(|(index, &child)| {
                        Frame::Open {
                            id: child,
                            depth: depth + 2,
                            last: index + 1 == count,
                        }
                    }));
                }
            }
            Frame::Close { depth, last } => {
                let indent = "  ".repeat(depth);
                out.push_str(&format!("{indent}  ]\n"));
                close_object(&mut out, &indent, last);
            }
        }
    }

    if out.ends_with('\n') {
        let _ = out.pop();
    }
    Ok(out)
}

fn close_object(out: &mut String, indent: &str, last: bool) {
    out.push_str(indent);
    out.push_str(if last { "}\n" } else { "},\n" });
}

/// The scalar fields of one node, in output order.
fn node_fields(tree: &DomTree, id: NodeId) -> Vec<(&'static str, Value)> {
    let Some(node) = tree.get(id) else {
        return Vec::new();
    };

    match &node.node_type {
        NodeType::Document => vec![("type", json!("document"))],
        NodeType::DocumentType(doctype) => vec![
            ("type", json!("doctype")),
            ("name", json!(doctype.name)),
            ("publicId", json!(doctype.public_id)),
            ("systemId", json!(doctype.system_id)),
        ],
        NodeType::Element(data) => {
            let attrs: Map<String, Value> = data
                .attributes()
                .iter()
                .map(|attr| (attr.name.clone(), json!(attr.value)))
                .collect();
            vec![
                ("type", json!("element")),
                ("tagName", json!(data.tag_name)),
                ("attributes", Value::Object(attrs)),
            ]
        }
        NodeType::Text(text) => vec![("type", json!("text")), ("content", json!(text))],
        NodeType::Comment(text) => vec![("type", json!("comment")), ("content", json!(text))],
    }
}

#[cfg(test)]
mod tests {
    use sumi_html::parse_document;

    use super::*;

    #[test]
    fn test_json_mirrors_tree_shape() {
        let tree = parse_document("<!DOCTYPE html><p id=x>Hi<!--c-->", ParsingFlags::empty());
        let text = tree_to_json(&tree, NodeId::ROOT).expect("json output");
        let value: Value = serde_json::from_str(&text).expect("valid json");

        assert_eq!(value["type"], "document");
        assert_eq!(value["children"][0]["type"], "doctype");
        assert_eq!(value["children"][0]["name"], "html");

        let html = &value["children"][1];
        assert_eq!(html["tagName"], "html");
        let p = &html["children"][1]["children"][0];
        assert_eq!(p["tagName"], "p");
        assert_eq!(p["attributes"]["id"], "x");
        assert_eq!(p["children"][0]["content"], "Hi");
        assert_eq!(p["children"][1]["type"], "comment");
    }

    #[test]
    fn test_json_leaf_has_no_children_key() {
        let tree = parse_document("x", ParsingFlags::empty());
        let text = tree_to_json(&tree, NodeId::ROOT).expect("json output");
        let value: Value = serde_json::from_str(&text).expect("valid json");
        let body = &value["children"][0]["children"][1];
        assert_eq!(body["children"][0], json!({"type": "text", "content": "x"}));
    }

    #[test]
    fn test_json_handles_deep_nesting() {
        let depth = 1_000;
        let tree = parse_document(&"<div>".repeat(depth), ParsingFlags::empty());
        let text = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(move || tree_to_json(&tree, NodeId::ROOT).expect("json output"))
            .expect("spawn writer thread")
            .join()
            .expect("writer thread finished");

        assert_eq!(text.matches("\"tagName\": \"div\"").count(), depth);
        assert!(text.starts_with('{') && text.ends_with('}'));
    }

    #[test]
    fn test_cli_accepts_inline_html() {
        let cli = Cli::try_parse_from(["sumi", "--html", "<p>", "--format", "json"])
            .expect("arguments should parse");
        assert_eq!(cli.format, Format::Json);
        assert_eq!(load_source(&cli).expect("inline source"), "<p>");
    }

    #[test]
    fn test_cli_requires_an_input() {
        assert!(Cli::try_parse_from(["sumi"]).is_err());
    }
}
