//! Integration tests for the HTML parser.

use std::cell::RefCell;
use std::rc::Rc;

use sumi_dom::{DomTree, NodeId, NodeType};
use sumi_html::{
    HTMLParser, HTMLTokenizer, InsertionMode, ParsingFlags, format_tree, parse_document,
};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_document(html, ParsingFlags::empty())
}

fn parse_scripted(html: &str) -> DomTree {
    parse_document(html, ParsingFlags::SCRIPTING)
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    tree.descendants(from)
        .find(|&id| tree.as_element(id).is_some_and(|data| data.tag_name == tag))
}

/// Helper to get text content of a node (concatenated)
fn text_content(tree: &DomTree, id: NodeId) -> String {
    tree.descendants(id)
        .filter_map(|child| tree.as_text(child))
        .collect()
}

/// Tag names of the element children of a node.
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .unwrap_or_default()
        .iter()
        .filter_map(|&child| tree.as_element(child).map(|data| data.tag_name.clone()))
        .collect()
}

/// The indented listing of everything under `<body>`, with the body's own
/// indentation removed.
fn body_lines(tree: &DomTree) -> Vec<String> {
    format_tree(tree)
        .lines()
        .skip_while(|line| line.trim() != "<body>" && !line.trim().starts_with("<body "))
        .skip(1)
        .map(|line| line.strip_prefix("      ").unwrap_or(line).to_string())
        .collect()
}

fn attribute(tree: &DomTree, id: NodeId, name: &str) -> Option<String> {
    tree.as_element(id)
        .and_then(|data| data.get_attribute(name))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Document shape
// ---------------------------------------------------------------------------

#[test]
fn test_worked_example_full_document() {
    let tree = parse(
        "<!DOCTYPE html><html><head><title>Hi</title></head><body>Hello</body></html>",
    );
    assert_eq!(tree.doctype().map(|d| d.name.as_str()), Some("html"));

    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);

    let head = tree.head().unwrap();
    let title = find_element(&tree, head, "title").unwrap();
    assert_eq!(tree.parent(title), Some(head));
    assert_eq!(text_content(&tree, title), "Hi");

    let body = tree.body().unwrap();
    assert_eq!(tree.children(body).unwrap().len(), 1);
    assert_eq!(text_content(&tree, body), "Hello");
}

#[test]
fn test_worked_example_implied_structure() {
    let tree = parse("<p>A<p>B");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);
    assert!(tree.children(tree.head().unwrap()).unwrap().is_empty());
    assert_eq!(body_lines(&tree), vec!["<p>", "  \"A\"", "<p>", "  \"B\""]);
}

#[test]
fn test_worked_example_leading_comment() {
    let tree = parse("<!--hi-->text");
    let children = tree.children(NodeId::ROOT).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_comment(children[0]), Some("hi"));
    assert_eq!(tree.document_element(), Some(children[1]));
    assert!(tree.children(tree.head().unwrap()).unwrap().is_empty());
    assert_eq!(body_lines(&tree), vec!["\"text\""]);
}

#[test]
fn test_no_doctype_means_no_document_type_node() {
    let tree = parse("<html><body>x</body></html>");
    assert!(tree.doctype().is_none());
    assert!(
        tree.children(NodeId::ROOT)
            .unwrap()
            .iter()
            .all(|&id| !matches!(tree.get(id).unwrap().node_type, NodeType::DocumentType(_)))
    );
}

#[test]
fn test_empty_input_still_builds_html_head_body() {
    let tree = parse("");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);
}

#[test]
fn test_doctype_with_identifiers() {
    let tree = parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "x.dtd"><p>"#);
    let doctype = tree.doctype().unwrap();
    assert_eq!(doctype.public_id, "-//W3C//DTD XHTML 1.0 Strict//EN");
    assert_eq!(doctype.system_id, "x.dtd");
}

#[test]
fn test_comment_node() {
    let tree = parse("<html><body><!-- test comment --></body></html>");
    let body = tree.body().unwrap();
    let comment = tree.first_child(body).unwrap();
    assert_eq!(tree.as_comment(comment), Some(" test comment "));
}

#[test]
fn test_comment_after_html_goes_to_document() {
    let tree = parse("<html></html><!--x-->");
    let children = tree.children(NodeId::ROOT).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_comment(children[1]), Some("x"));
}

#[test]
fn test_comment_after_body_goes_to_html() {
    let tree = parse("<body></body><!--x-->");
    let html = tree.document_element().unwrap();
    let last = tree.last_child(html).unwrap();
    assert_eq!(tree.as_comment(last), Some("x"));
}

#[test]
fn test_text_after_body_end_returns_to_body() {
    let tree = parse("<body>a</body>b");
    assert_eq!(body_lines(&tree), vec!["\"ab\""]);
}

#[test]
fn test_whitespace_before_head_is_dropped() {
    let tree = parse("  \n<html>  <head></head></html>");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "body"]);
    assert!(tree.as_text(tree.first_child(html).unwrap()).is_none());
}

// ---------------------------------------------------------------------------
// Text and attributes
// ---------------------------------------------------------------------------

#[test]
fn test_adjacent_characters_coalesce() {
    let tree = parse("ab");
    let body = tree.body().unwrap();
    let children = tree.children(body).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(tree.as_text(children[0]), Some("ab"));
}

#[test]
fn test_text_split_by_comment_is_not_merged() {
    let tree = parse("a<!--c-->b");
    assert_eq!(body_lines(&tree), vec!["\"a\"", "<!-- c -->", "\"b\""]);
}

#[test]
fn test_character_reference_stays_verbatim() {
    let tree = parse("<p title=\"x&amp;y\">a&amp;b&lt;");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(text_content(&tree, p), "a&amp;b&lt;");
    assert_eq!(attribute(&tree, p, "title").as_deref(), Some("x&amp;y"));
}

#[test]
fn test_null_character_in_body_is_dropped() {
    let tree = parse("a\0b");
    assert_eq!(text_content(&tree, tree.body().unwrap()), "ab");
}

#[test]
fn test_element_attributes() {
    let tree = parse(r#"<div id="main" class="container"></div>"#);
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    let data = tree.as_element(div).unwrap();
    assert_eq!(data.get_attribute("id"), Some("main"));
    assert_eq!(data.get_attribute("class"), Some("container"));
    assert_eq!(data.id(), Some("main"));
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let tree = parse("<p a=1 b=2 a=3>");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    let attrs = tree.as_element(p).unwrap().attributes();
    assert_eq!(attrs.len(), 2);
    assert_eq!(attribute(&tree, p, "a").as_deref(), Some("1"));
}

#[test]
fn test_html_attributes_merge_first_wins() {
    let tree = parse(r#"<html lang="en"><body><html lang="fr" dir="rtl">"#);
    let html = tree.document_element().unwrap();
    assert_eq!(attribute(&tree, html, "lang").as_deref(), Some("en"));
    assert_eq!(attribute(&tree, html, "dir").as_deref(), Some("rtl"));
    assert_eq!(tree.as_element(html).unwrap().attributes().len(), 2);
}

#[test]
fn test_body_attributes_merge() {
    let tree = parse(r#"<body class="a">x<body class="b" id="c">"#);
    let body = tree.body().unwrap();
    assert_eq!(attribute(&tree, body, "class").as_deref(), Some("a"));
    assert_eq!(attribute(&tree, body, "id").as_deref(), Some("c"));
}

// ---------------------------------------------------------------------------
// Implied end tags and scopes
// ---------------------------------------------------------------------------

#[test]
fn test_p_closes_previous_p() {
    let tree = parse("<p>one<p>two");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["p", "p"]);
}

#[test]
fn test_block_closes_open_p() {
    let tree = parse("<p>a<div>b</div>");
    assert_eq!(
        body_lines(&tree),
        vec!["<p>", "  \"a\"", "<div>", "  \"b\""]
    );
}

#[test]
fn test_p_inside_button_is_not_closed() {
    let tree = parse("<p><button><p>x");
    let button = find_element(&tree, NodeId::ROOT, "button").unwrap();
    assert_eq!(child_tags(&tree, button), vec!["p"]);
}

#[test]
fn test_stray_p_end_tag_creates_empty_p() {
    let tree = parse("a</p>b");
    assert_eq!(body_lines(&tree), vec!["\"a\"", "<p>", "\"b\""]);
}

#[test]
fn test_li_implicit_close() {
    let tree = parse("<ul><li>a<li>b</ul>");
    let ul = find_element(&tree, NodeId::ROOT, "ul").unwrap();
    assert_eq!(child_tags(&tree, ul), vec!["li", "li"]);
}

#[test]
fn test_nested_list_li_does_not_close_outer() {
    let tree = parse("<ul><li>a<ul><li>b</ul></ul>");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<ul>",
            "  <li>",
            "    \"a\"",
            "    <ul>",
            "      <li>",
            "        \"b\"",
        ]
    );
}

#[test]
fn test_dd_dt_implicit_close() {
    let tree = parse("<dl><dt>t<dd>d<dt>u</dl>");
    let dl = find_element(&tree, NodeId::ROOT, "dl").unwrap();
    assert_eq!(child_tags(&tree, dl), vec!["dt", "dd", "dt"]);
}

#[test]
fn test_nested_heading_is_closed() {
    let tree = parse("<h1>a<h2>b");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["h1", "h2"]);
}

#[test]
fn test_mismatched_heading_end_tag_closes_heading() {
    let tree = parse("<h1>a</h2>b");
    assert_eq!(body_lines(&tree), vec!["<h1>", "  \"a\"", "\"b\""]);
}

#[test]
fn test_unmatched_end_tag_is_ignored() {
    let tree = parse("<div></span>x</div>");
    assert_eq!(body_lines(&tree), vec!["<div>", "  \"x\""]);
}

#[test]
fn test_end_tag_blocked_by_special_element() {
    let tree = parse("<span><div></span>x");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(text_content(&tree, div), "x");
}

#[test]
fn test_br_end_tag_becomes_br_element() {
    let tree = parse("a</br>b");
    assert_eq!(body_lines(&tree), vec!["\"a\"", "<br>", "\"b\""]);
}

#[test]
fn test_void_elements_do_not_nest() {
    let tree = parse(r#"<input type="text"><br><img src=x>a"#);
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["input", "br", "img"]);
}

#[test]
fn test_image_is_renamed_to_img() {
    let tree = parse("<image src=a>");
    let img = find_element(&tree, NodeId::ROOT, "img").unwrap();
    assert_eq!(attribute(&tree, img, "src").as_deref(), Some("a"));
    assert!(find_element(&tree, NodeId::ROOT, "image").is_none());
}

#[test]
fn test_nested_form_is_ignored() {
    let tree = parse("<form id=a><form id=b><input></form>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["form"]);
    let form = find_element(&tree, body, "form").unwrap();
    assert_eq!(child_tags(&tree, form), vec!["input"]);
}

#[test]
fn test_nested_button_closes_previous() {
    let tree = parse("<button>a<button>b");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["button", "button"]);
}

#[test]
fn test_option_closes_option() {
    let tree = parse("<select><option>a<option>b</select>");
    let select = find_element(&tree, NodeId::ROOT, "select").unwrap();
    assert_eq!(child_tags(&tree, select), vec!["option", "option"]);
}

#[test]
fn test_select_ignores_markup() {
    let tree = parse("<select><b>x</b><optgroup><option>y</select>z");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<select>",
            "  \"x\"",
            "  <optgroup>",
            "    <option>",
            "      \"y\"",
            "\"z\"",
        ]
    );
}

#[test]
fn test_input_inside_select_closes_select() {
    let tree = parse("<select><option>a<input>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["select", "input"]);
}

// ---------------------------------------------------------------------------
// Text-only elements
// ---------------------------------------------------------------------------

#[test]
fn test_title_content_is_rcdata() {
    let tree = parse("<title><b>x</b> &amp;</title>");
    let title = find_element(&tree, NodeId::ROOT, "title").unwrap();
    assert_eq!(tree.parent(title), tree.head());
    assert_eq!(text_content(&tree, title), "<b>x</b> &amp;");
    assert!(find_element(&tree, NodeId::ROOT, "b").is_none());
}

#[test]
fn test_style_content_preserved() {
    let tree = parse("<style>p > a { color: red; } <div></style><p>x");
    let style = find_element(&tree, NodeId::ROOT, "style").unwrap();
    assert_eq!(text_content(&tree, style), "p > a { color: red; } <div>");
    assert!(find_element(&tree, NodeId::ROOT, "div").is_none());
    assert!(find_element(&tree, tree.body().unwrap(), "p").is_some());
}

#[test]
fn test_script_content_preserved() {
    let tree = parse("<script>if (a < b && c) { x = '</div>'; }</script>");
    let script = find_element(&tree, NodeId::ROOT, "script").unwrap();
    assert_eq!(tree.parent(script), tree.head());
    assert_eq!(text_content(&tree, script), "if (a < b && c) { x = '</div>'; }");
}

#[test]
fn test_head_element_after_head_goes_into_head() {
    let tree = parse("<head></head><link rel=x><p>");
    let head = tree.head().unwrap();
    assert_eq!(child_tags(&tree, head), vec!["link"]);
}

#[test]
fn test_textarea_skips_leading_newline() {
    let tree = parse("<textarea>\nline</textarea>");
    let textarea = find_element(&tree, NodeId::ROOT, "textarea").unwrap();
    assert_eq!(text_content(&tree, textarea), "line");
}

#[test]
fn test_pre_skips_only_first_newline() {
    let tree = parse("<pre>\n\nx</pre>");
    let pre = find_element(&tree, NodeId::ROOT, "pre").unwrap();
    assert_eq!(text_content(&tree, pre), "\nx");
}

#[test]
fn test_pre_without_leading_newline_keeps_text() {
    let tree = parse("<pre>x\n</pre>");
    let pre = find_element(&tree, NodeId::ROOT, "pre").unwrap();
    assert_eq!(text_content(&tree, pre), "x\n");
}

#[test]
fn test_plaintext_swallows_the_rest() {
    let tree = parse("<plaintext></plaintext><b>");
    let plaintext = find_element(&tree, NodeId::ROOT, "plaintext").unwrap();
    assert_eq!(text_content(&tree, plaintext), "</plaintext><b>");
}

#[test]
fn test_unterminated_title_runs_to_end() {
    let tree = parse("<title>abc");
    let title = find_element(&tree, NodeId::ROOT, "title").unwrap();
    assert_eq!(text_content(&tree, title), "abc");
    assert!(tree.body().is_some());
}

// ---------------------------------------------------------------------------
// Scripting flag
// ---------------------------------------------------------------------------

#[test]
fn test_noscript_in_body_follows_scripting_flag() {
    let off = parse("<body><noscript><p>x</p></noscript>");
    let noscript = find_element(&off, NodeId::ROOT, "noscript").unwrap();
    assert_eq!(child_tags(&off, noscript), vec!["p"]);

    let on = parse_scripted("<body><noscript><p>x</p></noscript>");
    let noscript = find_element(&on, NodeId::ROOT, "noscript").unwrap();
    assert!(child_tags(&on, noscript).is_empty());
    assert_eq!(text_content(&on, noscript), "<p>x</p>");
}

#[test]
fn test_noscript_in_head_without_scripting() {
    let tree = parse("<head><noscript><link rel=a></noscript></head>");
    let head = tree.head().unwrap();
    let noscript = find_element(&tree, head, "noscript").unwrap();
    assert_eq!(child_tags(&tree, noscript), vec!["link"]);
}

#[test]
fn test_noscript_in_head_with_body_content_breaks_out() {
    let tree = parse("<head><noscript><p>x");
    let head = tree.head().unwrap();
    let noscript = find_element(&tree, head, "noscript").unwrap();
    assert!(tree.children(noscript).unwrap().is_empty());
    let p = find_element(&tree, tree.body().unwrap(), "p").unwrap();
    assert_eq!(text_content(&tree, p), "x");
}

#[test]
fn test_noembed_follows_scripting_flag() {
    let off = parse("<noembed><b>x</b></noembed>");
    let noembed = find_element(&off, NodeId::ROOT, "noembed").unwrap();
    assert_eq!(child_tags(&off, noembed), vec!["b"]);

    let on = parse_scripted("<noembed><b>x</b></noembed>");
    let noembed = find_element(&on, NodeId::ROOT, "noembed").unwrap();
    assert_eq!(text_content(&on, noembed), "<b>x</b>");
}

// ---------------------------------------------------------------------------
// Formatting elements
// ---------------------------------------------------------------------------

#[test]
fn test_adoption_agency_simple_misnesting() {
    let tree = parse("<p><b>X<i>Y</b>Z</i></p>");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<p>",
            "  <b>",
            "    \"X\"",
            "    <i>",
            "      \"Y\"",
            "  <i>",
            "    \"Z\"",
        ]
    );
}

#[test]
fn test_adoption_agency_with_furthest_block() {
    let tree = parse("<b>1<p>2</b>3</p>");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<b>",
            "  \"1\"",
            "<p>",
            "  <b>",
            "    \"2\"",
            "  \"3\"",
        ]
    );
}

#[test]
fn test_adoption_agency_nested_formatting_through_block() {
    let tree = parse("<a><b><div>x</a>y");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<a>",
            "  <b>",
            "<b>",
            "  <div>",
            "    <a>",
            "      \"x\"",
            "    \"y\"",
        ]
    );
}

#[test]
fn test_formatting_reconstruction_across_blocks() {
    let tree = parse("<p><b>bold</p><p>still bold</p></b>");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<p>",
            "  <b>",
            "    \"bold\"",
            "<p>",
            "  <b>",
            "    \"still bold\"",
        ]
    );
}

#[test]
fn test_nested_anchor_tags() {
    let tree = parse("<a href=1>x<a href=2>y");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<a href=\"1\">",
            "  \"x\"",
            "<a href=\"2\">",
            "  \"y\"",
        ]
    );
}

#[test]
fn test_nested_nobr() {
    let tree = parse("<nobr>a<nobr>b");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["nobr", "nobr"]);
}

#[test]
fn test_noahs_ark_limits_identical_entries() {
    let tree = parse("<p><b><b><b><b>x</p>y");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["p", "b"]);
    // Only three identical <b> entries survive to be reconstructed.
    let mut depth = 0;
    let mut node = tree.last_child(body);
    while let Some(id) = node {
        if tree.as_element(id).is_some_and(|e| e.tag_name == "b") {
            depth += 1;
            node = tree.first_child(id);
        } else {
            break;
        }
    }
    assert_eq!(depth, 3);
    assert_eq!(text_content(&tree, tree.last_child(body).unwrap()), "y");
}

#[test]
fn test_marker_stops_reconstruction_in_object() {
    let tree = parse("<b><object><p>x</object>y");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert!(find_element(&tree, p, "b").is_none());
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[test]
fn test_table_gets_implied_tbody() {
    let tree = parse("<table><tr><td>1</td><td>2</td></tr></table>");
    assert_eq!(
        body_lines(&tree),
        vec![
            "<table>",
            "  <tbody>",
            "    <tr>",
            "      <td>",
            "        \"1\"",
            "      <td>",
            "        \"2\"",
        ]
    );
}

#[test]
fn test_text_in_table_is_foster_parented() {
    let tree = parse("<table>x<tr><td>y</table>");
    assert_eq!(
        body_lines(&tree),
        vec![
            "\"x\"",
            "<table>",
            "  <tbody>",
            "    <tr>",
            "      <td>",
            "        \"y\"",
        ]
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    let tree = parse("<table> <tr><td>a</td></tr></table>");
    let table = find_element(&tree, NodeId::ROOT, "table").unwrap();
    let first = tree.first_child(table).unwrap();
    assert_eq!(tree.as_text(first), Some(" "));
}

#[test]
fn test_element_in_table_is_foster_parented() {
    let tree = parse("<table><div>x</div><tr><td>y</td></tr></table>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["div", "table"]);
}

#[test]
fn test_hidden_input_stays_in_table() {
    let tree = parse("<table><input type=HIDDEN><input type=text></table>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["input", "table"]);
    let table = find_element(&tree, body, "table").unwrap();
    assert_eq!(child_tags(&tree, table), vec!["input"]);
}

#[test]
fn test_caption_and_colgroup() {
    let tree = parse("<table><caption>c</caption><col><tr><td>x</table>");
    let table = find_element(&tree, NodeId::ROOT, "table").unwrap();
    assert_eq!(child_tags(&tree, table), vec!["caption", "colgroup", "tbody"]);
    let colgroup = find_element(&tree, table, "colgroup").unwrap();
    assert_eq!(child_tags(&tree, colgroup), vec!["col"]);
}

#[test]
fn test_new_cell_closes_previous_cell() {
    let tree = parse("<table><tr><td>a<td>b<tr><td>c</table>");
    let tbody = find_element(&tree, NodeId::ROOT, "tbody").unwrap();
    assert_eq!(child_tags(&tree, tbody), vec!["tr", "tr"]);
    let first_row = tree.first_child(tbody).unwrap();
    assert_eq!(child_tags(&tree, first_row), vec!["td", "td"]);
}

#[test]
fn test_nested_table_start_closes_table() {
    let tree = parse("<table><tr><td>a</td></tr><table>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["table", "table"]);
}

#[test]
fn test_table_closes_open_paragraph() {
    let tree = parse("<p>a<table><tr><td>b</table>");
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["p", "table"]);
}

#[test]
fn test_formatting_does_not_leak_into_cell() {
    let tree = parse("<b><table><tr><td>x</td></tr></table>y");
    let td = find_element(&tree, NodeId::ROOT, "td").unwrap();
    assert!(find_element(&tree, td, "b").is_none());
    let b = find_element(&tree, NodeId::ROOT, "b").unwrap();
    assert!(text_content(&tree, b).ends_with('y'));
}

#[test]
fn test_select_in_table_closes_on_cell() {
    let tree = parse("<table><tr><td><select><option>a<td>b</table>");
    let tr = find_element(&tree, NodeId::ROOT, "tr").unwrap();
    assert_eq!(child_tags(&tree, tr), vec!["td", "td"]);
}

// ---------------------------------------------------------------------------
// Templates and framesets
// ---------------------------------------------------------------------------

#[test]
fn test_template_holds_table_rows() {
    let tree = parse("<template><tr><td>x</td></tr></template>");
    let head = tree.head().unwrap();
    let template = find_element(&tree, head, "template").unwrap();
    assert_eq!(child_tags(&tree, template), vec!["tr"]);
    let td = find_element(&tree, template, "td").unwrap();
    assert_eq!(text_content(&tree, td), "x");
}

#[test]
fn test_template_in_body() {
    let tree = parse("<div><template><p>a</p></template>b</div>");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(child_tags(&tree, div), vec!["template"]);
    let template = find_element(&tree, div, "template").unwrap();
    assert_eq!(child_tags(&tree, template), vec!["p"]);
    assert_eq!(text_content(&tree, div), "ab");
}

#[test]
fn test_unclosed_template_is_closed_at_eof() {
    let tree = parse("<template><div>x");
    let template = find_element(&tree, NodeId::ROOT, "template").unwrap();
    assert_eq!(child_tags(&tree, template), vec!["div"]);
    assert!(tree.body().is_some());
}

#[test]
fn test_frameset_document() {
    let tree = parse("<frameset><frame src=a><frameset><frame></frameset></frameset>");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "frameset"]);
    // The body accessor falls back to the frameset.
    assert_eq!(tree.body(), find_element(&tree, html, "frameset"));
    assert!(find_element(&tree, html, "body").is_none());
    let frameset = find_element(&tree, html, "frameset").unwrap();
    assert_eq!(child_tags(&tree, frameset), vec!["frame", "frameset"]);
}

#[test]
fn test_frameset_after_explicit_body_is_ignored() {
    let tree = parse("<body><frameset>");
    assert!(find_element(&tree, NodeId::ROOT, "frameset").is_none());
}

#[test]
fn test_frameset_after_content_is_ignored() {
    let tree = parse("<p>x<frameset><frame>");
    assert!(find_element(&tree, NodeId::ROOT, "frameset").is_none());
    assert!(tree.body().is_some());
}

#[test]
fn test_frameset_replaces_implied_body() {
    let tree = parse("<div></div><frameset><frame>");
    let html = tree.document_element().unwrap();
    assert_eq!(child_tags(&tree, html), vec!["head", "frameset"]);
}

// ---------------------------------------------------------------------------
// Ruby and foreign elements
// ---------------------------------------------------------------------------

#[test]
fn test_ruby_annotations() {
    let tree = parse("<ruby>a<rt>b<rp>c</ruby>");
    let ruby = find_element(&tree, NodeId::ROOT, "ruby").unwrap();
    assert_eq!(child_tags(&tree, ruby), vec!["rt", "rp"]);
}

#[test]
fn test_svg_is_an_ordinary_element() {
    let tree = parse("<svg><circle r=1></circle></svg><p>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").unwrap();
    assert_eq!(child_tags(&tree, svg), vec!["circle"]);
    assert_eq!(child_tags(&tree, tree.body().unwrap()), vec!["svg", "p"]);
}

#[test]
fn test_self_closing_math_does_not_swallow_siblings() {
    let tree = parse("<math/><p>x");
    assert_eq!(child_tags(&tree, tree.body().unwrap()), vec!["math", "p"]);
}

// ---------------------------------------------------------------------------
// Parser API
// ---------------------------------------------------------------------------

#[test]
fn test_run_strict_accepts_conforming_document() {
    let parser = HTMLParser::new(HTMLTokenizer::new("<!DOCTYPE html><title>t</title><p>ok"));
    assert!(parser.run_strict().is_ok());
}

#[test]
fn test_run_strict_reports_first_error() {
    let parser = HTMLParser::new(HTMLTokenizer::new("<p>no doctype"));
    let err = parser.run_strict().unwrap_err();
    assert_eq!(err.token_index, 0);
    assert!(err.message.contains("DOCTYPE"));
    assert!(err.to_string().starts_with("parse error at token 0"));
}

#[test]
fn test_run_with_issues_collects_errors() {
    let parser = HTMLParser::new(HTMLTokenizer::new("<!DOCTYPE html><div></span></div>"));
    let (tree, issues) = parser.run_with_issues();
    assert!(find_element(&tree, NodeId::ROOT, "div").is_some());
    assert!(issues.iter().any(|issue| issue.is_error && issue.message.contains("span")));
}

#[test]
fn test_tokenizer_errors_become_issues() {
    let parser = HTMLParser::new(HTMLTokenizer::new("<!DOCTYPE html><p a=1 a=2>"));
    let (_, issues) = parser.run_with_issues();
    assert!(issues.iter().any(|issue| issue.message.contains("duplicate-attribute")));
}

#[test]
fn test_repeated_parses_report_the_same_issues() {
    let input = "<p a=1 a=1><div></span>";
    let (_, first) = HTMLParser::new(HTMLTokenizer::new(input)).run_with_issues();
    let _ = parse_document(input, ParsingFlags::empty());
    let (_, second) = HTMLParser::new(HTMLTokenizer::new(input)).run_with_issues();

    assert!(first.iter().any(|issue| issue.message == "missing DOCTYPE"));
    assert_eq!(first, second);
}

#[test]
fn test_trace_hook_sees_every_transition() {
    let transitions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&transitions);
    let tree = HTMLParser::new(HTMLTokenizer::new("<p>x"))
        .with_trace(move |old, new| sink.borrow_mut().push((old, new)))
        .run();

    let seen = transitions.borrow();
    assert_eq!(
        seen.first(),
        Some(&(InsertionMode::Initial, InsertionMode::BeforeHtml))
    );
    assert!(seen.contains(&(InsertionMode::AfterHead, InsertionMode::InBody)));
    assert!(seen.windows(2).all(|pair| pair[0].1 == pair[1].0));
    assert_eq!(format_tree(&tree), format_tree(&parse("<p>x")));
}

#[test]
fn test_trace_hook_reports_text_mode_round_trip() {
    let transitions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&transitions);
    let _ = HTMLParser::new(HTMLTokenizer::new("<body><textarea>x</textarea>"))
        .with_trace(move |old, new| sink.borrow_mut().push((old, new)))
        .run();
    let seen = transitions.borrow();
    assert!(seen.contains(&(InsertionMode::InBody, InsertionMode::Text)));
    assert!(seen.contains(&(InsertionMode::Text, InsertionMode::InBody)));
}

#[test]
fn test_single_html_root() {
    let tree = parse("<html><html><body><html>x</html></html>");
    let elements: Vec<NodeId> = tree
        .children(NodeId::ROOT)
        .unwrap()
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some())
        .collect();
    assert_eq!(elements.len(), 1);
    assert_eq!(child_tags(&tree, elements[0]), vec!["head", "body"]);
}
