//! Tests for DOM tree mutation and traversal.

use sumi_dom::{Attribute, DocumentTypeData, DomTree, ElementData, NodeId, NodeType};

fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag, [])))
}

/// Builds `div > [a, b, c]` under the document and returns (div, [a, b, c]).
fn div_with_three(tree: &mut DomTree) -> (NodeId, [NodeId; 3]) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let kids = ["a", "b", "c"].map(|tag| {
        let id = alloc_element(tree, tag);
        tree.append_child(parent, id);
        id
    });
    (parent, kids)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_only_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    tree.remove_child(parent, child);

    assert_eq!(tree.children(parent), Some(&[][..]));
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_relinks_neighbours() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = div_with_three(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), Some(&[a, c][..]));
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_first_and_last() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = div_with_three(&mut tree);

    tree.remove_child(parent, a);
    tree.remove_child(parent, c);

    assert_eq!(tree.children(parent), Some(&[b][..]));
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_ignores_non_children() {
    let mut tree = DomTree::new();
    let (parent, kids) = div_with_three(&mut tree);
    let stranger = alloc_element(&mut tree, "span");

    tree.remove_child(parent, stranger);

    assert_eq!(tree.children(parent), Some(&kids[..]));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let existing = alloc_element(&mut tree, "b");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "a");
    tree.insert_before(parent, new_child, existing);

    assert_eq!(tree.children(parent), Some(&[new_child, existing][..]));
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let (parent, [a, b, c]) = div_with_three(&mut tree);
    tree.remove_child(parent, b);

    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), Some(&[a, b, c][..]));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let (parent, [_, _, c]) = div_with_three(&mut tree);
    let stranger = alloc_element(&mut tree, "x");
    let added = alloc_element(&mut tree, "y");

    tree.insert_before(parent, added, stranger);

    assert_eq!(tree.last_child(parent), Some(added));
    assert_eq!(tree.prev_sibling(added), Some(c));
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_after_existing() {
    let mut tree = DomTree::new();
    let (from, [a, b, c]) = div_with_three(&mut tree);
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, to);
    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);

    tree.move_children(from, to);

    assert_eq!(tree.children(from), Some(&[][..]));
    assert_eq!(tree.children(to), Some(&[existing, a, b, c][..]));
    assert_eq!(tree.next_sibling(existing), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(existing));
    assert_eq!(tree.parent(c), Some(to));
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    tree.move_children(from, to);

    assert_eq!(tree.children(to), Some(&[][..]));
}

// ========== node model ==========

#[test]
fn test_leaf_nodes_report_no_children() {
    let mut tree = DomTree::new();
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    let doctype = tree.alloc(NodeType::DocumentType(DocumentTypeData::default()));

    assert_eq!(tree.children(text), None);
    assert_eq!(tree.children(comment), None);
    assert_eq!(tree.children(doctype), None);
    assert_eq!(tree.children(NodeId::ROOT), Some(&[][..]));
}

#[test]
fn test_node_names() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let text = tree.alloc(NodeType::Text(String::new()));

    assert_eq!(tree.get(NodeId::ROOT).map(|n| n.node_name()), Some("#document"));
    assert_eq!(tree.get(div).map(|n| n.node_name()), Some("div"));
    assert_eq!(tree.get(text).map(|n| n.node_name()), Some("#text"));
}

#[test]
fn test_element_attributes_first_wins() {
    let mut data = ElementData::new(
        "input",
        [
            Attribute::new("type", "text"),
            Attribute::new("name", "q"),
            Attribute::new("type", "hidden"),
        ],
    );

    assert_eq!(data.attributes().len(), 2);
    assert_eq!(data.get_attribute("type"), Some("text"));

    assert!(!data.add_attribute_if_missing(Attribute::new("name", "other")));
    assert!(data.add_attribute_if_missing(Attribute::new("id", "search")));
    assert_eq!(data.id(), Some("search"));
    assert_eq!(data.get_attribute("name"), Some("q"));
}

#[test]
fn test_doctype_absent_until_appended() {
    let mut tree = DomTree::new();
    assert!(tree.doctype().is_none());

    let doctype = tree.alloc(NodeType::DocumentType(DocumentTypeData {
        name: "html".to_string(),
        ..DocumentTypeData::default()
    }));
    tree.append_child(NodeId::ROOT, doctype);

    let data = tree.doctype().expect("doctype should be present");
    assert_eq!(data.name, "html");
    assert_eq!(data.public_id, "");
    assert_eq!(data.system_id, "");
}

#[test]
fn test_descendants_are_depth_first() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);
    let title = alloc_element(&mut tree, "title");
    tree.append_child(head, title);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![NodeId::ROOT, html, head, title, body]);
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
    assert!(tree.is_descendant_of(title, html));
    assert!(!tree.is_descendant_of(body, head));
}
