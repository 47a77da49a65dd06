//! Property tests over generated markup.

use std::collections::HashSet;

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use sumi_dom::{DomTree, NodeId};
use sumi_html::{HTMLTokenizer, ParsingFlags, Token, parse_document};

/// Pieces that reach most insertion modes when glued together at random.
const FRAGMENTS: &[&str] = &[
    "<html>", "</html>", "<head>", "</head>", "<body>", "</body>", "<p>", "</p>", "<div>",
    "</div>", "<b>", "</b>", "<i>", "</i>", "<a href=x>", "</a>", "<nobr>", "<table>",
    "</table>", "<tr>", "<td>", "</td>", "<th>", "<caption>", "<colgroup>", "<col>", "<tbody>",
    "<select>", "<option>", "<optgroup>", "</select>", "<template>", "</template>", "<title>",
    "</title>", "<textarea>", "</textarea>", "<script>", "</script>", "<style>", "</style>",
    "<noscript>", "</noscript>", "<frameset>", "<frame>", "</frameset>", "<li>", "<dd>",
    "<h1>", "</h2>", "<pre>", "\n", "<br>", "</br>", "<input type=hidden>", "<form>", "</form>",
    "<button>", "<ruby><rt>", "<svg/>", "<plaintext>", "<!-- c -->", "<p a=1 a=2 b=3>",
    "<html lang=x>", "<body id=y>", "&amp;", "text", " ", "\0", "<", "</", "<!", "<?x>",
];

#[derive(Debug, Clone)]
struct Markup(String);

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 40;
        let mut out = String::new();
        for _ in 0..len {
            if let Some(fragment) = g.choose(FRAGMENTS) {
                out.push_str(fragment);
            }
        }
        Self(out)
    }
}

fn element_children(tree: &DomTree, id: NodeId) -> Vec<NodeId> {
    tree.children(id)
        .unwrap_or_default()
        .iter()
        .copied()
        .filter(|&child| tree.as_element(child).is_some())
        .collect()
}

#[quickcheck]
fn prop_single_html_root(markup: Markup, scripting: bool) -> bool {
    let flags = if scripting {
        ParsingFlags::SCRIPTING
    } else {
        ParsingFlags::empty()
    };
    let tree = parse_document(&markup.0, flags);
    let roots = element_children(&tree, NodeId::ROOT);
    roots.len() == 1 && tree.as_element(roots[0]).is_some_and(|e| e.tag_name == "html")
}

#[quickcheck]
fn prop_no_doctype_without_doctype_token(markup: Markup) -> bool {
    parse_document(&markup.0, ParsingFlags::empty())
        .doctype()
        .is_none()
}

#[quickcheck]
fn prop_attribute_names_are_unique(markup: Markup) -> bool {
    let tree = parse_document(&markup.0, ParsingFlags::empty());
    tree.descendants(NodeId::ROOT).all(|id| {
        tree.as_element(id).is_none_or(|element| {
            let mut seen = HashSet::new();
            element
                .attributes()
                .iter()
                .all(|attr| seen.insert(attr.name.as_str()))
        })
    })
}

#[quickcheck]
fn prop_links_are_consistent(markup: Markup) -> bool {
    let tree = parse_document(&markup.0, ParsingFlags::empty());
    tree.descendants(NodeId::ROOT).all(|id| {
        let children = tree.children(id).unwrap_or_default();
        children.iter().enumerate().all(|(index, &child)| {
            tree.parent(child) == Some(id)
                && tree.prev_sibling(child) == index.checked_sub(1).map(|i| children[i])
                && tree.next_sibling(child) == children.get(index + 1).copied()
        })
    })
}

#[quickcheck]
fn prop_end_of_file_exactly_once(input: String) -> bool {
    let mut tokenizer = HTMLTokenizer::new(&input);
    let tokens: Vec<Token> = tokenizer.by_ref().collect();
    let eof_count = tokens
        .iter()
        .filter(|token| matches!(token, Token::EndOfFile))
        .count();
    eof_count == 1 && tokens.last() == Some(&Token::EndOfFile) && tokenizer.next_token().is_none()
}

#[quickcheck]
fn prop_arbitrary_text_never_panics(input: String) -> bool {
    let tree = parse_document(&input, ParsingFlags::empty());
    tree.document_element().is_some()
}
