//! HTML tree construction.
//!
//! [`HTMLParser`] pulls tokens from an [`HTMLTokenizer`](crate::tokenizer::HTMLTokenizer)
//! and builds a [`DomTree`](sumi_dom::DomTree) following the insertion modes of
//! [§ 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction).

mod core;
mod formatting;
mod insertion;
mod modes;
mod print;
mod stack;

pub use self::core::{HTMLParser, InsertionMode, ParseIssue, TraceHook, parse_document};
pub use print::{format_tree, print_tree};
