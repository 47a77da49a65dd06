//! HTML tokenizer and tree builder for sumi.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data and PLAINTEXT content models
//!   - Tag, attribute, comment, DOCTYPE and CDATA states
//!   - The character reference entry state, which passes `&` through literally
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes, including tables, select and template
//!   - The list of active formatting elements and the adoption agency algorithm
//!   - Foster parenting
//!
//! # Not Implemented
//!
//! - Named and numeric character reference decoding
//! - Foreign content (SVG and MathML are parsed as ordinary elements)
//! - Fragment parsing and script execution
//!
//! # Example
//!
//! ```
//! use sumi_html::{ParsingFlags, parse_document};
//!
//! let tree = parse_document("<p>Hello", ParsingFlags::empty());
//! let body = tree.body().unwrap();
//! assert_eq!(tree.children(body).unwrap().len(), 1);
//! ```

/// Parser configuration flags.
pub mod config;
/// Error returned by strict parsing.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use config::ParsingFlags;
pub use error::ParseError;
pub use parser::{
    HTMLParser, InsertionMode, ParseIssue, TraceHook, format_tree, parse_document, print_tree,
};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};
