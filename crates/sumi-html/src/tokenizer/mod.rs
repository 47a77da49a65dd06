//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Character reference entry state.
mod character_reference;
/// Comment states.
mod comment;
/// HTML tokenizer state machine implementation.
pub mod core;
/// DOCTYPE states.
mod doctype;
/// Helper methods for tokenizer state transitions.
mod helpers;
/// Script data states.
mod script;
/// Token types produced by the tokenizer.
pub mod token;

pub use core::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};
