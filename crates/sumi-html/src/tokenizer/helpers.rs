//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! state transitions, input lookahead, token emission and parse error
//! reporting.

use std::collections::HashSet;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    ///
    /// Returns None at the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// "If the next few characters are..."
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input[self.current_pos..]
            .get(..target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// Consume an ASCII string the caller has already matched with one of the
    /// lookahead helpers.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// The whitespace set the tokenizer switches on.
    ///
    /// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF), U+000C FORM
    /// FEED (FF), U+0020 SPACE". CR never reaches the state machine.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// Remembers the name of every emitted start tag for the "appropriate end
    /// tag" check. The lexical state is left alone: switching to RCDATA and
    /// friends is the tree builder's decision.
    pub(super) fn emit_current_token(&mut self) {
        let Some(token) = self.current_token.take() else {
            return;
        };
        match &token {
            Token::StartTag {
                name, attributes, ..
            } => {
                // "If there is already an attribute on the token with the exact same
                // name, then this is a duplicate-attribute parse error." The repeat
                // stays on the token; the tree builder keeps the first.
                let mut seen = HashSet::new();
                if !attributes.iter().all(|attr| seen.insert(attr.name.as_str())) {
                    self.parse_error("duplicate-attribute");
                }
                self.last_start_tag_name = Some(name.clone());
            }
            // "When an end tag token is emitted with attributes, that is an
            // end-tag-with-attributes parse error. When an end tag token is emitted
            // with its self-closing flag set, that is an end-tag-with-trailing-solidus
            // parse error."
            Token::EndTag {
                self_closing,
                attributes,
                ..
            } => {
                if !attributes.is_empty() {
                    self.parse_error("end-tag-with-attributes");
                }
                if *self_closing {
                    self.parse_error("end-tag-with-trailing-solidus");
                }
            }
            _ => {}
        }
        self.pending_tokens.push_back(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.pending_tokens.push_back(Token::new_character(c));
    }

    /// Emit one character token per character of `s`.
    pub(super) fn emit_string(&mut self, s: &str) {
        self.pending_tokens.extend(s.chars().map(Token::new_character));
    }

    /// "Emit an end-of-file token."
    ///
    /// Nothing is produced after this.
    pub(super) fn emit_eof_token(&mut self) {
        if !self.emitted_eof {
            self.pending_tokens.push_back(Token::EndOfFile);
            self.emitted_eof = true;
        }
    }
}

// =============================================================================
// RCDATA/RAWTEXT/Script Data Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(Token::EndTag { name, .. })) => name == last_start_tag,
            _ => false,
        }
    }

    /// "Anything else" branch of every end tag name state:
    ///
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the ...
    /// state."
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_string("</");
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_string(&buffer);
        self.current_token = None;
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors are never fatal. The tokenizer keeps them for
    /// [`HTMLTokenizer::take_errors`] and recovers.
    pub(super) fn parse_error(&mut self, code: &str) {
        let message = format!("{code} at position {}", self.current_pos);
        self.errors.push(message);
    }
}
