//! DOCTYPE states, [§ 13.2.5.53](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
//! through [§ 13.2.5.68](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state).

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

/// Which DOCTYPE identifier a shared state handler is working on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Identifier {
    Public,
    System,
}

impl Identifier {
    const fn quoted_state(self, quote: char) -> TokenizerState {
        match (self, quote) {
            (Self::Public, '"') => TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted,
            (Self::Public, _) => TokenizerState::DOCTYPEPublicIdentifierSingleQuoted,
            (Self::System, '"') => TokenizerState::DOCTYPESystemIdentifierDoubleQuoted,
            (Self::System, _) => TokenizerState::DOCTYPESystemIdentifierSingleQuoted,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::System => "system",
        }
    }
}

impl HTMLTokenizer {
    fn doctype_token(&mut self) -> Option<&mut Token> {
        self.current_token.as_mut()
    }

    fn set_force_quirks(&mut self) {
        if let Some(token) = self.doctype_token() {
            token.set_force_quirks();
        }
    }

    fn set_identifier_empty(&mut self, which: Identifier) {
        if let Some(token) = self.doctype_token() {
            match which {
                Identifier::Public => token.set_public_identifier_empty(),
                Identifier::System => token.set_system_identifier_empty(),
            }
        }
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error("eof-in-doctype");
        if self.current_token.is_none() {
            self.current_token = Some(Token::new_doctype());
        }
        self.set_force_quirks();
        self.emit_current_token();
        self.emit_eof_token();
    }

    /// Set force-quirks, switch to the data state and emit. Used by every
    /// "abrupt" or "missing" `>` entry.
    fn emit_quirky_doctype(&mut self, code: &str) {
        self.parse_error(code);
        self.set_force_quirks();
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    fn finish_doctype(&mut self) {
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.parse_error("missing-whitespace-before-doctype-name");
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Switch to the data state. Emit the
            // current token."
            Some('>') => {
                self.current_token = Some(Token::new_doctype());
                self.emit_quirky_doctype("missing-doctype-name");
            }
            None => self.eof_in_doctype(),
            // "Create a new DOCTYPE token. Set the token's name to the lowercase
            // version of the current input character. Switch to the DOCTYPE name
            // state." NUL becomes U+FFFD.
            Some(c) => {
                if c == '\0' {
                    self.parse_error("unexpected-null-character");
                }
                let mut token = Token::new_doctype();
                token.append_to_doctype_name(Self::tag_name_character(c));
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            Some('>') => self.finish_doctype(),
            None => self.eof_in_doctype(),
            Some(c) => {
                if c == '\0' {
                    self.parse_error("unexpected-null-character");
                }
                let c = Self::tag_name_character(c);
                if let Some(token) = self.doctype_token() {
                    token.append_to_doctype_name(c);
                }
            }
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.finish_doctype(),
            None => self.eof_in_doctype(),
            // "If the six characters starting from the current input character are
            // an ASCII case-insensitive match for the word 'PUBLIC', then consume
            // those characters and switch to the after DOCTYPE public keyword state."
            Some(c)
                if c.eq_ignore_ascii_case(&'p')
                    && self.next_few_characters_are_case_insensitive("UBLIC") =>
            {
                self.consume_string("UBLIC");
                self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
            }
            Some(c)
                if c.eq_ignore_ascii_case(&'s')
                    && self.next_few_characters_are_case_insensitive("YSTEM") =>
            {
                self.consume_string("YSTEM");
                self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
            }
            // "Otherwise, this is an invalid-character-sequence-after-doctype-name
            // parse error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            Some(_) => {
                self.parse_error("invalid-character-sequence-after-doctype-name");
                self.set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    pub(super) fn handle_after_doctype_public_keyword_state(&mut self) {
        self.handle_after_identifier_keyword(
            Identifier::Public,
            TokenizerState::BeforeDOCTYPEPublicIdentifier,
        );
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_system_keyword_state(&mut self) {
        self.handle_after_identifier_keyword(
            Identifier::System,
            TokenizerState::BeforeDOCTYPESystemIdentifier,
        );
    }

    fn handle_after_identifier_keyword(&mut self, which: Identifier, before: TokenizerState) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(before),
            // "This is a missing-whitespace-after-doctype-public-keyword parse error.
            // Set the current DOCTYPE token's public identifier to the empty string
            // (not missing), then switch to the DOCTYPE public identifier
            // (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(&format!(
                    "missing-whitespace-after-doctype-{}-keyword",
                    which.name()
                ));
                self.set_identifier_empty(which);
                self.switch_to(which.quoted_state(quote));
            }
            _ => self.handle_before_identifier_fallback(which),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    pub(super) fn handle_before_doctype_public_identifier_state(&mut self) {
        self.handle_before_identifier(Identifier::Public);
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_system_identifier_state(&mut self) {
        self.handle_before_identifier(Identifier::System);
    }

    fn handle_before_identifier(&mut self, which: Identifier) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => {
                self.set_identifier_empty(which);
                self.switch_to(which.quoted_state(quote));
            }
            _ => self.handle_before_identifier_fallback(which),
        }
    }

    /// The `>`, EOF and "anything else" entries shared by the keyword and
    /// before-identifier states.
    fn handle_before_identifier_fallback(&mut self, which: Identifier) {
        match self.current_input_character {
            Some('>') => {
                self.emit_quirky_doctype(&format!("missing-doctype-{}-identifier", which.name()));
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                self.parse_error(&format!(
                    "missing-quote-before-doctype-{}-identifier",
                    which.name()
                ));
                self.set_force_quirks();
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_public_identifier_quoted_state(&mut self, quote: char) {
        self.handle_identifier_quoted(
            Identifier::Public,
            quote,
            TokenizerState::AfterDOCTYPEPublicIdentifier,
        );
    }

    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_system_identifier_quoted_state(&mut self, quote: char) {
        self.handle_identifier_quoted(
            Identifier::System,
            quote,
            TokenizerState::AfterDOCTYPESystemIdentifier,
        );
    }

    fn handle_identifier_quoted(&mut self, which: Identifier, quote: char, after: TokenizerState) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(after),
            // "This is an abrupt-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
            // the current DOCTYPE token."
            Some('>') => {
                self.emit_quirky_doctype(&format!("abrupt-doctype-{}-identifier", which.name()));
            }
            None => self.eof_in_doctype(),
            Some(c) => {
                let c = if c == '\0' {
                    self.parse_error("unexpected-null-character");
                    '\u{FFFD}'
                } else {
                    c
                };
                if let Some(token) = self.doctype_token() {
                    match which {
                        Identifier::Public => token.append_to_public_identifier(c),
                        Identifier::System => token.append_to_system_identifier(c),
                    }
                }
            }
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => self.finish_doctype(),
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    "missing-whitespace-between-doctype-public-and-system-identifiers",
                );
                self.set_identifier_empty(Identifier::System);
                self.switch_to(Identifier::System.quoted_state(quote));
            }
            _ => self.handle_before_identifier_fallback(Identifier::System),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.finish_doctype(),
            _ => self.handle_before_identifier(Identifier::System),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => self.finish_doctype(),
            None => self.eof_in_doctype(),
            // "This is an unexpected-character-after-doctype-system-identifier parse
            // error. Reconsume in the bogus DOCTYPE state. (This does not set the
            // current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error("unexpected-character-after-doctype-system-identifier");
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.finish_doctype(),
            Some('\0') => self.parse_error("unexpected-null-character"),
            // "Emit the DOCTYPE. Emit an end-of-file token."
            None => {
                self.emit_current_token();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }
}
