//! Character reference handling for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! References are not decoded. The `&` that opened one is flushed back
//! verbatim and the characters after it are tokenized normally, so `&amp;`
//! reaches the tree as the five characters `&amp;`.

use super::core::{HTMLTokenizer, TokenizerState};

impl HTMLTokenizer {
    /// "consumed as part of an attribute": the return state is one of the
    /// attribute value states.
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            if let Some(token) = self.current_token.as_mut() {
                for c in buffer.chars() {
                    token.append_to_current_attribute_value(c);
                }
            }
        } else {
            self.emit_string(&buffer);
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// "Set the temporary buffer to the empty string. Append a U+0026
    /// AMPERSAND (&) character to the temporary buffer."
    ///
    /// Then take the "anything else" branch unconditionally: "Flush code
    /// points consumed as a character reference. Reconsume in the return
    /// state."
    pub(super) fn handle_character_reference_state(&mut self) {
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');
        self.flush_code_points_consumed_as_character_reference();
        let return_state = self.return_state.take().unwrap_or(TokenizerState::Data);
        self.reconsume_in(return_state);
    }
}
