//! The table insertion modes: "in table" through "in cell".

use crate::tokenizer::Token;

use super::super::core::{Flow, HTMLParser, InsertionMode};
use super::super::stack::Scope;

/// "Clear the stack back to a table context"
const TABLE_CONTEXT: &[&str] = &["table", "template"];
/// "Clear the stack back to a table body context"
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template"];
/// "Clear the stack back to a table row context"
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template"];

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(in crate::parser) fn handle_in_table_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token, if the current node is table, tbody, template, tfoot,
            // thead, or tr element" - "Let the pending table character tokens be an
            // empty list of tokens. Let the original insertion mode be the current
            // insertion mode. Switch the insertion mode to 'in table text' and
            // reprocess the token."
            Token::Character { .. }
                if self.current_node_is_one_of(&[
                    "table", "tbody", "template", "tfoot", "thead", "tr",
                ]) =>
            {
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.reprocess_in(InsertionMode::InTableText)
            }
            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }
            Token::Doctype { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            Token::StartTag { name, .. } => match name.as_str() {
                // "Clear the stack back to a table context. Insert a marker at the end
                // of the list of active formatting elements. Insert an HTML element
                // for the token, then switch the insertion mode to 'in caption'."
                "caption" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    self.push_active_formatting_marker();
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InCaption);
                    Flow::Done
                }
                "colgroup" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InColumnGroup);
                    Flow::Done
                }
                // "Clear the stack back to a table context. Insert an HTML element for
                // a 'colgroup' start tag token with no attributes, then switch the
                // insertion mode to 'in column group'. Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element_named("colgroup");
                    self.reprocess_in(InsertionMode::InColumnGroup)
                }
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InTableBody);
                    Flow::Done
                }
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element_named("tbody");
                    self.reprocess_in(InsertionMode::InTableBody)
                }
                // "A start tag whose tag name is 'table'" - "Parse error. If the stack of
                // open elements does not have a table element in table scope, ignore
                // the token. Otherwise: pop elements from this stack until a table
                // element has been popped from the stack; reset the insertion mode
                // appropriately; reprocess the token."
                "table" => {
                    self.unexpected(token);
                    if !self.has_element_in_scope("table", Scope::Table) {
                        return Flow::Done;
                    }
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    Flow::Reprocess
                }
                "style" | "script" | "template" => {
                    self.process_using_rules_for(InsertionMode::InHead, token)
                }
                // "A start tag whose tag name is 'input'" - only a hidden input stays
                // inside the table.
                "input" if Self::is_hidden_input(token) => {
                    self.unexpected(token);
                    let _ = self.insert_void_element(token);
                    Flow::Done
                }
                // "A start tag whose tag name is 'form'" - "Parse error. If there is a
                // template element on the stack of open elements, or if the form element
                // pointer is not null, ignore the token. Otherwise: insert an HTML
                // element for the token, and set the form element pointer to point to
                // the element created. Pop that form element off the stack of open
                // elements."
                "form" => {
                    self.unexpected(token);
                    if self.stack_contains("template") || self.form_element_pointer.is_some() {
                        return Flow::Done;
                    }
                    let form = self.insert_void_element(token);
                    self.form_element_pointer = Some(form);
                    Flow::Done
                }
                _ => self.in_table_anything_else(token),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is 'table'"
                "table" => {
                    if !self.has_element_in_scope("table", Scope::Table) {
                        self.unexpected(token);
                        return Flow::Done;
                    }
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    Flow::Done
                }
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.unexpected(token);
                    Flow::Done
                }
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),
                _ => self.in_table_anything_else(token),
            },
            // "An end-of-file token" - "Process the token using the rules for the 'in
            // body' insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),
            Token::Character { .. } => self.in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the rules
    /// for the 'in body' insertion mode, and then disable foster parenting."
    fn in_table_anything_else(&mut self, token: &Token) -> Flow {
        self.unexpected(token);
        self.foster_parenting = true;
        let flow = self.process_using_rules_for(InsertionMode::InBody, token);
        self.foster_parenting = false;
        flow
    }

    fn is_hidden_input(token: &Token) -> bool {
        let Token::StartTag { attributes, .. } = token else {
            return false;
        };
        attributes
            .iter()
            .find(|attribute| attribute.name == "type")
            .is_some_and(|attribute| attribute.value.eq_ignore_ascii_case("hidden"))
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(in crate::parser) fn handle_in_table_text_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data: '\0' } => {
                self.parse_error("unexpected NULL character");
                Flow::Done
            }
            // "Any other character token" - "Append the character token to the pending
            // table character tokens list."
            Token::Character { data } => {
                self.pending_table_character_tokens.push(*data);
                Flow::Done
            }
            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);
                // "If any of the tokens in the pending table character tokens list are
                // character tokens that are not ASCII whitespace, then this is a parse
                // error: reprocess the character tokens in the pending table character
                // tokens list using the rules given in the 'anything else' entry in
                // the 'in table' insertion mode."
                if pending.iter().any(|&c| !Self::is_whitespace(c)) {
                    self.parse_error("text directly inside a table");
                    self.foster_parenting = true;
                    for c in pending {
                        let _ = self.process_using_rules_for(
                            InsertionMode::InBody,
                            &Token::Character { data: c },
                        );
                    }
                    self.foster_parenting = false;
                } else {
                    // "Otherwise, insert the characters given by the pending table
                    // character tokens list."
                    for c in pending {
                        self.insert_character(c);
                    }
                }
                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                let mode = self.take_original_insertion_mode();
                self.reprocess_in(mode)
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(in crate::parser) fn handle_in_caption_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::EndTag { name, .. } if name == "caption" => {
                if self.close_caption(token) {
                    self.switch_mode(InsertionMode::InTable);
                }
                Flow::Done
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.close_caption_and_reprocess(token)
            }
            Token::EndTag { name, .. } if name == "table" => self.close_caption_and_reprocess(token),
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.unexpected(token);
                Flow::Done
            }
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// "If the stack of open elements does not have a caption element in table
    /// scope, this is a parse error; ignore the token. Otherwise: generate
    /// implied end tags; if the current node is not a caption element, this is
    /// a parse error; pop elements until a caption element has been popped;
    /// clear the list of active formatting elements up to the last marker."
    ///
    /// Returns whether a caption was closed.
    fn close_caption(&mut self, token: &Token) -> bool {
        if !self.has_element_in_scope("caption", Scope::Table) {
            self.unexpected(token);
            return false;
        }
        self.generate_implied_end_tags(None);
        if !self.current_node_is("caption") {
            self.parse_error("caption closed with open children");
        }
        self.pop_until("caption");
        self.clear_active_formatting_elements_to_last_marker();
        true
    }

    fn close_caption_and_reprocess(&mut self, token: &Token) -> Flow {
        if self.close_caption(token) {
            self.reprocess_in(InsertionMode::InTable)
        } else {
            Flow::Done
        }
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(in crate::parser) fn handle_in_column_group_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
                Flow::Done
            }
            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }
            Token::Doctype { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_void_element(token);
                Flow::Done
            }
            // "An end tag whose tag name is 'colgroup'" - "If the current node is not a
            // colgroup element, then this is a parse error; ignore the token.
            // Otherwise, pop the current node from the stack of open elements. Switch
            // the insertion mode to 'in table'."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.unexpected(token);
                    return Flow::Done;
                }
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InTable);
                Flow::Done
            }
            Token::EndTag { name, .. } if name == "col" => {
                self.unexpected(token);
                Flow::Done
            }
            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token)
            }
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),
            // "Anything else" - "If the current node is not a colgroup element, then
            // this is a parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to 'in table'.
            // Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.unexpected(token);
                    return Flow::Done;
                }
                let _ = self.stack_of_open_elements.pop();
                self.reprocess_in(InsertionMode::InTable)
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(in crate::parser) fn handle_in_table_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "Clear the stack back to a table body context. Insert an HTML element for
            // the token, then switch the insertion mode to 'in row'."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InRow);
                Flow::Done
            }
            // "A start tag whose tag name is one of: 'th', 'td'" - "Parse error. Clear
            // the stack back to a table body context. Insert an HTML element for a 'tr'
            // start tag token with no attributes, then switch the insertion mode to 'in
            // row'. Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.unexpected(token);
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.insert_html_element_named("tr");
                self.reprocess_in(InsertionMode::InRow)
            }
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InTable);
                Flow::Done
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead"
                ) =>
            {
                self.close_table_section_and_reprocess(token)
            }
            Token::EndTag { name, .. } if name == "table" => {
                self.close_table_section_and_reprocess(token)
            }
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.unexpected(token);
                Flow::Done
            }
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: clear the stack back to a table body context; pop the current
    /// node from the stack of open elements. Switch the insertion mode to 'in
    /// table'. Reprocess the token."
    fn close_table_section_and_reprocess(&mut self, token: &Token) -> Flow {
        if !self.has_any_element_in_scope(TABLE_SECTIONS, Scope::Table) {
            self.unexpected(token);
            return Flow::Done;
        }
        self.clear_stack_back_to(TABLE_BODY_CONTEXT);
        let _ = self.stack_of_open_elements.pop();
        self.reprocess_in(InsertionMode::InTable)
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(in crate::parser) fn handle_in_row_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A start tag whose tag name is one of: 'th', 'td'" - "Clear the stack back
            // to a table row context. Insert an HTML element for the token, then switch
            // the insertion mode to 'in cell'. Insert a marker at the end of the list of
            // active formatting elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                let _ = self.insert_html_element(token);
                self.switch_mode(InsertionMode::InCell);
                self.push_active_formatting_marker();
                Flow::Done
            }
            Token::EndTag { name, .. } if name == "tr" => {
                if self.close_row(token) {
                    self.switch_mode(InsertionMode::InTableBody);
                }
                Flow::Done
            }
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                self.close_row_and_reprocess(token)
            }
            Token::EndTag { name, .. } if name == "table" => self.close_row_and_reprocess(token),
            // "An end tag whose tag name is one of: 'tbody', 'tfoot', 'thead'" - "If the
            // stack of open elements does not have an element in table scope that is an
            // HTML element with the same tag name as the token, this is a parse error;
            // ignore the token. If the stack of open elements does not have a tr element
            // in table scope, ignore the token."
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                if !self.has_element_in_scope("tr", Scope::Table) {
                    return Flow::Done;
                }
                self.close_row_and_reprocess(token)
            }
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.unexpected(token);
                Flow::Done
            }
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// "If the stack of open elements does not have a tr element in table
    /// scope, this is a parse error; ignore the token. Otherwise: clear the
    /// stack back to a table row context; pop the current node (which will be
    /// a tr element) from the stack of open elements."
    ///
    /// Returns whether a row was closed.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.has_element_in_scope("tr", Scope::Table) {
            self.unexpected(token);
            return false;
        }
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        let _ = self.stack_of_open_elements.pop();
        true
    }

    fn close_row_and_reprocess(&mut self, token: &Token) -> Flow {
        if self.close_row(token) {
            self.reprocess_in(InsertionMode::InTableBody)
        } else {
            Flow::Done
        }
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(in crate::parser) fn handle_in_cell_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "An end tag whose tag name is one of: 'td', 'th'"
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(&format!("</{name}> closes open children"));
                }
                self.pop_until(name);
                self.clear_active_formatting_elements_to_last_marker();
                self.switch_mode(InsertionMode::InRow);
                Flow::Done
            }
            // "A start tag whose tag name is one of: 'caption', 'col', 'colgroup',
            // 'tbody', 'td', 'tfoot', 'th', 'thead', 'tr'" - "Assert: The stack of open
            // elements has a td or th element in table scope. Close the cell and
            // reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if !self.has_any_element_in_scope(&["td", "th"], Scope::Table) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.close_the_cell();
                Flow::Reprocess
            }
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.unexpected(token);
                Flow::Done
            }
            // "An end tag whose tag name is one of: 'table', 'tbody', 'tfoot', 'thead',
            // 'tr'" - "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token. Otherwise, close the
            // cell and reprocess the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.has_element_in_scope(name, Scope::Table) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.close_the_cell();
                Flow::Reprocess
            }
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }
}
