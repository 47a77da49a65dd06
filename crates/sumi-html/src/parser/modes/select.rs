//! The "in select", "in select in table" and "in template" insertion modes.

use crate::tokenizer::Token;

use super::super::core::{Flow, HTMLParser, InsertionMode};
use super::super::stack::Scope;

const TABLE_PARTS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data: '\0' } => {
                self.parse_error("unexpected NULL character");
                Flow::Done
            }
            Token::Character { data } => {
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
            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),
                // "If the current node is an option element, pop that node from the
                // stack of open elements. Insert an HTML element for the token."
                "option" => {
                    self.pop_if_current_is("option");
                    let _ = self.insert_html_element(token);
                    Flow::Done
                }
                "optgroup" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token);
                    Flow::Done
                }
                "hr" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_void_element(token);
                    Flow::Done
                }
                // "A start tag whose tag name is 'select'" - "Parse error. If the stack
                // of open elements does not have a select element in select scope,
                // ignore the token. Otherwise: pop elements from the stack of open
                // elements until a select element has been popped from the stack; reset
                // the insertion mode appropriately."
                "select" => {
                    self.unexpected(token);
                    if self.has_element_in_scope("select", Scope::Select) {
                        self.close_select();
                    }
                    Flow::Done
                }
                // "A start tag whose tag name is one of: 'input', 'keygen', 'textarea'" -
                // as for select, then "Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.unexpected(token);
                    if !self.has_element_in_scope("select", Scope::Select) {
                        return Flow::Done;
                    }
                    self.close_select();
                    Flow::Reprocess
                }
                "script" | "template" => self.process_using_rules_for(InsertionMode::InHead, token),
                _ => {
                    self.unexpected(token);
                    Flow::Done
                }
            },
            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is 'optgroup'" - "First, if the current node
                // is an option element, and the node immediately before it in the stack
                // of open elements is an optgroup element, then pop the current node from
                // the stack of open elements. If the current node is an optgroup element,
                // then pop that node from the stack of open elements. Otherwise, this is
                // a parse error; ignore the token."
                "optgroup" => {
                    let stack = &self.stack_of_open_elements;
                    if stack.len() >= 2
                        && self.node_is(stack[stack.len() - 1], "option")
                        && self.node_is(stack[stack.len() - 2], "optgroup")
                    {
                        let _ = self.stack_of_open_elements.pop();
                    }
                    if self.current_node_is("optgroup") {
                        let _ = self.stack_of_open_elements.pop();
                    } else {
                        self.unexpected(token);
                    }
                    Flow::Done
                }
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.stack_of_open_elements.pop();
                    } else {
                        self.unexpected(token);
                    }
                    Flow::Done
                }
                "select" => {
                    if self.has_element_in_scope("select", Scope::Select) {
                        self.close_select();
                    } else {
                        self.unexpected(token);
                    }
                    Flow::Done
                }
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),
                _ => {
                    self.unexpected(token);
                    Flow::Done
                }
            },
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    fn pop_if_current_is(&mut self, tag: &str) {
        if self.current_node_is(tag) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// "Pop elements from the stack of open elements until a select element
    /// has been popped from the stack. Reset the insertion mode appropriately."
    fn close_select(&mut self) {
        self.pop_until("select");
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(in crate::parser) fn handle_in_select_in_table_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A start tag whose tag name is one of: 'caption', 'table', 'tbody',
            // 'tfoot', 'thead', 'tr', 'td', 'th'" - "Parse error. Pop elements from the
            // stack of open elements until a select element has been popped from the
            // stack. Reset the insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.unexpected(token);
                self.close_select();
                Flow::Reprocess
            }
            // The matching end tags do the same, but only when the element they name
            // is in table scope.
            Token::EndTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.unexpected(token);
                if !self.has_element_in_scope(name, Scope::Table) {
                    return Flow::Done;
                }
                self.close_select();
                Flow::Reprocess
            }
            _ => self.process_using_rules_for(InsertionMode::InSelect, token),
        }
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(in crate::parser) fn handle_in_template_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            Token::StartTag { name, .. } => match name.as_str() {
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    self.process_using_rules_for(InsertionMode::InHead, token)
                }
                "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.retarget_template_mode(InsertionMode::InTable)
                }
                "col" => self.retarget_template_mode(InsertionMode::InColumnGroup),
                "tr" => self.retarget_template_mode(InsertionMode::InTableBody),
                "td" | "th" => self.retarget_template_mode(InsertionMode::InRow),
                _ => self.retarget_template_mode(InsertionMode::InBody),
            },
            Token::EndTag { name, .. } if name == "template" => {
                self.process_using_rules_for(InsertionMode::InHead, token)
            }
            Token::EndTag { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open elements, then
                // stop parsing."
                if !self.stack_contains("template") {
                    return self.stop_parsing();
                }
                // "Otherwise, this is a parse error."
                self.parse_error("end of file inside template");
                self.pop_until("template");
                self.clear_active_formatting_elements_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
                Flow::Reprocess
            }
        }
    }

    /// "Pop the current template insertion mode off the stack of template
    /// insertion modes. Push `mode` onto the stack of template insertion modes
    /// so that it is the new current template insertion mode. Switch the
    /// insertion mode to `mode`, and reprocess the token."
    fn retarget_template_mode(&mut self, mode: InsertionMode) -> Flow {
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.reprocess_in(mode)
    }
}
