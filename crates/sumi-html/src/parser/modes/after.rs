//! The modes after the body closes, and the frameset modes.

use sumi_dom::NodeId;

use crate::tokenizer::Token;

use super::super::core::{Flow, HTMLParser, InsertionMode};

impl HTMLParser {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(in crate::parser) fn handle_after_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            // "A comment token" - "Insert a comment as the last child of the first
            // element in the stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_into(html, data);
                Flow::Done
            }
            Token::Doctype { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            // "An end tag whose tag name is 'html'" - "Switch the insertion mode to
            // 'after after body'."
            Token::EndTag { name, .. } if name == "html" => {
                self.switch_mode(InsertionMode::AfterAfterBody);
                Flow::Done
            }
            Token::EndOfFile => self.stop_parsing(),
            // "Anything else" - "Parse error. Switch the insertion mode to 'in body'
            // and reprocess the token."
            _ => {
                self.unexpected(token);
                self.reprocess_in(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(in crate::parser) fn handle_in_frameset_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
                Flow::Done
            }
            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }
            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    Flow::Done
                }
                "frame" => {
                    let _ = self.insert_void_element(token);
                    Flow::Done
                }
                "noframes" => self.process_using_rules_for(InsertionMode::InHead, token),
                _ => {
                    self.unexpected(token);
                    Flow::Done
                }
            },
            // "An end tag whose tag name is 'frameset'" - "If the current node is the
            // root html element, then this is a parse error; ignore the token.
            // Otherwise, pop the current node from the stack of open elements. If the
            // current node is no longer a frameset element, then switch the insertion
            // mode to 'after frameset'."
            Token::EndTag { name, .. } if name == "frameset" => {
                if self.stack_of_open_elements.len() <= 1 {
                    self.unexpected(token);
                    return Flow::Done;
                }
                let _ = self.stack_of_open_elements.pop();
                if !self.current_node_is("frameset") {
                    self.switch_mode(InsertionMode::AfterFrameset);
                }
                Flow::Done
            }
            // "An end-of-file token" - "If the current node is not the root html
            // element, then this is a parse error. Stop parsing."
            Token::EndOfFile => {
                if self.stack_of_open_elements.len() > 1 {
                    self.parse_error("end of file inside frameset");
                }
                self.stop_parsing()
            }
            _ => {
                self.unexpected(token);
                Flow::Done
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(in crate::parser) fn handle_after_frameset_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
                Flow::Done
            }
            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            Token::EndTag { name, .. } if name == "html" => {
                self.switch_mode(InsertionMode::AfterAfterFrameset);
                Flow::Done
            }
            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_rules_for(InsertionMode::InHead, token)
            }
            Token::EndOfFile => self.stop_parsing(),
            _ => {
                self.unexpected(token);
                Flow::Done
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(in crate::parser) fn handle_after_after_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Comment { data } => {
                self.insert_comment_into(NodeId::ROOT, data);
                Flow::Done
            }
            Token::Doctype { .. } => self.process_using_rules_for(InsertionMode::InBody, token),
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            Token::EndOfFile => self.stop_parsing(),
            _ => {
                self.unexpected(token);
                self.reprocess_in(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(in crate::parser) fn handle_after_after_frameset_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Comment { data } => {
                self.insert_comment_into(NodeId::ROOT, data);
                Flow::Done
            }
            Token::Doctype { .. } => self.process_using_rules_for(InsertionMode::InBody, token),
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            Token::StartTag { name, .. } if name == "noframes" => {
                self.process_using_rules_for(InsertionMode::InHead, token)
            }
            Token::EndOfFile => self.stop_parsing(),
            _ => {
                self.unexpected(token);
                Flow::Done
            }
        }
    }
}
