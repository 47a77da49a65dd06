//! The insertion modes up to and including "after head", plus "text".

use sumi_dom::NodeId;

use crate::tokenizer::{Token, TokenizerState};

use super::super::core::{Flow, HTMLParser, InsertionMode};

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(in crate::parser) fn handle_initial_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE
            // FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020
            // SPACE" - "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => Flow::Done,

            // "A comment token" - "Insert a comment as the last child of the Document
            // object."
            Token::Comment { data } => {
                self.insert_comment_into(NodeId::ROOT, data);
                Flow::Done
            }

            // "A DOCTYPE token" - "If the DOCTYPE token's name is not 'html', or the
            // token's public identifier is not missing, or the token's system identifier
            // is neither missing nor 'about:legacy-compat', then there is a parse error."
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                ..
            } => {
                let conforming = name.as_deref() == Some("html")
                    && public_identifier.is_none()
                    && system_identifier
                        .as_deref()
                        .is_none_or(|id| id == "about:legacy-compat");
                if !conforming {
                    self.parse_error("non-conforming DOCTYPE");
                }
                // "Append a DocumentType node to the Document node"
                self.insert_doctype(token);
                // "Then, switch the insertion mode to 'before html'."
                self.switch_mode(InsertionMode::BeforeHtml);
                Flow::Done
            }

            // "Anything else" - "If the document is not an iframe srcdoc document,
            // then this is a parse error ... In any case, switch the insertion mode to
            // 'before html', then reprocess the token."
            _ => {
                self.parse_error("missing DOCTYPE");
                self.reprocess_in(InsertionMode::BeforeHtml)
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(in crate::parser) fn handle_before_html_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A DOCTYPE token" - "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            Token::Comment { data } => {
                self.insert_comment_into(NodeId::ROOT, data);
                Flow::Done
            }
            Token::Character { data } if Self::is_whitespace(*data) => Flow::Done,

            // "A start tag whose tag name is 'html'" - "Create an element for the
            // token in the HTML namespace, with the Document as the intended parent.
            // Append it to the Document object. Put this element in the stack of open
            // elements. Switch the insertion mode to 'before head'."
            Token::StartTag { name, .. } if name == "html" => {
                let html = self.create_element_for_token(token);
                self.tree.append_child(NodeId::ROOT, html);
                self.stack_of_open_elements.push(html);
                self.switch_mode(InsertionMode::BeforeHead);
                Flow::Done
            }

            // "An end tag whose tag name is one of: 'head', 'body', 'html', 'br'" -
            // "Act as described in the 'anything else' entry below."
            Token::EndTag { name, .. } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_html_anything_else()
            }

            // "Any other end tag" - "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.unexpected(token);
                Flow::Done
            }

            _ => self.before_html_anything_else(),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to 'before head', then reprocess the
    /// token."
    fn before_html_anything_else(&mut self) -> Flow {
        let html = self.create_element_for_token(&Token::start_tag_named("html"));
        self.tree.append_child(NodeId::ROOT, html);
        self.stack_of_open_elements.push(html);
        self.reprocess_in(InsertionMode::BeforeHead)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(in crate::parser) fn handle_before_head_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => Flow::Done,
            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }
            Token::Doctype { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            // "A start tag whose tag name is 'html'" - "Process the token using the
            // rules for the 'in body' insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            // "A start tag whose tag name is 'head'" - "Insert an HTML element for the
            // token. Set the head element pointer to the newly created head element.
            // Switch the insertion mode to 'in head'."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token);
                self.head_element_pointer = Some(head);
                self.switch_mode(InsertionMode::InHead);
                Flow::Done
            }
            Token::EndTag { name, .. } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_head_anything_else()
            }
            Token::EndTag { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            _ => self.before_head_anything_else(),
        }
    }

    /// "Insert an HTML element for a 'head' start tag token with no attributes.
    /// Set the head element pointer to the newly created head element. Switch
    /// the insertion mode to 'in head'. Reprocess the current token."
    fn before_head_anything_else(&mut self) -> Flow {
        let head = self.insert_html_element_named("head");
        self.head_element_pointer = Some(head);
        self.reprocess_in(InsertionMode::InHead)
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "Insert the character."
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
            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),

                // "A start tag whose tag name is one of: 'base', 'basefont', 'bgsound',
                // 'link'" - "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements."
                //
                // "meta" takes the same path; encoding changes do not apply to
                // already-decoded input.
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_void_element(token);
                    Flow::Done
                }

                // "A start tag whose tag name is 'title'" - "Follow the generic RCDATA
                // element parsing algorithm."
                "title" => self.parse_text_only_element(token, TokenizerState::RCDATA),

                // "A start tag whose tag name is 'noscript', if the scripting flag is
                // enabled" / "A start tag whose tag name is one of: 'noframes', 'style'"
                // - "Follow the generic raw text element parsing algorithm."
                "noscript" if self.scripting() => {
                    self.parse_text_only_element(token, TokenizerState::RAWTEXT)
                }
                "noframes" | "style" => {
                    self.parse_text_only_element(token, TokenizerState::RAWTEXT)
                }

                // "A start tag whose tag name is 'noscript', if the scripting flag is
                // disabled" - "Insert an HTML element for the token. Switch the
                // insertion mode to 'in head noscript'."
                "noscript" => {
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InHeadNoscript);
                    Flow::Done
                }

                // "A start tag whose tag name is 'script'" - insert the element,
                // "Switch the tokenizer to the script data state. Set the original
                // insertion mode to the current insertion mode. Switch the insertion
                // mode to 'text'."
                "script" => self.parse_text_only_element(token, TokenizerState::ScriptData),

                // "A start tag whose tag name is 'template'"
                "template" => {
                    // "Insert an HTML element for the token."
                    let _ = self.insert_html_element(token);
                    // "Insert a marker at the end of the list of active formatting
                    // elements."
                    self.push_active_formatting_marker();
                    // "Set the frameset-ok flag to 'not ok'."
                    self.frameset_ok = false;
                    // "Switch the insertion mode to 'in template'."
                    self.switch_mode(InsertionMode::InTemplate);
                    // "Push 'in template' onto the stack of template insertion modes so
                    // that it is the new current template insertion mode."
                    self.template_insertion_modes.push(InsertionMode::InTemplate);
                    Flow::Done
                }

                // "A start tag whose tag name is 'head'" - "Parse error. Ignore the token."
                "head" => {
                    self.unexpected(token);
                    Flow::Done
                }

                _ => self.in_head_anything_else(),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is 'head'" - "Pop the current node (which
                // will be the head element) off the stack of open elements. Switch the
                // insertion mode to 'after head'."
                "head" => {
                    let _ = self.stack_of_open_elements.pop();
                    self.switch_mode(InsertionMode::AfterHead);
                    Flow::Done
                }
                "body" | "html" | "br" => self.in_head_anything_else(),
                "template" => {
                    self.close_template_element();
                    Flow::Done
                }
                // "Any other end tag" - "Parse error. Ignore the token."
                _ => {
                    self.unexpected(token);
                    Flow::Done
                }
            },
            _ => self.in_head_anything_else(),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to 'after head'. Reprocess the
    /// token."
    fn in_head_anything_else(&mut self) -> Flow {
        let _ = self.stack_of_open_elements.pop();
        self.reprocess_in(InsertionMode::AfterHead)
    }

    /// The "in head" rules for an end tag whose tag name is "template".
    pub(in crate::parser) fn close_template_element(&mut self) {
        // "If there is no template element on the stack of open elements, then this
        // is a parse error; ignore the token."
        if !self.stack_contains("template") {
            self.parse_error("</template> without an open template");
            return;
        }
        // STEP 1: "Generate all implied end tags thoroughly."
        self.generate_all_implied_end_tags_thoroughly();
        // STEP 2: "If the current node is not a template element, then this is a
        //         parse error."
        if !self.current_node_is("template") {
            self.parse_error("</template> with open children");
        }
        // STEP 3: "Pop elements from the stack of open elements until a template
        //         element has been popped from the stack."
        self.pop_until("template");
        // STEP 4: "Clear the list of active formatting elements up to the last marker."
        self.clear_active_formatting_elements_to_last_marker();
        // STEP 5: "Pop the current template insertion mode off the stack of template
        //         insertion modes."
        let _ = self.template_insertion_modes.pop();
        // STEP 6: "Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Doctype { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token)
            }
            // "An end tag whose tag name is 'noscript'" - "Pop the current node (which
            // will be a noscript element) from the stack of open elements; the new
            // current node will be a head element. Switch the insertion mode to 'in
            // head'."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_mode(InsertionMode::InHead);
                Flow::Done
            }
            // "A character token that is whitespace, a comment token, a start tag whose
            // tag name is one of: 'basefont', 'bgsound', 'link', 'meta', 'noframes',
            // 'style'" - "Process the token using the rules for the 'in head'
            // insertion mode."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.process_using_rules_for(InsertionMode::InHead, token)
            }
            Token::Comment { .. } => self.process_using_rules_for(InsertionMode::InHead, token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.process_using_rules_for(InsertionMode::InHead, token)
            }
            Token::EndTag { name, .. } if name == "br" => self.in_head_noscript_anything_else(token),
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.unexpected(token);
                Flow::Done
            }
            Token::EndTag { .. } => {
                self.unexpected(token);
                Flow::Done
            }
            _ => self.in_head_noscript_anything_else(token),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to 'in head'. Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) -> Flow {
        self.unexpected(token);
        let _ = self.stack_of_open_elements.pop();
        self.reprocess_in(InsertionMode::InHead)
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &Token) -> Flow {
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
            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.process_using_rules_for(InsertionMode::InBody, token),
                // "A start tag whose tag name is 'body'" - "Insert an HTML element for
                // the token. Set the frameset-ok flag to 'not ok'. Switch the insertion
                // mode to 'in body'."
                "body" => {
                    let _ = self.insert_html_element(token);
                    self.frameset_ok = false;
                    self.switch_mode(InsertionMode::InBody);
                    Flow::Done
                }
                // "A start tag whose tag name is 'frameset'" - "Insert an HTML element
                // for the token. Switch the insertion mode to 'in frameset'."
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InFrameset);
                    Flow::Done
                }
                // "A start tag whose tag name is one of: 'base', 'basefont', 'bgsound',
                // 'link', 'meta', 'noframes', 'script', 'style', 'template', 'title'"
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    // "Parse error."
                    self.unexpected(token);
                    // "Push the node pointed to by the head element pointer onto the
                    // stack of open elements."
                    let Some(head) = self.head_element_pointer else {
                        return self.after_head_anything_else();
                    };
                    self.stack_of_open_elements.push(head);
                    // "Process the token using the rules for the 'in head' insertion mode."
                    let flow = self.process_using_rules_for(InsertionMode::InHead, token);
                    // "Remove the node pointed to by the head element pointer from the
                    // stack of open elements. (It might not be the current node at this
                    // point.)"
                    self.remove_from_stack(head);
                    flow
                }
                "head" => {
                    self.unexpected(token);
                    Flow::Done
                }
                _ => self.after_head_anything_else(),
            },
            Token::EndTag { name, .. } => match name.as_str() {
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),
                "body" | "html" | "br" => self.after_head_anything_else(),
                _ => {
                    self.unexpected(token);
                    Flow::Done
                }
            },
            _ => self.after_head_anything_else(),
        }
    }

    /// "Insert an HTML element for a 'body' start tag token with no attributes.
    /// Switch the insertion mode to 'in body'. Reprocess the current token."
    fn after_head_anything_else(&mut self) -> Flow {
        let _ = self.insert_html_element_named("body");
        self.reprocess_in(InsertionMode::InBody)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(in crate::parser) fn handle_text_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token" - "Insert the token's character."
            Token::Character { data } => {
                self.insert_character(*data);
                Flow::Done
            }
            // "An end-of-file token" - "Parse error. ... Pop the current node off the
            // stack of open elements. Switch the insertion mode to the original
            // insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error("end of file inside a text-only element");
                let _ = self.stack_of_open_elements.pop();
                let mode = self.take_original_insertion_mode();
                self.reprocess_in(mode)
            }
            // "An end tag whose tag name is 'script'" and "Any other end tag" - "Pop
            // the current node off the stack of open elements. Switch the insertion
            // mode to the original insertion mode." Scripts are never run.
            Token::EndTag { .. } => {
                let _ = self.stack_of_open_elements.pop();
                let mode = self.take_original_insertion_mode();
                self.switch_mode(mode);
                Flow::Done
            }
            // The tokenizer cannot produce anything else in a text-only state.
            Token::StartTag { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.unexpected(token);
                Flow::Done
            }
        }
    }

    pub(in crate::parser) fn take_original_insertion_mode(&mut self) -> InsertionMode {
        self.original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody)
    }
}
