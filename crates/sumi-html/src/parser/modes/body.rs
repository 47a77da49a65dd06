//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use sumi_dom::NodeId;

use crate::tokenizer::{Token, TokenizerState};

use super::super::core::{Flow, HTMLParser, InsertionMode};
use super::super::stack::Scope;

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Formatting elements that go on the list of active formatting elements
/// without further checks.
const PLAIN_FORMATTING: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// End tags handled by the adoption agency algorithm.
const ADOPTION_AGENCY_END_TAGS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// Start tags that close a `p` in button scope and then open a plain block.
const BLOCK_START_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "search",
    "section",
    "summary",
    "ul",
];

/// End tags closing a block that must be in scope.
const BLOCK_END_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "button",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "listing",
    "main",
    "menu",
    "nav",
    "ol",
    "pre",
    "search",
    "section",
    "summary",
    "ul",
];

impl HTMLParser {
    pub(in crate::parser) fn handle_in_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is U+0000 NULL" - "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error("unexpected NULL character");
                Flow::Done
            }
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE
            // FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020
            // SPACE" - "Reconstruct the active formatting elements, if any. Insert the
            // token's character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                Flow::Done
            }
            // "Any other character token" - as above, then "Set the frameset-ok flag
            // to 'not ok'."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
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
            Token::StartTag { name, .. } => self.in_body_start_tag(name, token),
            Token::EndTag { name, .. } => self.in_body_end_tag(name, token),
            Token::EndOfFile => self.in_body_end_of_file(),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_start_tag(&mut self, name: &str, token: &Token) -> Flow {
        match name {
            // "A start tag whose tag name is 'html'" - "Parse error. If there is a
            // template element on the stack of open elements, then ignore the token.
            // Otherwise, for each attribute on the token, check to see if the attribute
            // is already present on the top element of the stack of open elements. If
            // it is not, add the attribute and its corresponding value to that element."
            "html" => {
                self.unexpected(token);
                if !self.stack_contains("template")
                    && let Some(&html) = self.stack_of_open_elements.first()
                {
                    self.merge_attributes(html, token);
                }
                Flow::Done
            }

            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => self.process_using_rules_for(InsertionMode::InHead, token),

            // "A start tag whose tag name is 'body'" - "Parse error. If the stack of
            // open elements has only one node on it, or if the second element on the
            // stack of open elements is not a body element, or if there is a template
            // element on the stack of open elements, then ignore the token. Otherwise,
            // set the frameset-ok flag to 'not ok'; then, for each attribute on the
            // token, check to see if the attribute is already present on the body
            // element (the second element) on the stack of open elements, and if it is
            // not, add the attribute and its corresponding value to that element."
            "body" => {
                self.unexpected(token);
                if let Some(body) = self.second_element_if_body()
                    && !self.stack_contains("template")
                {
                    self.frameset_ok = false;
                    self.merge_attributes(body, token);
                }
                Flow::Done
            }

            // "A start tag whose tag name is 'frameset'"
            "frameset" => {
                self.unexpected(token);
                let Some(body) = self.second_element_if_body() else {
                    return Flow::Done;
                };
                // "If the frameset-ok flag is set to 'not ok', ignore the token."
                if !self.frameset_ok {
                    return Flow::Done;
                }
                // STEP 1: "Remove the second element on the stack of open elements
                //         from its parent node, if it has one."
                self.tree.detach(body);
                // STEP 2: "Pop all the nodes from the bottom of the stack of open
                //         elements, from the current node up to, but not including,
                //         the root html element."
                self.stack_of_open_elements.truncate(1);
                // STEP 3: "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // STEP 4: "Switch the insertion mode to 'in frameset'."
                self.switch_mode(InsertionMode::InFrameset);
                Flow::Done
            }

            // "If the stack of open elements has a p element in button scope, then
            // close a p element. Insert an HTML element for the token."
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                Flow::Done
            }

            // "A start tag whose tag name is one of: 'h1', 'h2', 'h3', 'h4', 'h5', 'h6'"
            _ if HEADINGS.contains(&name) => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of 'h1',
                // 'h2', 'h3', 'h4', 'h5', or 'h6', then this is a parse error; pop the
                // current node off the stack of open elements."
                if self.current_node_is_one_of(HEADINGS) {
                    self.parse_error("nested heading");
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element(token);
                Flow::Done
            }

            // "A start tag whose tag name is one of: 'pre', 'listing'" - "If the next
            // token is a U+000A LINE FEED (LF) character token, then ignore that token
            // and move on to the next one. (Newlines at the start of pre blocks are
            // ignored as an authoring convenience.)"
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                self.skip_next_line_feed = true;
                self.frameset_ok = false;
                Flow::Done
            }

            // "A start tag whose tag name is 'form'"
            "form" => {
                // "If the form element pointer is not null, and there is no template
                // element on the stack of open elements, then this is a parse error;
                // ignore the token."
                let has_template = self.stack_contains("template");
                if self.form_element_pointer.is_some() && !has_template {
                    self.parse_error("nested form");
                    return Flow::Done;
                }
                self.close_p_if_in_button_scope();
                let form = self.insert_html_element(token);
                // "If there is no template element on the stack of open elements, set
                // the form element pointer to point to the element created."
                if !has_template {
                    self.form_element_pointer = Some(form);
                }
                Flow::Done
            }

            "li" => {
                self.close_list_item(token, &["li"]);
                Flow::Done
            }
            "dd" | "dt" => {
                self.close_list_item(token, &["dd", "dt"]);
                Flow::Done
            }

            // "A start tag whose tag name is 'plaintext'" - "Switch the tokenizer to
            // the PLAINTEXT state." Nothing after it is ever a tag again.
            "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                self.tokenizer.switch_to_state(TokenizerState::PLAINTEXT);
                Flow::Done
            }

            // "A start tag whose tag name is 'button'"
            "button" => {
                // "If the stack of open elements has a button element in scope, then
                // run these substeps: parse error; generate implied end tags; pop
                // elements from the stack of open elements until a button element has
                // been popped from the stack."
                if self.has_element_in_scope("button", Scope::Default) {
                    self.parse_error("nested button");
                    self.generate_implied_end_tags(None);
                    self.pop_until("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                Flow::Done
            }

            // "A start tag whose tag name is 'a'"
            "a" => {
                // "If the list of active formatting elements contains an a element
                // between the end of the list and the last marker on the list (or the
                // start of the list if there is no marker on the list), then this is a
                // parse error; run the adoption agency algorithm for the token, then
                // remove that element from the list of active formatting elements and
                // the stack of open elements if the adoption agency algorithm didn't
                // already remove it (it might not have if the element is not in table
                // scope)."
                if let Some(index) = self.active_formatting_element_after_last_marker("a") {
                    self.parse_error("nested a element");
                    let previous = self.active_formatting_node(index);
                    self.run_adoption_agency("a");
                    if let Some(previous) = previous {
                        self.remove_from_active_formatting_elements(previous);
                        self.remove_from_stack(previous);
                    }
                }
                self.insert_formatting_element(token);
                Flow::Done
            }

            // "A start tag whose tag name is one of: 'b', 'big', 'code', 'em', 'font',
            // 'i', 's', 'small', 'strike', 'strong', 'tt', 'u'"
            _ if PLAIN_FORMATTING.contains(&name) => {
                self.insert_formatting_element(token);
                Flow::Done
            }

            // "A start tag whose tag name is 'nobr'"
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope, then this
                // is a parse error; run the adoption agency algorithm for the token,
                // then once again reconstruct the active formatting elements, if any."
                if self.has_element_in_scope("nobr", Scope::Default) {
                    self.parse_error("nested nobr");
                    self.run_adoption_agency("nobr");
                }
                self.insert_formatting_element(token);
                Flow::Done
            }

            // "A start tag whose tag name is one of: 'applet', 'marquee', 'object'"
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.push_active_formatting_marker();
                self.frameset_ok = false;
                Flow::Done
            }

            // "A start tag whose tag name is 'table'" - the document is never in
            // quirks mode here, so an open p is always closed first.
            "table" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.switch_mode(InsertionMode::InTable);
                Flow::Done
            }

            // "A start tag whose tag name is one of: 'area', 'br', 'embed', 'img',
            // 'keygen', 'wbr'"
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_void_element(token);
                self.frameset_ok = false;
                Flow::Done
            }

            // "A start tag whose tag name is 'input'" - "If the token does not have an
            // attribute with the name 'type', or if it does, but that attribute's value
            // is not an ASCII case-insensitive match for the string 'hidden', then: set
            // the frameset-ok flag to 'not ok'."
            "input" => {
                self.reconstruct_active_formatting_elements();
                let input = self.insert_void_element(token);
                let hidden = self
                    .tree
                    .as_element(input)
                    .and_then(|element| element.get_attribute("type"))
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.frameset_ok = false;
                }
                Flow::Done
            }

            "param" | "source" | "track" => {
                let _ = self.insert_void_element(token);
                Flow::Done
            }

            "hr" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_void_element(token);
                self.frameset_ok = false;
                Flow::Done
            }

            // "A start tag whose tag name is 'image'" - "Parse error. Change the token's
            // tag name to 'img' and reprocess it. (Don't ask.)"
            "image" => {
                self.unexpected(token);
                let Token::StartTag {
                    self_closing,
                    attributes,
                    ..
                } = token
                else {
                    return Flow::Done;
                };
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing: *self_closing,
                    attributes: attributes.clone(),
                };
                self.process_using_rules_for(InsertionMode::InBody, &img)
            }

            // "A start tag whose tag name is 'textarea'"
            "textarea" => {
                let flow = self.parse_text_only_element(token, TokenizerState::RCDATA);
                self.skip_next_line_feed = true;
                self.frameset_ok = false;
                flow
            }

            "xmp" => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_only_element(token, TokenizerState::RAWTEXT)
            }

            "iframe" => {
                self.frameset_ok = false;
                self.parse_text_only_element(token, TokenizerState::RAWTEXT)
            }

            // "A start tag whose tag name is 'noembed'" / "A start tag whose tag name is
            // 'noscript', if the scripting flag is enabled" - "Follow the generic raw
            // text element parsing algorithm." With scripting disabled both fall
            // through to ordinary elements.
            "noembed" | "noscript" if self.scripting() => {
                self.parse_text_only_element(token, TokenizerState::RAWTEXT)
            }

            // "A start tag whose tag name is 'select'"
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of 'in table', 'in caption', 'in table
                // body', 'in row', or 'in cell', then switch the insertion mode to 'in
                // select in table'. Otherwise, switch the insertion mode to 'in select'."
                let next = match self.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                self.switch_mode(next);
                Flow::Done
            }

            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                Flow::Done
            }

            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.parse_error("ruby annotation outside ruby");
                    }
                }
                let _ = self.insert_html_element(token);
                Flow::Done
            }

            "rp" | "rt" => {
                if self.has_element_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_node_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error("ruby annotation outside ruby");
                    }
                }
                let _ = self.insert_html_element(token);
                Flow::Done
            }

            // "A start tag whose tag name is one of: 'caption', 'col', 'colgroup',
            // 'frame', 'head', 'tbody', 'td', 'tfoot', 'th', 'thead', 'tr'" - "Parse
            // error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => {
                self.unexpected(token);
                Flow::Done
            }

            // "Any other start tag" - "Reconstruct the active formatting elements, if
            // any. Insert an HTML element for the token."
            //
            // MathML and SVG land here too and become ordinary elements; a
            // self-closing foreign element is closed right away.
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                if matches!(name, "math" | "svg")
                    && matches!(token, Token::StartTag { self_closing: true, .. })
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                Flow::Done
            }
        }
    }

    fn in_body_end_tag(&mut self, name: &str, token: &Token) -> Flow {
        match name {
            "template" => self.process_using_rules_for(InsertionMode::InHead, token),

            // "An end tag whose tag name is 'body'"
            "body" => {
                // "If the stack of open elements does not have a body element in scope,
                // this is a parse error; ignore the token."
                if !self.has_element_in_scope("body", Scope::Default) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.check_for_unclosed_content();
                // "Switch the insertion mode to 'after body'."
                self.switch_mode(InsertionMode::AfterBody);
                Flow::Done
            }

            // "An end tag whose tag name is 'html'" - as for body, then "Reprocess the
            // token."
            "html" => {
                if !self.has_element_in_scope("body", Scope::Default) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.check_for_unclosed_content();
                self.reprocess_in(InsertionMode::AfterBody)
            }

            _ if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope that
                // is an HTML element with the same tag name as that of the token, then
                // this is a parse error; ignore the token."
                if !self.has_element_in_scope(name, Scope::Default) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.close_element_in_scope(name, None);
                Flow::Done
            }

            "form" => {
                self.close_form_element(token);
                Flow::Done
            }

            // "An end tag whose tag name is 'p'" - "If the stack of open elements does
            // not have a p element in button scope, then this is a parse error; insert
            // an HTML element for a 'p' start tag token with no attributes. Close a p
            // element."
            "p" => {
                if !self.has_element_in_scope("p", Scope::Button) {
                    self.unexpected(token);
                    let _ = self.insert_html_element_named("p");
                }
                self.close_p_element();
                Flow::Done
            }

            // "An end tag whose tag name is 'li'" - in list item scope.
            "li" => {
                if !self.has_element_in_scope("li", Scope::ListItem) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.close_element_in_scope("li", Some("li"));
                Flow::Done
            }

            "dd" | "dt" => {
                if !self.has_element_in_scope(name, Scope::Default) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.close_element_in_scope(name, Some(name));
                Flow::Done
            }

            // "An end tag whose tag name is one of: 'h1', 'h2', 'h3', 'h4', 'h5', 'h6'"
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in scope that
                // is an HTML element and whose tag name is one of 'h1', 'h2', 'h3', 'h4',
                // 'h5', or 'h6', then this is a parse error; ignore the token."
                if !self.has_any_element_in_scope(HEADINGS, Scope::Default) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.current_node_is(name) {
                    self.parse_error(&format!("</{name}> closes a different heading"));
                }
                // "Pop elements from the stack of open elements until an HTML element
                // whose tag name is one of 'h1', 'h2', 'h3', 'h4', 'h5', or 'h6' has been
                // popped from the stack."
                self.pop_until_one_of(HEADINGS);
                Flow::Done
            }

            _ if ADOPTION_AGENCY_END_TAGS.contains(&name) => {
                self.run_adoption_agency(name);
                Flow::Done
            }

            // "An end tag token whose tag name is one of: 'applet', 'marquee', 'object'"
            "applet" | "marquee" | "object" => {
                if !self.has_element_in_scope(name, Scope::Default) {
                    self.unexpected(token);
                    return Flow::Done;
                }
                self.close_element_in_scope(name, None);
                self.clear_active_formatting_elements_to_last_marker();
                Flow::Done
            }

            // "An end tag whose tag name is 'br'" - "Parse error. Drop the attributes
            // from the token, and act as described in the next entry; i.e. act as if
            // this was a 'br' start tag token with no attributes, rather than the end
            // tag token that it actually is."
            "br" => {
                self.unexpected(token);
                self.in_body_start_tag("br", &Token::start_tag_named("br"))
            }

            _ => {
                self.any_other_end_tag(name);
                Flow::Done
            }
        }
    }

    /// "An end-of-file token"
    fn in_body_end_of_file(&mut self) -> Flow {
        // "If the stack of template insertion modes is not empty, then process the
        // token using the rules for the 'in template' insertion mode."
        if !self.template_insertion_modes.is_empty() {
            return self.process_using_rules_for(InsertionMode::InTemplate, &Token::EndOfFile);
        }
        // "If there is a node in the stack of open elements that is not either a dd
        // element, a dt element, an li element, an optgroup element, an option
        // element, a p element, an rb element, an rp element, an rt element, an rtc
        // element, a tbody element, a td element, a tfoot element, a th element, a
        // thead element, a tr element, the body element, or the html element, then
        // this is a parse error."
        self.check_for_unclosed_content();
        // "Stop parsing."
        self.stop_parsing()
    }

    fn check_for_unclosed_content(&mut self) {
        if self.stack_has_unclosed_content() {
            self.parse_error("unclosed elements at end of body");
        }
    }

    /// The second element on the stack, when it is a body element.
    fn second_element_if_body(&self) -> Option<NodeId> {
        self.stack_of_open_elements
            .get(1)
            .copied()
            .filter(|&id| self.node_is(id, "body"))
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(token);
        self.push_active_formatting_element(element, token);
    }

    /// The shared tail of most scoped end tags: "Generate implied end tags
    /// [except for `except`]. If the current node is not an HTML element with
    /// the same tag name as that of the token, then this is a parse error. Pop
    /// elements from the stack of open elements until an HTML element with the
    /// same tag name as the token has been popped from the stack."
    fn close_element_in_scope(&mut self, name: &str, except: Option<&str>) {
        self.generate_implied_end_tags(except);
        if !self.current_node_is(name) {
            self.parse_error(&format!("</{name}> closes open children"));
        }
        self.pop_until(name);
    }

    /// The `li` and `dd`/`dt` start tag rules. `closes` lists the tag names
    /// that an open item of this kind implicitly ends.
    fn close_list_item(&mut self, token: &Token, closes: &[&str]) {
        // STEP 1: "Set the frameset-ok flag to 'not ok'."
        self.frameset_ok = false;
        // STEP 2-3: "Initialize node to be the current node (the bottommost node of
        //           the stack). Loop:"
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            let Some(tag) = self.tag_name(node).map(str::to_string) else {
                continue;
            };
            // "If node is an li element [dd or dt element], then run these substeps:
            // generate implied end tags, except for li elements; if the current node
            // is not an li element, then this is a parse error; pop elements from the
            // stack of open elements until an li element has been popped from the
            // stack. Jump to the step below labeled done."
            if closes.contains(&tag.as_str()) {
                self.close_element_in_scope(&tag, Some(&tag));
                break;
            }
            // "If node is in the special category, but is not an address, div, or p
            // element, then jump to the step below labeled done."
            if Self::is_special_element(&tag) && !matches!(tag.as_str(), "address" | "div" | "p")
            {
                break;
            }
            // "Otherwise, set node to the previous entry in the stack of open elements
            // and return to the step labeled loop."
        }
        // "Done: If the stack of open elements has a p element in button scope, then
        // close a p element. Finally, insert an HTML element for the token."
        self.close_p_if_in_button_scope();
        let _ = self.insert_html_element(token);
    }

    /// "An end tag whose tag name is 'form'"
    fn close_form_element(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then run
        // these substeps:"
        if !self.stack_contains("template") {
            // STEP 1-2: "Let node be the element that the form element pointer is
            //           set to, or null if it is not set to an element. Set the form
            //           element pointer to null."
            let node = self.form_element_pointer.take();
            // STEP 3: "If node is null or if the stack of open elements does not have
            //         node in scope, then this is a parse error; return and ignore the
            //         token."
            let Some(node) = node.filter(|&node| self.has_node_in_scope(node)) else {
                self.unexpected(token);
                return;
            };
            // STEP 4: "Generate implied end tags."
            self.generate_implied_end_tags(None);
            // STEP 5: "If the current node is not node, then this is a parse error."
            if self.current_node() != Some(node) {
                self.parse_error("</form> closes open children");
            }
            // STEP 6: "Remove node from the stack of open elements."
            self.remove_from_stack(node);
            return;
        }

        // "If there is a template element on the stack of open elements":
        if !self.has_element_in_scope("form", Scope::Default) {
            self.unexpected(token);
            return;
        }
        self.close_element_in_scope("form", None);
    }
}
