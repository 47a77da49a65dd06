//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! Scope checks, popping helpers, implied end tags and resetting the
//! insertion mode.

use sumi_dom::NodeId;

use super::core::{HTMLParser, InsertionMode};

/// The element scopes of § 13.2.4.3. Each one names the set of elements that
/// stop the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus `ol`, `ul`.
    ListItem,
    /// "has an element in button scope": default plus `button`.
    Button,
    /// "has an element in table scope": `html`, `table`, `template`.
    Table,
    /// "has an element in select scope": everything except `optgroup` and
    /// `option`.
    Select,
}

impl Scope {
    /// Whether an element with this tag name ends the search.
    fn is_boundary(self, tag: &str) -> bool {
        const DEFAULT: &[&str] = &[
            "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
        ];
        match self {
            Self::Default => DEFAULT.contains(&tag),
            Self::ListItem => DEFAULT.contains(&tag) || matches!(tag, "ol" | "ul"),
            Self::Button => DEFAULT.contains(&tag) || tag == "button",
            Self::Table => matches!(tag, "html" | "table" | "template"),
            Self::Select => !matches!(tag, "optgroup" | "option"),
        }
    }
}

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly" also closes these.
const THOROUGH_IMPLIED_END_TAGS: &[&str] = &[
    "caption", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

impl HTMLParser {
    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// The tag name of an element, `None` for other node types.
    pub(super) fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    pub(super) fn node_is(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    pub(super) fn node_is_one_of(&self, id: NodeId, tags: &[&str]) -> bool {
        self.tag_name(id).is_some_and(|name| tags.contains(&name))
    }

    pub(super) fn current_node_is(&self, tag: &str) -> bool {
        self.current_node().is_some_and(|id| self.node_is(id, tag))
    }

    pub(super) fn current_node_is_one_of(&self, tags: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|id| self.node_is_one_of(id, tags))
    }

    /// Stack index of the last (bottommost) element with this tag name.
    pub(super) fn last_in_stack(&self, tag: &str) -> Option<usize> {
        self.stack_of_open_elements
            .iter()
            .rposition(|&id| self.node_is(id, tag))
    }

    pub(super) fn stack_contains(&self, tag: &str) -> bool {
        self.last_in_stack(tag).is_some()
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "The stack of open elements is said to have a particular element in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state:
    ///
    /// 1. Initialize node to be the current node (the bottommost node of the stack).
    /// 2. If node is the target node, terminate in a match state.
    /// 3. Otherwise, if node is one of the element types in list, terminate in a
    ///    failure state.
    /// 4. Otherwise, set node to the previous entry in the stack of open elements
    ///    and return to step 2."
    fn has_in_scope_matching(&self, scope: Scope, is_target: impl Fn(NodeId, &str) -> bool) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let Some(tag) = self.tag_name(id) else {
                continue;
            };
            if is_target(id, tag) {
                return true;
            }
            if scope.is_boundary(tag) {
                return false;
            }
        }
        false
    }

    /// Whether an element with this tag name is in the given scope.
    pub(super) fn has_element_in_scope(&self, tag: &str, scope: Scope) -> bool {
        self.has_in_scope_matching(scope, |_, name| name == tag)
    }

    /// Whether any element with one of these tag names is in the given scope.
    /// Used for headings and for `tbody`/`thead`/`tfoot` and `td`/`th`.
    pub(super) fn has_any_element_in_scope(&self, tags: &[&str], scope: Scope) -> bool {
        self.has_in_scope_matching(scope, |_, name| tags.contains(&name))
    }

    /// Whether this exact node is in (default) scope.
    pub(super) fn has_node_in_scope(&self, node: NodeId) -> bool {
        self.has_in_scope_matching(Scope::Default, |id, _| id == node)
    }

    /// Pop elements until one with this tag name has been popped.
    pub(super) fn pop_until(&mut self, tag: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.node_is(id, tag) {
                break;
            }
        }
    }

    /// Pop elements until one with any of these tag names has been popped.
    pub(super) fn pop_until_one_of(&mut self, tags: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.node_is_one_of(id, tags) {
                break;
            }
        }
    }

    /// Pop elements until `node` itself has been popped.
    pub(super) fn pop_until_node(&mut self, node: NodeId) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if id == node {
                break;
            }
        }
    }

    pub(super) fn remove_from_stack(&mut self, node: NodeId) {
        self.stack_of_open_elements.retain(|&id| id != node);
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element, an
    /// optgroup element, an option element, a p element, an rb element, an rp
    /// element, an rt element, or an rtc element, the UA must pop the current
    /// node off the stack of open elements."
    ///
    /// With `except`, that element type is left alone.
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(current) = self.current_node() {
            let Some(tag) = self.tag_name(current) else {
                break;
            };
            if except == Some(tag) || !IMPLIED_END_TAGS.contains(&tag) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.current_node_is_one_of(IMPLIED_END_TAGS)
            || self.current_node_is_one_of(THOROUGH_IMPLIED_END_TAGS)
        {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// "Clear the stack back to a table context" and its body and row
    /// variants: pop until the current node is one of `tags` (or html).
    pub(super) fn clear_stack_back_to(&mut self, tags: &[&str]) {
        while let Some(current) = self.current_node() {
            if self.node_is_one_of(current, tags) || self.node_is_one_of(current, &["html"]) {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for p
    /// elements. If the current node is not a p element, then this is a parse
    /// error. Pop elements from the stack of open elements until a p element has
    /// been popped from the stack."
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error("unclosed elements inside p");
        }
        self.pop_until("p");
    }

    /// Close a `p` element if one is in button scope. Most block-level start
    /// tags in body begin with this.
    pub(super) fn close_p_if_in_button_scope(&mut self) {
        if self.has_element_in_scope("p", Scope::Button) {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(super) fn close_the_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // STEP 2: "If the current node is not now a td element or a th element,
        //         then this is a parse error."
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error("cell closed with open children");
        }
        // STEP 3: "Pop elements from the stack of open elements until a td element
        //         or a th element has been popped from the stack."
        self.pop_until_one_of(&["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last marker."
        self.clear_active_formatting_elements_to_last_marker();
        // STEP 5: "Switch the insertion mode to 'in row'."
        self.switch_mode(InsertionMode::InRow);
    }

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// "Reset the insertion mode appropriately"
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_mode(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        let stack = &self.stack_of_open_elements;
        // STEP 2: "Let node be the last node in the stack of open elements."
        for (index, &node) in stack.iter().enumerate().rev() {
            // STEP 3: "If node is the first node in the stack of open elements,
            //         then set last to true" (no fragment context exists here).
            let last = index == 0;
            let Some(tag) = self.tag_name(node) else {
                continue;
            };
            match tag {
                // STEP 4: "If node is a select element, run these substeps"
                "select" => {
                    if !last {
                        for &ancestor in stack[..index].iter().rev() {
                            if self.node_is(ancestor, "template") {
                                break;
                            }
                            if self.node_is(ancestor, "table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false, then
                //         switch the insertion mode to 'in cell' and return."
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                // STEP 12: "If node is a template element, then switch the insertion
                //          mode to the current template insertion mode and return."
                "template" => {
                    return self
                        .template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                // STEP 13: "If node is a head element and last is false, then switch
                //          the insertion mode to 'in head' and return."
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                // STEP 16: "If node is an html element, run these substeps: If the
                //          head element pointer is null, switch the insertion mode to
                //          'before head' and return. Otherwise, the head element
                //          pointer is not null, switch the insertion mode to 'after
                //          head' and return."
                "html" => {
                    return if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ => {}
            }
            // STEP 17: "If last is true, then switch the insertion mode to 'in
            //          body' and return."
        }
        InsertionMode::InBody
    }

    /// [§ 13.1.1 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// Only HTML-namespace members are listed; foreign content is not
    /// modelled.
    pub(super) fn is_special_element(tag_name: &str) -> bool {
        matches!(
            tag_name,
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "keygen"
                | "li"
                | "link"
                | "listing"
                | "main"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "search"
                | "section"
                | "select"
                | "source"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "template"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "track"
                | "ul"
                | "wbr"
                | "xmp"
        )
    }

    /// Whether the stack holds anything outside the set that may legitimately
    /// remain open at the end of the body. Used by the EOF and `</body>` rules.
    pub(super) fn stack_has_unclosed_content(&self) -> bool {
        const MAY_REMAIN_OPEN: &[&str] = &[
            "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td",
            "tfoot", "th", "thead", "tr", "body", "html",
        ];
        self.stack_of_open_elements
            .iter()
            .any(|&id| !self.node_is_one_of(id, MAY_REMAIN_OPEN))
    }
}
