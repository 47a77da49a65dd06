//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//! and [§ 13.2.6.4.7 the adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm).

use sumi_dom::NodeId;

use crate::tokenizer::Token;

use super::core::HTMLParser;

/// An entry in the list of active formatting elements.
#[derive(Debug, Clone)]
pub(super) enum ActiveFormattingElement {
    /// A formatting element, with the token it was created from so that it
    /// can be recreated by reconstruction or the adoption agency.
    Element { node_id: NodeId, token: Token },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element." Pushed when entering applet, object,
    /// marquee, template, td, th and caption.
    Marker,
}

impl ActiveFormattingElement {
    const fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Element { node_id, .. } => Some(*node_id),
            Self::Marker => None,
        }
    }
}

impl HTMLParser {
    fn active_formatting_index_of(&self, node: NodeId) -> Option<usize> {
        self.active_formatting_elements
            .iter()
            .position(|entry| entry.node_id() == Some(node))
    }

    fn active_formatting_token(&self, index: usize) -> Token {
        match &self.active_formatting_elements[index] {
            ActiveFormattingElement::Element { token, .. } => token.clone(),
            ActiveFormattingElement::Marker => {
                unreachable!("marker where a formatting element was expected")
            }
        }
    }

    pub(super) fn push_active_formatting_marker(&mut self) {
        self.active_formatting_elements
            .push(ActiveFormattingElement::Marker);
    }

    /// Index of the last `tag` element after the last marker, if any.
    pub(super) fn active_formatting_element_after_last_marker(&self, tag: &str) -> Option<usize> {
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { token, .. } => {
                    if token.tag_name() == Some(tag) {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    /// Node of the `index`-th entry in the list; `None` for markers.
    pub(super) fn active_formatting_node(&self, index: usize) -> Option<NodeId> {
        self.active_formatting_elements
            .get(index)
            .and_then(ActiveFormattingElement::node_id)
    }

    /// Remove a node's entry from the list, if it has one.
    pub(super) fn remove_from_active_formatting_elements(&mut self, node: NodeId) {
        self.active_formatting_elements
            .retain(|entry| entry.node_id() != Some(node));
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "Push onto the list of active formatting elements", including the
    /// Noah's Ark clause: "If there are already three elements in the list of
    /// active formatting elements after the last marker, if any, or anywhere in
    /// the list if there are no markers, that have the same tag name,
    /// namespace, and attributes as element, then remove the earliest such
    /// element from the list of active formatting elements."
    pub(super) fn push_active_formatting_element(&mut self, node_id: NodeId, token: &Token) {
        let mut matches = 0;
        let mut earliest = None;
        for (index, entry) in self.active_formatting_elements.iter().enumerate().rev() {
            let ActiveFormattingElement::Element {
                token: existing, ..
            } = entry
            else {
                break;
            };
            if Self::same_formatting_element(existing, token) {
                matches += 1;
                earliest = Some(index);
            }
        }
        if matches >= 3
            && let Some(index) = earliest
        {
            let _ = self.active_formatting_elements.remove(index);
        }

        self.active_formatting_elements
            .push(ActiveFormattingElement::Element {
                node_id,
                token: token.clone(),
            });
    }

    /// Same tag name and the same attributes, compared as unordered sets.
    fn same_formatting_element(a: &Token, b: &Token) -> bool {
        match (a, b) {
            (
                Token::StartTag {
                    name: a_name,
                    attributes: a_attrs,
                    ..
                },
                Token::StartTag {
                    name: b_name,
                    attributes: b_attrs,
                    ..
                },
            ) => {
                a_name == b_name
                    && a_attrs.len() == b_attrs.len()
                    && a_attrs.iter().all(|attr| b_attrs.contains(attr))
            }
            _ => false,
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "Reconstruct the active formatting elements"
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //         elements, then there is nothing to reconstruct; stop this algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of active
        //         formatting elements is a marker, or if it is an element that is in
        //         the stack of open elements, then there is nothing to reconstruct;
        //         stop this algorithm."
        let Some(last) = self.active_formatting_elements.last() else {
            return;
        };
        match last.node_id() {
            None => return,
            Some(node) if self.stack_of_open_elements.contains(&node) => return,
            Some(_) => {}
        }

        // STEP 3-6, "Rewind": walk back to the entry after the last marker or
        // open element.
        let mut index = self.active_formatting_elements.len() - 1;
        while index > 0 {
            let previous = &self.active_formatting_elements[index - 1];
            let stop = previous
                .node_id()
                .is_none_or(|node| self.stack_of_open_elements.contains(&node));
            if stop {
                break;
            }
            index -= 1;
        }

        // STEP 7-10, "Advance" and "Create": recreate every entry from there on.
        for entry_index in index..self.active_formatting_elements.len() {
            // STEP 8: "Create: Insert an HTML element for the token for which the
            //         element entry was created, to obtain new element."
            let token = self.active_formatting_token(entry_index);
            let new_element = self.insert_html_element(&token);
            // STEP 9: "Replace the entry for entry in the list with an entry for new
            //         element."
            self.active_formatting_elements[entry_index] = ActiveFormattingElement::Element {
                node_id: new_element,
                token,
            };
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(super) fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag" in body.
    pub(super) fn any_other_end_tag(&mut self, tag: &str) {
        // STEP 1: "Initialize node to be the current node (the bottommost node of
        //         the stack)."
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            // STEP 2: "Loop: If node is an HTML element with the same tag name as
            //         the token, then:"
            if self.node_is(node, tag) {
                // STEP 2.1: "Generate implied end tags, except for HTML elements with
                //           the same tag name as the token."
                self.generate_implied_end_tags(Some(tag));
                // STEP 2.2: "If node is not the current node, then this is a parse error."
                if self.current_node() != Some(node) {
                    self.parse_error(&format!("end tag </{tag}> closes open children"));
                }
                // STEP 2.3: "Pop all the nodes from the current node up to node,
                //           including node, then stop these steps."
                self.pop_until_node(node);
                return;
            }
            // STEP 3: "Otherwise, if node is in the special category, then this is a
            //         parse error; ignore the token, and return."
            if self.tag_name(node).is_some_and(Self::is_special_element) {
                self.parse_error(&format!("end tag </{tag}> blocked by a special element"));
                return;
            }
            // STEP 4: "Set node to the previous entry in the stack of open elements."
        }
    }

    /// [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    pub(super) fn run_adoption_agency(&mut self, subject: &str) {
        // STEP 2: "If the current node is an HTML element whose tag name is subject,
        //         and the current node is not in the list of active formatting
        //         elements, then pop the current node off the stack of open elements
        //         and return."
        if let Some(current) = self.current_node()
            && self.node_is(current, subject)
            && self.active_formatting_index_of(current).is_none()
        {
            let _ = self.stack_of_open_elements.pop();
            return;
        }

        // STEP 3-6: "Outer loop": at most eight iterations.
        for _ in 0..8 {
            // STEP 7: "Let formatting element be the last element in the list of
            //         active formatting elements that is between the end of the list
            //         and the last marker in the list, if any, or the start of the list
            //         otherwise, and has the tag name subject."
            // STEP 8: "If there is no such element, then return and instead act as
            //         described in the 'any other end tag' entry above."
            let Some(formatting_index) = self.active_formatting_element_after_last_marker(subject)
            else {
                self.any_other_end_tag(subject);
                return;
            };
            let Some(formatting_element) = self.active_formatting_node(formatting_index) else {
                return;
            };

            // STEP 9: "If formatting element is not in the stack of open elements,
            //         then this is a parse error; remove the element from the list,
            //         and return."
            let Some(formatting_stack_index) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == formatting_element)
            else {
                self.parse_error(&format!("</{subject}> for an element that is not open"));
                let _ = self.active_formatting_elements.remove(formatting_index);
                return;
            };

            // STEP 10: "If formatting element is in the stack of open elements, but the
            //          element is not in scope, then this is a parse error; return."
            if !self.has_node_in_scope(formatting_element) {
                self.parse_error(&format!("</{subject}> for an element out of scope"));
                return;
            }

            // STEP 11: "If formatting element is not the current node, this is a
            //          parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(&format!("misnested </{subject}>"));
            }

            // STEP 12: "Let furthest block be the topmost node in the stack of open
            //          elements that is lower in the stack than formatting element, and
            //          is an element in the special category."
            let furthest_block_index = (formatting_stack_index + 1
                ..self.stack_of_open_elements.len())
                .find(|&index| {
                    self.tag_name(self.stack_of_open_elements[index])
                        .is_some_and(Self::is_special_element)
                });

            // STEP 13: "If there is no furthest block, then the UA must first pop all
            //          the nodes from the bottom of the stack of open elements, from the
            //          current node up to and including formatting element, then remove
            //          formatting element from the list of active formatting elements,
            //          and finally return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.stack_of_open_elements.truncate(formatting_stack_index);
                let _ = self.active_formatting_elements.remove(formatting_index);
                return;
            };
            let furthest_block = self.stack_of_open_elements[furthest_block_index];

            // STEP 14: "Let common ancestor be the element immediately above formatting
            //          element in the stack of open elements."
            let common_ancestor = formatting_stack_index
                .checked_sub(1)
                .map_or(NodeId::ROOT, |index| self.stack_of_open_elements[index]);

            // STEP 15: "Let a bookmark note the position of formatting element in the
            //          list of active formatting elements relative to the elements on
            //          either side of it in the list."
            let mut bookmark = formatting_index;

            // STEP 16: "Let node and last node be furthest block."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // STEP 17-18: "Inner loop"
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 18.2: "Let node be the element immediately above node in the
                //            stack of open elements, or if node is no longer in the
                //            stack of open elements (e.g. because it got removed by this
                //            algorithm), the element that was immediately above node in
                //            the stack of open elements before node was removed."
                //
                // Removals below happen at node_index, so the entry above is
                // always at node_index - 1.
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // STEP 18.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 18.4: "If inner loop counter is greater than three and node is in
                //            the list of active formatting elements, then remove node
                //            from the list of active formatting elements."
                let mut node_formatting_index = self.active_formatting_index_of(node);
                if inner_loop_counter > 3
                    && let Some(index) = node_formatting_index.take()
                {
                    let _ = self.active_formatting_elements.remove(index);
                    if bookmark > index {
                        bookmark -= 1;
                    }
                }

                // STEP 18.5: "If node is not in the list of active formatting elements,
                //            then remove node from the stack of open elements and
                //            continue."
                let Some(node_formatting_index) = node_formatting_index else {
                    let _ = self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // STEP 18.6: "Create an element for the token for which the element node
                //            was created, in the HTML namespace, with common ancestor as
                //            the intended parent; replace the entry for node in the list
                //            of active formatting elements with an entry for the new
                //            element, replace the entry for node in the stack of open
                //            elements with an entry for the new element, and let node be
                //            the new element."
                let token = self.active_formatting_token(node_formatting_index);
                let new_element = self.create_element_for_token(&token);
                self.active_formatting_elements[node_formatting_index] =
                    ActiveFormattingElement::Element {
                        node_id: new_element,
                        token,
                    };
                self.stack_of_open_elements[node_index] = new_element;

                // STEP 18.7: "If last node is furthest block, then move the
                //            aforementioned bookmark to be immediately after the new
                //            node in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_formatting_index + 1;
                }

                // STEP 18.8: "Append last node to node."
                self.tree.detach(last_node);
                self.tree.append_child(new_element, last_node);

                // STEP 18.9: "Set last node to node."
                last_node = new_element;
            }

            // STEP 19: "Insert whatever last node ended up being in the previous step at
            //          the appropriate place for inserting a node, but using common
            //          ancestor as the override target."
            self.tree.detach(last_node);
            let location = self.appropriate_insertion_place(Some(common_ancestor));
            self.insert_at(location, last_node);

            // STEP 20: "Create an element for the token for which formatting element
            //          was created, in the HTML namespace, with furthest block as the
            //          intended parent."
            let Some(formatting_index) = self.active_formatting_index_of(formatting_element)
            else {
                return;
            };
            let token = self.active_formatting_token(formatting_index);
            let new_element = self.create_element_for_token(&token);

            // STEP 21: "Take all of the child nodes of furthest block and append them
            //          to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 22: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 23: "Remove formatting element from the list of active formatting
            //          elements, and insert the new element into the list of active
            //          formatting elements at the position of the aforementioned
            //          bookmark."
            let _ = self.active_formatting_elements.remove(formatting_index);
            if bookmark > formatting_index {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element {
                    node_id: new_element,
                    token,
                },
            );

            // STEP 24: "Remove formatting element from the stack of open elements, and
            //          insert the new element into the stack of open elements
            //          immediately below the position of furthest block in that stack."
            self.remove_from_stack(formatting_element);
            if let Some(position) = self
                .stack_of_open_elements
                .iter()
                .position(|&id| id == furthest_block)
            {
                self.stack_of_open_elements.insert(position + 1, new_element);
            }
        }
        self.parse_warning(&format!(
            "adoption agency gave up on </{subject}> after eight passes"
        ));
    }
}
