//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use sumi_dom::{DocumentTypeData, ElementData, NodeId, NodeType};

use crate::tokenizer::{Token, TokenizerState};

use super::core::{Flow, HTMLParser, InsertionMode};

/// Where a new node goes: inside `parent`, before `before` when set,
/// otherwise as the last child.
#[derive(Debug, Clone, Copy)]
pub(super) struct InsertionLocation {
    pub(super) parent: NodeId,
    pub(super) before: Option<NodeId>,
}

impl HTMLParser {
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target"
    pub(super) fn appropriate_insertion_place(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // STEP 1: "If there was an override target specified, then let target be the
        //         override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "If foster parenting is enabled and target is a table, tbody,
        //         tfoot, thead, or tr element"
        if self.foster_parenting
            && self.node_is_one_of(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            return self.foster_parent_location();
        }

        // "Otherwise: Let adjusted insertion location be inside target, after its
        // last child (if any)."
        InsertionLocation {
            parent: target,
            before: None,
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// The foster parenting branch of the appropriate place for inserting a node.
    fn foster_parent_location(&self) -> InsertionLocation {
        // STEP 2.1: "Let last template be the last template element in the stack
        //           of open elements, if any."
        let last_template = self.last_in_stack("template");
        // STEP 2.2: "Let last table be the last table element in the stack of open
        //           elements, if any."
        let last_table = self.last_in_stack("table");

        // STEP 2.3: "If there is a last template and either there is no last table,
        //           or there is one, but last template is lower (more recently added)
        //           than last table in the stack of open elements, then: let adjusted
        //           insertion location be inside last template's template contents,
        //           after its last child (if any), and abort these steps."
        //
        // Template contents are not a separate fragment here; the template
        // element itself holds them.
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
        {
            return InsertionLocation {
                parent: self.stack_of_open_elements[template_index],
                before: None,
            };
        }

        // STEP 2.4: "If there is no last table, then let adjusted insertion location
        //           be inside the first element in the stack of open elements (the
        //           html element), after its last child (if any), and abort these steps."
        let Some(table_index) = last_table else {
            return InsertionLocation {
                parent: self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT),
                before: None,
            };
        };

        // STEP 2.5: "If last table has a parent node, then let adjusted insertion
        //           location be inside last table's parent node, immediately before
        //           last table, and abort these steps."
        let table = self.stack_of_open_elements[table_index];
        if let Some(parent) = self.tree.parent(table) {
            return InsertionLocation {
                parent,
                before: Some(table),
            };
        }

        // STEP 2.6: "Let previous element be the element immediately above last
        //           table in the stack of open elements."
        // STEP 2.7: "Let adjusted insertion location be inside previous element,
        //           after its last child (if any)."
        let previous = table_index
            .checked_sub(1)
            .map_or(NodeId::ROOT, |index| self.stack_of_open_elements[index]);
        InsertionLocation {
            parent: previous,
            before: None,
        }
    }

    pub(super) fn insert_at(&mut self, location: InsertionLocation, node: NodeId) {
        match location.before {
            Some(reference) => self.tree.insert_before(location.parent, node, reference),
            None => self.tree.append_child(location.parent, node),
        }
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Creates the element without inserting it. Repeated attribute names on
    /// the token collapse to the first occurrence.
    pub(super) fn create_element_for_token(&mut self, token: &Token) -> NodeId {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            unreachable!("create_element_for_token called with {token:?}");
        };
        self.tree.alloc(NodeType::Element(ElementData::new(
            name.as_str(),
            attributes.iter().cloned(),
        )))
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// Create the element, insert it at the appropriate place and push it onto
    /// the stack of open elements.
    pub(super) fn insert_html_element(&mut self, token: &Token) -> NodeId {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //         for inserting a node."
        let location = self.appropriate_insertion_place(None);
        // STEP 2: "Let element be the result of creating an element for the token"
        let element = self.create_element_for_token(token);
        // STEP 3: "If it is possible to insert element at the adjusted insertion
        //         location, then insert element at the adjusted insertion location."
        self.insert_at(location, element);
        // STEP 4: "Push element onto the stack of open elements so that it is the
        //         new current node."
        self.stack_of_open_elements.push(element);
        element
    }

    /// Insert an element for a start tag the parser made up itself, such as
    /// the implied `<head>` or `<tbody>`.
    pub(super) fn insert_html_element_named(&mut self, name: &str) -> NodeId {
        self.insert_html_element(&Token::start_tag_named(name))
    }

    /// Insert and immediately pop a void element. "Acknowledge the token's
    /// self-closing flag, if it is set" needs nothing further here.
    pub(super) fn insert_void_element(&mut self, token: &Token) -> NodeId {
        let element = self.insert_html_element(token);
        let _ = self.stack_of_open_elements.pop();
        element
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        //         for inserting a node."
        let location = self.appropriate_insertion_place(None);

        // STEP 3: "If the adjusted insertion location is inside a Document node,
        //         then ignore the token."
        if location.parent == NodeId::ROOT {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted insertion
        //         location, then append data to that Text node's data."
        let preceding = match location.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(location.parent),
        };
        if let Some(preceding) = preceding
            && let Some(node) = self.tree.get_mut(preceding)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push(c);
            return;
        }

        // "Otherwise, create a new Text node whose data is data ... and insert the
        // newly created node at the adjusted insertion location."
        let text = self.tree.alloc(NodeType::Text(c.to_string()));
        self.insert_at(location, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(super) fn insert_comment(&mut self, data: &str) {
        let location = self.appropriate_insertion_place(None);
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_at(location, comment);
    }

    /// "Insert a comment as the last child of" a specific node, such as the
    /// Document or the html element.
    pub(super) fn insert_comment_into(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    ///
    /// "Append a DocumentType node to the Document node, with its name set to
    /// the name given in the DOCTYPE token, or the empty string if the name was
    /// missing; its public ID set to the public identifier given in the DOCTYPE
    /// token, or the empty string if the public identifier was missing; and its
    /// system ID set to the system identifier given in the DOCTYPE token, or the
    /// empty string if the system identifier was missing."
    pub(super) fn insert_doctype(&mut self, token: &Token) {
        let Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            ..
        } = token
        else {
            unreachable!("insert_doctype called with {token:?}");
        };
        let doctype = self.tree.alloc(NodeType::DocumentType(DocumentTypeData {
            name: name.clone().unwrap_or_default(),
            public_id: public_identifier.clone().unwrap_or_default(),
            system_id: system_identifier.clone().unwrap_or_default(),
        }));
        self.tree.append_child(NodeId::ROOT, doctype);
    }

    /// Merge a start tag's attributes onto an existing element: "for each
    /// attribute on the token, check to see if the attribute is already
    /// present on the top element of the stack of open elements. If it is not,
    /// add the attribute and its corresponding value to that element."
    pub(super) fn merge_attributes(&mut self, target: NodeId, token: &Token) {
        let Token::StartTag { attributes, .. } = token else {
            return;
        };
        if let Some(element) = self.tree.as_element_mut(target) {
            for attribute in attributes {
                let _ = element.add_attribute_if_missing(attribute.clone());
            }
        }
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
    ///
    /// The generic raw text and generic RCDATA element parsing algorithms,
    /// parameterized by the tokenizer state. Also used for `script`, which
    /// follows the same three steps with the script data state.
    pub(super) fn parse_text_only_element(
        &mut self,
        token: &Token,
        content_model: TokenizerState,
    ) -> Flow {
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert_html_element(token);
        // STEP 2: "If the algorithm that was invoked is the generic raw text element
        //         parsing algorithm, switch the tokenizer to the RAWTEXT state;
        //         otherwise the algorithm invoked was the generic RCDATA element
        //         parsing algorithm, switch the tokenizer to the RCDATA state."
        self.tokenizer.switch_to_state(content_model);
        // STEP 3: "Set the original insertion mode to the current insertion mode."
        self.original_insertion_mode = Some(self.insertion_mode);
        // STEP 4: "Then, switch the insertion mode to 'text'."
        self.switch_mode(InsertionMode::Text);
        Flow::Done
    }
}
