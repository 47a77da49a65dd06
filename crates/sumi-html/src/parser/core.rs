use strum_macros::{Display, EnumIter};

use sumi_common::warning::WarningLog;
use sumi_dom::{DomTree, NodeId};

use crate::config::ParsingFlags;
use crate::error::ParseError;
use crate::tokenizer::{HTMLTokenizer, Token};

use super::formatting::ActiveFormattingElement;

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A problem found while building the tree. Parsing always recovers; these
/// are collected so callers can inspect or reject non-conforming input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Description of the problem.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    pub token_index: usize,
    /// True for parse errors, false for notes that are not conformance errors.
    pub is_error: bool,
}

const TOKENIZER: &str = "HTML Tokenizer";
const TREE_BUILDER: &str = "HTML Parser";

/// Observer called with `(old, new)` on every insertion mode change.
pub type TraceHook = Box<dyn FnMut(InsertionMode, InsertionMode)>;

/// What the driving loop does after a mode handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    /// The token was consumed; pull the next one.
    Done,
    /// "Reprocess the token" in the (new) current insertion mode.
    Reprocess,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser pulls tokens from an [`HTMLTokenizer`] and builds a
/// [`DomTree`] from them.
pub struct HTMLParser {
    pub(super) tokenizer: HTMLTokenizer,
    pub(super) flags: ParsingFlags,
    trace: Option<TraceHook>,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode", used to return from the text and
    /// "in table text" modes.
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    /// "the stack of template insertion modes"
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena. Only elements are ever pushed.
    pub(super) stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: Vec<ActiveFormattingElement>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<NodeId>,
    pub(super) form_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to 'ok' when the parser is created."
    pub(super) frameset_ok: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    /// Set while the "in table" anything-else entry delegates to "in body".
    pub(super) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "pending table character tokens"
    pub(super) pending_table_character_tokens: Vec<char>,

    /// Set after `<pre>`, `<listing>` and `<textarea>`: "If the next token is
    /// a U+000A LINE FEED (LF) character token, then ignore that token".
    pub(super) skip_next_line_feed: bool,

    pub(super) tree: DomTree,

    /// Index of the token currently being processed.
    token_index: usize,

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    stopped: bool,

    issues: Vec<ParseIssue>,
    warnings: WarningLog,
}

impl HTMLParser {
    /// Create a parser that pulls tokens from `tokenizer`.
    #[must_use]
    pub fn new(tokenizer: HTMLTokenizer) -> Self {
        Self {
            tokenizer,
            flags: ParsingFlags::empty(),
            trace: None,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            active_formatting_elements: Vec::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_character_tokens: Vec::new(),
            skip_next_line_feed: false,
            // DomTree::new() creates the Document node at NodeId::ROOT
            tree: DomTree::new(),
            token_index: 0,
            stopped: false,
            issues: Vec::new(),
            warnings: WarningLog::new(),
        }
    }

    /// Set the parsing flags (scripting on or off).
    #[must_use]
    pub const fn with_flags(mut self, flags: ParsingFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Install an observer for insertion mode transitions.
    ///
    /// The hook receives the old and the new mode. It has no influence on
    /// the resulting tree.
    #[must_use]
    pub fn with_trace(mut self, hook: impl FnMut(InsertionMode, InsertionMode) + 'static) -> Self {
        self.trace = Some(Box::new(hook));
        self
    }

    /// Echo each distinct parse error to stderr as it is found.
    ///
    /// Off by default. Issues are collected either way and returned by
    /// [`HTMLParser::run_with_issues`].
    #[must_use]
    pub fn with_stderr_warnings(mut self, enabled: bool) -> Self {
        self.warnings = if enabled {
            WarningLog::echoing()
        } else {
            WarningLog::new()
        };
        self
    }

    /// Run the parser to completion and return the DOM tree.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        self.parse();
        self.tree
    }

    /// Run the parser and return both the `DomTree` and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.parse();
        (self.tree, self.issues)
    }

    /// Run the parser, failing on the first parse error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseIssue`] flagged as an error. The partially
    /// built tree is discarded.
    pub fn run_strict(self) -> Result<DomTree, ParseError> {
        let (tree, issues) = self.run_with_issues();
        match issues.into_iter().find(|issue| issue.is_error) {
            Some(issue) => Err(ParseError {
                message: issue.message,
                token_index: issue.token_index,
            }),
            None => Ok(tree),
        }
    }

    /// The driving loop: pull a token, dispatch it, repeat until parsing stops
    /// or the tokenizer runs dry.
    fn parse(&mut self) {
        while !self.stopped {
            let Some(token) = self.tokenizer.next_token() else {
                break;
            };
            for message in self.tokenizer.take_errors() {
                self.record_issue(TOKENIZER, message, true);
            }

            let skip_line_feed = std::mem::take(&mut self.skip_next_line_feed);
            if !(skip_line_feed && matches!(token, Token::Character { data: '\n' })) {
                self.process_token(&token);
            }
            self.token_index += 1;
        }
        // "Pop all the nodes off the stack of open elements."
        self.stack_of_open_elements.clear();
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Dispatch until a handler consumes the token instead of asking for it to
    /// be reprocessed.
    fn process_token(&mut self, token: &Token) {
        while self.process_using_rules_for(self.insertion_mode, token) == Flow::Reprocess {}
    }

    /// "Process the token using the rules for the X insertion mode"
    ///
    /// Runs a mode's handler without switching to that mode.
    pub(super) fn process_using_rules_for(&mut self, mode: InsertionMode, token: &Token) -> Flow {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// "Switch the insertion mode to X"
    pub(super) fn switch_mode(&mut self, mode: InsertionMode) {
        let old = self.insertion_mode;
        self.insertion_mode = mode;
        if old != mode
            && let Some(hook) = self.trace.as_mut()
        {
            hook(old, mode);
        }
    }

    /// Switch mode, then ask the loop to reprocess the current token.
    pub(super) fn reprocess_in(&mut self, mode: InsertionMode) -> Flow {
        self.switch_mode(mode);
        Flow::Reprocess
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Stop parsing."
    pub(super) const fn stop_parsing(&mut self) -> Flow {
        self.stopped = true;
        Flow::Done
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    pub(super) fn parse_error(&mut self, message: &str) {
        self.record_issue(TREE_BUILDER, message.to_string(), true);
    }

    /// Note something that is not a conformance error but lost or moved
    /// content.
    pub(super) fn parse_warning(&mut self, message: &str) {
        self.record_issue(TREE_BUILDER, message.to_string(), false);
    }

    fn record_issue(&mut self, component: &str, message: String, is_error: bool) {
        if is_error {
            let _ = self.warnings.warn_once(component, &message);
        }
        self.issues.push(ParseIssue {
            message,
            token_index: self.token_index,
            is_error,
        });
    }

    /// "Unexpected token" parse error naming the current mode.
    pub(super) fn unexpected(&mut self, token: &Token) {
        let message = format!("unexpected {token} in {} mode", self.insertion_mode);
        self.parse_error(&message);
    }

    /// [§ 13.2.6 The scripting flag](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    pub(super) const fn scripting(&self) -> bool {
        self.flags.scripting()
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED (FF),
    /// U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
    pub(super) const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }
}

/// Tokenize and parse `input` in one call.
#[must_use]
pub fn parse_document(input: &str, flags: ParsingFlags) -> DomTree {
    HTMLParser::new(HTMLTokenizer::new(input))
        .with_flags(flags)
        .run()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_mode_has_a_distinct_name() {
        let names: HashSet<String> = InsertionMode::iter().map(|mode| mode.to_string()).collect();
        assert_eq!(names.len(), InsertionMode::iter().count());
    }

    #[test]
    fn test_end_of_file_is_handled_in_every_mode() {
        for mode in InsertionMode::iter() {
            let mut parser = HTMLParser::new(HTMLTokenizer::new(""));
            parser.insertion_mode = mode;
            let mut rounds = 0;
            while parser.process_using_rules_for(parser.insertion_mode, &Token::EndOfFile)
                == Flow::Reprocess
            {
                rounds += 1;
                assert!(rounds < 32, "end of file loops forever in {mode}");
            }
        }
    }

    #[test]
    fn test_warnings_belong_to_one_parser() {
        let mut first = HTMLParser::new(HTMLTokenizer::new("<p>x"));
        first.parse();
        let second = HTMLParser::new(HTMLTokenizer::new("<p>x"));

        assert!(first.warnings.has_warned(TREE_BUILDER, "missing DOCTYPE"));
        assert!(!first.warnings.echoes());
        assert!(second.warnings.is_empty());
    }

    #[test]
    fn test_stderr_warnings_are_opt_in() {
        let parser = HTMLParser::new(HTMLTokenizer::new(""));
        assert!(!parser.warnings.echoes());
        assert!(parser.with_stderr_warnings(true).warnings.echoes());
    }

    #[test]
    fn test_trace_hook_is_optional() {
        let plain = parse_document("<table><tr><td>x</table>", ParsingFlags::empty());
        let traced = HTMLParser::new(HTMLTokenizer::new("<table><tr><td>x</table>"))
            .with_trace(|_, _| {})
            .run();
        assert_eq!(plain.len(), traced.len());
    }
}
