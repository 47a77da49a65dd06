//! Integration tests for the HTML tokenizer.

use sumi_html::{Attribute, HTMLTokenizer, Token, TokenizerState};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input).collect()
}

/// Helper to tokenize starting in a text state, as the tree builder does
/// after seeing `<name>`.
fn tokenize_in(input: &str, state: TokenizerState, name: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.switch_to_state(state);
    tokenizer.set_last_start_tag(name);
    tokenizer.collect()
}

/// Collect consecutive character tokens into a string.
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_end_of_file_is_emitted_once() {
    let mut tokenizer = HTMLTokenizer::new("<p>");
    assert!(matches!(tokenizer.next_token(), Some(Token::StartTag { .. })));
    assert_eq!(tokenizer.next_token(), Some(Token::EndOfFile));
    assert_eq!(tokenizer.next_token(), None);
    assert_eq!(tokenizer.next_token(), None);
}

#[test]
fn test_empty_input_yields_only_end_of_file() {
    assert_eq!(tokenize(""), vec![Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(public_identifier.is_none());
            assert!(system_identifier.is_none());
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_public_and_system_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_missing_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert!(name.is_none());
            assert!(force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_bogus_doctype_keeps_name() {
    let tokens = tokenize("<!DOCTYPE html bogus>x");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
    assert_eq!(tokens[1], Token::Character { data: 'x' });
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<DIV>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::EndTag { name, .. } => {
            assert_eq!(name, "div");
        }
        _ => panic!("Expected EndTag token"),
    }
}

#[test]
fn test_end_tag_keeps_attributes_and_reports_them() {
    let mut tokenizer = HTMLTokenizer::new("</div class=x/>");
    let token = tokenizer.next_token();
    match token {
        Some(Token::EndTag {
            name,
            self_closing,
            attributes,
        }) => {
            assert_eq!(name, "div");
            assert!(self_closing);
            assert_eq!(attributes, vec![Attribute::new("class", "x")]);
        }
        other => panic!("Expected EndTag token, got {other:?}"),
    }
    let errors = tokenizer.take_errors();
    assert!(errors.iter().any(|e| e.contains("end-tag-with-attributes")));
    assert!(errors.iter().any(|e| e.contains("end-tag-with-trailing-solidus")));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        _ => panic!("Expected self-closing StartTag token"),
    }
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Comment { data } => assert_eq!(data, " hello "),
        _ => panic!("Expected Comment token"),
    }
}

#[test]
fn test_comment_with_dashes_inside() {
    let tokens = tokenize("<!--a--b-->");
    assert_eq!(tokens[0], Token::Comment { data: "a--b".to_string() });
}

#[test]
fn test_abrupt_empty_comment() {
    let tokens = tokenize("<!-->x");
    assert_eq!(tokens[0], Token::Comment { data: String::new() });
    assert_eq!(tokens[1], Token::Character { data: 'x' });
}

#[test]
fn test_unterminated_comment_is_emitted_at_eof() {
    let tokens = tokenize("<!--abc");
    assert_eq!(tokens[0], Token::Comment { data: "abc".to_string() });
    assert_eq!(tokens[1], Token::EndOfFile);
}

#[test]
fn test_processing_instruction_becomes_bogus_comment() {
    let tokens = tokenize("<?xml version=\"1.0\"?>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "?xml version=\"1.0\"?".to_string()
        }
    );
}

#[test]
fn test_cdata_is_a_bogus_comment_in_html_content() {
    let tokens = tokenize("<![CDATA[x<y]]>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "[CDATA[x<y]]".to_string()
        }
    );
}

#[test]
fn test_cdata_section_when_allowed() {
    let mut tokenizer = HTMLTokenizer::new("<![CDATA[x<y]]>");
    tokenizer.set_cdata_allowed(true);
    let tokens: Vec<Token> = tokenizer.collect();
    assert_eq!(text_of(&tokens), "x<y");
    assert_eq!(tokens.last(), Some(&Token::EndOfFile));
}

#[test]
fn test_attribute_double_quoted() {
    let tokens = tokenize(r#"<div class="container">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes, &vec![Attribute::new("class", "container")]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_attribute_single_quoted() {
    let tokens = tokenize("<div id='main'>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes, &vec![Attribute::new("id", "main")]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_attribute_unquoted() {
    let tokens = tokenize("<input type=text>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes, &vec![Attribute::new("type", "text")]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_boolean_attribute() {
    let tokens = tokenize("<input disabled>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes, &vec![Attribute::new("disabled", "")]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_multiple_attributes_keep_source_order() {
    let tokens = tokenize(r#"<a href="/x" CLASS=link title='t'>"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
            assert_eq!(names, vec!["href", "class", "title"]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_duplicate_attributes_are_not_removed_by_the_tokenizer() {
    let tokens = tokenize("<p a=1 a=2>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => assert_eq!(attributes.len(), 2),
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_line_endings_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_null_in_data_is_passed_through() {
    let tokens = tokenize("a\0b");
    assert_eq!(tokens[1], Token::Character { data: '\0' });
}

#[test]
fn test_null_in_rcdata_is_replaced() {
    let tokens = tokenize_in("a\0b</title>", TokenizerState::RCDATA, "title");
    assert_eq!(text_of(&tokens), "a\u{FFFD}b");
}

#[test]
fn test_tag_open_followed_by_space_is_text() {
    let tokens = tokenize("a < b");
    assert_eq!(text_of(&tokens), "a < b");
}

#[test]
fn test_empty_end_tag_is_dropped() {
    let tokens = tokenize("a</>b");
    assert_eq!(text_of(&tokens), "ab");
}

#[test]
fn test_tokenizer_does_not_switch_content_model_on_its_own() {
    let tokens = tokenize("<style><b></style>");
    assert!(matches!(&tokens[1], Token::StartTag { name, .. } if name == "b"));
}

#[test]
fn test_rawtext_keeps_markup_as_text() {
    let tokens = tokenize_in("p > a { color: red; }</style>", TokenizerState::RAWTEXT, "style");
    assert_eq!(text_of(&tokens), "p > a { color: red; }");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name, .. } if name == "style"));
}

#[test]
fn test_rawtext_with_fake_tags() {
    let tokens = tokenize_in("<div></div></style>", TokenizerState::RAWTEXT, "style");
    assert_eq!(text_of(&tokens), "<div></div>");
}

#[test]
fn test_rawtext_ignores_inappropriate_end_tag() {
    let tokens = tokenize_in("a</div>b</STYLE>", TokenizerState::RAWTEXT, "style");
    assert_eq!(text_of(&tokens), "a</div>b");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name, .. } if name == "style"));
}

#[test]
fn test_rcdata_with_less_than() {
    let tokens = tokenize_in("1 < 2</title>", TokenizerState::RCDATA, "title");
    assert_eq!(text_of(&tokens), "1 < 2");
}

#[test]
fn test_script_data_escaped_comment() {
    let tokens = tokenize_in(
        "<!-- if (a</b) {} --></script>",
        TokenizerState::ScriptData,
        "script",
    );
    assert_eq!(text_of(&tokens), "<!-- if (a</b) {} -->");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name, .. } if name == "script"));
}

#[test]
fn test_script_data_double_escaped_end_tag_is_text() {
    let tokens = tokenize_in(
        "<!--<script></script>--></script>",
        TokenizerState::ScriptData,
        "script",
    );
    assert_eq!(text_of(&tokens), "<!--<script></script>-->");
    let end_tags = tokens
        .iter()
        .filter(|t| matches!(t, Token::EndTag { .. }))
        .count();
    assert_eq!(end_tags, 1);
}

#[test]
fn test_plaintext_never_ends() {
    let tokens = tokenize_in("</plaintext><b>", TokenizerState::PLAINTEXT, "plaintext");
    assert_eq!(text_of(&tokens), "</plaintext><b>");
}

#[test]
fn test_character_reference_is_passed_through_in_text() {
    let tokens = tokenize("a&amp;b");
    assert_eq!(text_of(&tokens), "a&amp;b");
}

#[test]
fn test_character_reference_bare_ampersand() {
    let tokens = tokenize("a & b");
    assert_eq!(text_of(&tokens), "a & b");
}

#[test]
fn test_numeric_character_reference_is_not_decoded() {
    let tokens = tokenize("&#60;&#x3C;");
    assert_eq!(text_of(&tokens), "&#60;&#x3C;");
}

#[test]
fn test_character_reference_in_attribute_is_verbatim() {
    let tokens = tokenize(r#"<a href="?a=1&amp;b=2" title=x&lt;y>"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0], Attribute::new("href", "?a=1&amp;b=2"));
            assert_eq!(attributes[1], Attribute::new("title", "x&lt;y"));
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_character_reference_in_rcdata() {
    let tokens = tokenize_in("a&lt;b</textarea>", TokenizerState::RCDATA, "textarea");
    assert_eq!(text_of(&tokens), "a&lt;b");
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let tokens = tokenize("x<div class=");
    assert_eq!(tokens, vec![Token::Character { data: 'x' }, Token::EndOfFile]);
}

#[test]
fn test_parse_errors_are_collected() {
    let mut tokenizer = HTMLTokenizer::new("<div a=1 a=2>");
    let _ = tokenizer.by_ref().count();
    let errors = tokenizer.take_errors();
    assert!(errors.iter().any(|e| e.contains("duplicate-attribute")));
    assert!(tokenizer.take_errors().is_empty());
}
