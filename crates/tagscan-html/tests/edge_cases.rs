//! Edge case and stress tests for tagscan-html
//!
//! Tests rare markup, malformed content, error policies and large inputs.

use tagscan_html::{
    kind, Attribute, ErrorPolicy, HtmlParser, MarkupSink, ParseError, ParserConfig, TreeBuilder,
};

fn lenient() -> HtmlParser {
    HtmlParser::with_config(ParserConfig {
        error_policy: ErrorPolicy::Lenient,
        ..Default::default()
    })
}

fn names(parser: &HtmlParser) -> Vec<&str> {
    parser.tags().iter().map(|tag| tag.name.as_str()).collect()
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_only_whitespace() {
    let mut parser = HtmlParser::new();
    parser.parse("   \t\n\r\n   ").unwrap();
    assert_eq!(parser.len(), 1);
    assert!(parser.tree().root().children().is_empty());
}

#[test]
fn test_parse_only_newlines_leaves_root_without_text() {
    let mut parser = HtmlParser::new();
    parser.parse("\n\r\n").unwrap();
    assert_eq!(parser.get_tag(0).unwrap().text, None);
}

#[test]
fn test_parse_only_doctype() {
    let mut parser = HtmlParser::new();
    parser.parse("<!DOCTYPE html>").unwrap();
    assert_eq!(names(&parser), ["root", kind::DECLARATION]);
}

#[test]
fn test_parse_public_doctype() {
    let mut parser = HtmlParser::new();
    parser
        .parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#)
        .unwrap();
    assert_eq!(
        parser.get_tag(1).unwrap().text.as_deref(),
        Some(r#"DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd""#)
    );
}

#[test]
fn test_empty_comment_is_dropped() {
    let mut parser = HtmlParser::new();
    parser.parse("<div><!----></div>").unwrap();
    assert_eq!(names(&parser), ["root", "div"]);
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_bad_html_strict() {
    let mut parser = HtmlParser::new();
    let err = parser.parse("<P><A NAME='anchor'</a></P>").unwrap_err();
    assert!(matches!(err, ParseError::Malformed { line: 1, .. }));
    assert_eq!(names(&parser), ["root"]);
}

#[test]
fn test_parse_bad_html_lenient() {
    let mut parser = lenient();
    parser.parse("<P><A NAME='anchor'</a></P>").unwrap();
    assert!(parser.document().error_count() > 0);
    assert_eq!(&names(&parser)[..3], ["root", "p", "a"]);
}

#[test]
fn test_error_line_number() {
    let mut parser = HtmlParser::new();
    let err = parser.parse("<p>\n<p>\n<a b='c'd>").unwrap_err();
    match err {
        ParseError::Malformed { line, .. } => assert_eq!(line, 3),
    }
}

#[test]
fn test_parse_unclosed_tags() {
    let mut parser = HtmlParser::new();
    parser.parse("<div><p><span>text").unwrap();
    assert_eq!(names(&parser), ["root", "div", "p", "span"]);
    assert_eq!(parser.get_tag(3).unwrap().text.as_deref(), Some("text"));
}

#[test]
fn test_parse_mismatched_tags() {
    // End tags pop one level whatever their name.
    let mut parser = HtmlParser::new();
    parser.parse("<div><p></div>after</p>").unwrap();
    assert_eq!(names(&parser), ["root", "div", "p"]);
    assert_eq!(parser.get_tag(1).unwrap().text.as_deref(), Some("after"));
}

#[test]
fn test_parse_extra_closing_tags() {
    let mut parser = HtmlParser::new();
    parser.parse("<div></div></div></div></div>").unwrap();
    assert_eq!(names(&parser), ["root", "div"]);
}

#[test]
fn test_parse_orphan_closing_tag() {
    let mut parser = HtmlParser::new();
    parser.parse("</div>").unwrap();
    assert_eq!(names(&parser), ["root"]);
}

#[test]
fn test_parse_orphan_em_closing_tag() {
    let mut parser = HtmlParser::new();
    parser.parse("</em>text").unwrap();
    assert_eq!(parser.get_tag(0).unwrap().text.as_deref(), Some("text"));
}

#[test]
fn test_marked_section_is_unknown_declaration() {
    let mut parser = HtmlParser::new();
    parser.parse("<div><![if !IE]>x<![endif]></div>").unwrap();
    assert_eq!(
        names(&parser),
        ["root", "div", kind::UNKNOWN_DECLARATION, kind::UNKNOWN_DECLARATION]
    );
    assert_eq!(parser.get_tag(2).unwrap().text.as_deref(), Some("if !IE"));
    assert_eq!(parser.get_tag(3).unwrap().text.as_deref(), Some("endif"));
}

#[test]
fn test_processing_instruction_ignored() {
    let mut parser = HtmlParser::new();
    parser.parse(r#"<?xml version="1.0"?><root-el></root-el>"#).unwrap();
    assert_eq!(names(&parser), ["root", "root-el"]);
}

// ============================================================================
// RECOVERABLE MARKUP (DEFAULT POLICY)
// ============================================================================

#[test]
fn test_stray_less_than_is_text() {
    let mut parser = HtmlParser::new();
    parser.parse("<p>a < b</p>").unwrap();
    assert_eq!(parser.get_tag(1).unwrap().text.as_deref(), Some("a < b"));

    parser.parse("<p>if x<3 then</p>").unwrap();
    assert_eq!(parser.get_tag(1).unwrap().text.as_deref(), Some("if x<3 then"));
}

#[test]
fn test_duplicate_attribute_accepted() {
    let mut parser = HtmlParser::new();
    parser.parse(r#"<a href="1" href="2">x</a>"#).unwrap();
    assert_eq!(parser.get_tag(1).unwrap().attribute("href"), Some("1"));
}

#[test]
fn test_reference_without_semicolon_accepted() {
    let mut parser = HtmlParser::new();
    parser.parse("<p>caf&eacute ok</p>").unwrap();
    assert_eq!(parser.get_tag(1).unwrap().text.as_deref(), Some("café ok"));
}

#[test]
fn test_bang_construct_is_comment() {
    let mut parser = HtmlParser::new();
    parser.parse("<!ELEMENT foo><p>x</p>").unwrap();
    assert_eq!(names(&parser), ["root", kind::COMMENT, "p"]);
    assert_eq!(parser.get_tag(1).unwrap().text.as_deref(), Some("ELEMENT foo"));
}

#[test]
fn test_recovered_errors_are_not_counted() {
    let mut parser = lenient();
    parser.parse("<p>a < b &amp c</p>").unwrap();
    assert_eq!(parser.document().error_count(), 0);
}

#[test]
fn test_doctype_spelling_is_normalized() {
    let mut parser = HtmlParser::new();
    parser.parse("<!doctype HTML>").unwrap();
    assert_eq!(parser.get_tag(1).unwrap().text.as_deref(), Some("DOCTYPE html"));
}

// ============================================================================
// QUERIES AGAINST ENTRIES WITHOUT ATTRIBUTES OR TEXT
// ============================================================================

#[test]
fn test_text_query_skips_entries_without_text() {
    let mut parser = HtmlParser::new();
    parser.parse("<div>a<br/>b</div>").unwrap();
    assert_eq!(parser.find_first_tag("br", None, Some("zzz")), None);
    assert_eq!(parser.find_first_tag("root", None, Some("zzz")), None);
    assert_eq!(parser.find_first_tag("br", None, None), Some(2));
}

#[test]
fn test_attribute_query_skips_entries_without_attributes() {
    let mut parser = HtmlParser::new();
    parser.parse("<!-- c --><p>x</p>").unwrap();
    let attrs = [Attribute::new("x", "y")];
    assert_eq!(parser.find_first_tag("comment", Some(&attrs), None), None);
    assert_eq!(parser.find_first_tag("comment", None, Some(" c ")), Some(1));
}

// ============================================================================
// RE-PARSE
// ============================================================================

#[test]
fn test_reparse_after_failure() {
    let mut parser = HtmlParser::new();
    parser.parse("<ul><li>a</li></ul>").unwrap();
    assert!(parser.parse("<P><A NAME='anchor'</a></P>").is_err());
    assert_eq!(names(&parser), ["root"]);
    parser.parse("<ol></ol>").unwrap();
    assert_eq!(names(&parser), ["root", "ol"]);
}

#[test]
fn test_reparse_has_no_residual_children() {
    let mut parser = HtmlParser::new();
    parser.parse("<a></a><b></b><c></c>").unwrap();
    parser.parse("<d></d>").unwrap();
    assert_eq!(parser.tree().root().children().len(), 1);
    assert_eq!(parser.tree().len(), 2);
}

// ============================================================================
// DRIVING THE BUILDER DIRECTLY
// ============================================================================

#[test]
fn test_builder_event_sequence() {
    let mut builder = TreeBuilder::new();
    builder.start_tag("p", vec![Attribute::new("class", "x")]);
    builder.text("my data");
    builder.start_tag("em", Vec::new());
    builder.text("test");
    builder.end_tag("em");
    builder.self_closing_tag("br", Vec::new());
    builder.end_tag("p");

    let tree = builder.finish();
    let p = tree.get(tree.root().children()[0]).unwrap();
    assert_eq!(p.text(), Some("my datatest "));
    assert_eq!(p.children().len(), 2);
}

// ============================================================================
// STRESS TESTS
// ============================================================================

#[test]
fn test_deeply_nested() {
    let depth = 5_000;
    let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let mut parser = HtmlParser::new();
    parser.parse(&html).unwrap();
    assert_eq!(parser.len(), depth + 1);
    assert_eq!(parser.get_tag(depth).unwrap().text.as_deref(), Some("x"));
}

#[test]
fn test_many_siblings() {
    let html = "<li>item</li>".repeat(10_000);
    let mut parser = HtmlParser::new();
    parser.parse(&html).unwrap();
    assert_eq!(parser.len(), 10_001);
    assert_eq!(parser.find_next_tag("li", None, None, 9_999), Some(9_999));
}

#[test]
fn test_many_text_chunks_joined() {
    let html = format!("<p>{}</p>", "a&amp;".repeat(2_000));
    let mut parser = HtmlParser::new();
    parser.parse(&html).unwrap();
    assert_eq!(parser.get_tag(1).unwrap().text.as_ref().map(String::len), Some(4_000));
}
