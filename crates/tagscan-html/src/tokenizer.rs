//! Markup tokenizer adapter
//!
//! Drives html5ever's standalone tokenizer and forwards its tokens to a
//! [`MarkupSink`]. Tree construction never sees html5ever types.
//!
//! html5ever reports every deviation from the HTML standard. Only errors
//! inside a tag's own structure (name, attributes, `/>`) count as malformed
//! markup; stray `<`, character reference slips, duplicate attributes and
//! bogus comments are recovered from silently, the way browsers do.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Doctype, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use html5ever::TokenizerResult;

use crate::node::Attribute;
use crate::{ErrorPolicy, ParseError, ParserConfig};

/// Receiver of markup events, in document order.
pub trait MarkupSink {
    fn start_tag(&mut self, name: &str, attributes: Vec<Attribute>);
    fn end_tag(&mut self, name: &str);
    fn self_closing_tag(&mut self, name: &str, attributes: Vec<Attribute>);
    fn text(&mut self, data: &str);
    fn comment(&mut self, data: &str);
    fn declaration(&mut self, data: &str);
    fn unknown_declaration(&mut self, data: &str);
}

/// Tokenizer error reported while feeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupError {
    pub line: u64,
    pub message: String,
}

/// Tokenizer states that belong to the inside of a start or end tag.
const TAG_STATES: [&str; 8] = [
    "TagName",
    "BeforeAttributeName",
    "AttributeName",
    "AfterAttributeName",
    "BeforeAttributeValue",
    "AttributeValue",
    "AfterAttributeValueQuoted",
    "SelfClosingStartTag",
];

/// States whose errors announce a bogus comment (`<?..>`, `<!..>`, `</3>`).
const BOGUS_COMMENT_STATES: [&str; 3] = ["TagOpen", "MarkupDeclarationOpen", "EndTagOpen"];

/// How a tokenizer error affects the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    /// Broken tag structure.
    Malformed,
    /// Recovered; the next comment token, if any, is bogus.
    OpensBogusComment,
    /// Recovered without consequence.
    Recovered,
}

/// Classify an exact html5ever error message.
///
/// Exact messages for bad characters and EOF read `Saw <c> in state <State>`;
/// everything else (character references, duplicate attributes, end tag
/// attributes) is a fixed sentence.
fn severity(message: &str) -> Severity {
    let Some((_, state)) = message.rsplit_once(" in state ") else {
        return Severity::Recovered;
    };
    let state = state.split('(').next().unwrap_or(state);
    if TAG_STATES.contains(&state) {
        Severity::Malformed
    } else if BOGUS_COMMENT_STATES.contains(&state) {
        Severity::OpensBogusComment
    } else {
        Severity::Recovered
    }
}

/// The message html5ever gives when exact errors are off.
fn condensed(message: String) -> String {
    if message.starts_with("Saw EOF in state ") {
        "Unexpected EOF".to_string()
    } else if message.starts_with("Saw ") && message.contains(" in state ") {
        "Bad character".to_string()
    } else {
        message
    }
}

/// Outcome of a completed feed.
#[derive(Debug, Default)]
pub struct FeedReport {
    /// Errors tolerated under [`ErrorPolicy::Lenient`].
    pub errors: Vec<MarkupError>,
}

/// Wraps the html5ever tokenizer for a single document.
#[derive(Debug, Clone)]
pub struct MarkupTokenizer {
    config: ParserConfig,
}

impl MarkupTokenizer {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Tokenize `markup` to the end, calling into `sink` for every event.
    ///
    /// Under [`ErrorPolicy::Strict`] the first malformed-tag error is
    /// returned once the input is consumed; events already delivered to
    /// `sink` are not rolled back, callers discard the sink's state.
    pub fn feed<S: MarkupSink>(&self, markup: &str, sink: &mut S) -> Result<FeedReport, ParseError> {
        // Exact messages carry the tokenizer state needed to classify them.
        let opts = TokenizerOpts {
            exact_errors: true,
            ..Default::default()
        };
        let tokenizer = Tokenizer::new(EventAdapter::new(sink), opts);

        let input = BufferQueue::default();
        input.push_back(StrTendril::from(markup));
        while let TokenizerResult::Script(()) = tokenizer.feed(&input) {}
        tokenizer.end();

        let mut errors = tokenizer.sink.take_errors();
        drop(tokenizer);
        if !self.config.exact_errors {
            for error in &mut errors {
                error.message = condensed(std::mem::take(&mut error.message));
            }
        }

        match self.config.error_policy {
            ErrorPolicy::Strict => match errors.into_iter().next() {
                Some(first) => Err(ParseError::Malformed {
                    line: first.line,
                    message: first.message,
                }),
                None => Ok(FeedReport::default()),
            },
            ErrorPolicy::Lenient => {
                for error in &errors {
                    tracing::warn!(line = error.line, "tolerated markup error: {}", error.message);
                }
                Ok(FeedReport { errors })
            }
        }
    }
}

impl Default for MarkupTokenizer {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

struct AdapterState<'s, S> {
    sink: &'s mut S,
    errors: Vec<MarkupError>,
    /// The last token was an error that starts a bogus comment.
    bogus_pending: bool,
}

/// html5ever `TokenSink` forwarding to a [`MarkupSink`].
struct EventAdapter<'s, S> {
    state: RefCell<AdapterState<'s, S>>,
}

impl<'s, S: MarkupSink> EventAdapter<'s, S> {
    fn new(sink: &'s mut S) -> Self {
        Self {
            state: RefCell::new(AdapterState {
                sink,
                errors: Vec::new(),
                bogus_pending: false,
            }),
        }
    }

    fn take_errors(&self) -> Vec<MarkupError> {
        std::mem::take(&mut self.state.borrow_mut().errors)
    }
}

impl<S: MarkupSink> TokenSink for EventAdapter<'_, S> {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();

        if let Token::ParseError(message) = token {
            match severity(&message) {
                Severity::Malformed => state.errors.push(MarkupError {
                    line: line_number,
                    message: message.into_owned(),
                }),
                Severity::OpensBogusComment => {
                    tracing::trace!(line = line_number, "recovered: {}", message);
                    state.bogus_pending = true;
                }
                Severity::Recovered => {
                    tracing::trace!(line = line_number, "recovered: {}", message);
                }
            }
            return TokenSinkResult::Continue;
        }

        let bogus_pending = std::mem::take(&mut state.bogus_pending);
        if let Token::CommentToken(ref data) = token {
            if bogus_pending {
                match bogus_comment(data) {
                    Bogus::Declaration(inner) => {
                        tracing::debug!("unknown declaration - {}", inner);
                        state.sink.unknown_declaration(inner);
                    }
                    Bogus::ProcessingInstruction => {
                        tracing::debug!("ignoring processing instruction - {}", &**data);
                    }
                    Bogus::Comment => state.sink.comment(data),
                }
                return TokenSinkResult::Continue;
            }
        }

        match token {
            Token::TagToken(tag) => return forward_tag(&mut *state.sink, tag),
            Token::CharacterTokens(data) => state.sink.text(&data),
            Token::NullCharacterToken => state.sink.text("\0"),
            Token::CommentToken(data) => state.sink.comment(&data),
            Token::DoctypeToken(doctype) => state.sink.declaration(&doctype_text(&doctype)),
            Token::EOFToken => tracing::trace!("end of markup"),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn forward_tag<S: MarkupSink>(sink: &mut S, tag: Tag) -> TokenSinkResult<()> {
    let name: &str = &tag.name;
    match tag.kind {
        TagKind::EndTag => {
            sink.end_tag(name);
            TokenSinkResult::Continue
        }
        TagKind::StartTag => {
            let attributes = tag
                .attrs
                .iter()
                .map(|attr| Attribute::new(&*attr.name.local, &*attr.value))
                .collect();
            if tag.self_closing {
                sink.self_closing_tag(name, attributes);
                return TokenSinkResult::Continue;
            }
            sink.start_tag(name, attributes);
            // Script and style bodies are text, not markup.
            match name {
                "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                "style" => TokenSinkResult::RawData(RawKind::Rawtext),
                _ => TokenSinkResult::Continue,
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Bogus<'a> {
    Declaration(&'a str),
    ProcessingInstruction,
    /// `<!ELEMENT ..>`, `</3>` and the like read as plain comments.
    Comment,
}

/// Classify a comment the tokenizer produced from `<![...]>`, `<?...>` or
/// any other `<!`/`</` construct it could not read as markup.
fn bogus_comment(data: &str) -> Bogus<'_> {
    if data.starts_with('?') {
        return Bogus::ProcessingInstruction;
    }
    let Some(inner) = data.strip_prefix('[') else {
        return Bogus::Comment;
    };
    let inner = inner
        .strip_suffix("]]")
        .or_else(|| inner.strip_suffix(']'))
        .unwrap_or(inner);
    Bogus::Declaration(inner)
}

/// Rebuild the declaration body the way it reads after `<!`.
///
/// html5ever does not keep the source spelling: the keyword always reads
/// `DOCTYPE` and the name is lowercased.
fn doctype_text(doctype: &Doctype) -> String {
    let mut text = String::from("DOCTYPE");
    if let Some(name) = &doctype.name {
        text.push(' ');
        text.push_str(name);
    }
    match (&doctype.public_id, &doctype.system_id) {
        (Some(public), system) => {
            text.push_str(&format!(" PUBLIC \"{}\"", &**public));
            if let Some(system) = system {
                text.push_str(&format!(" \"{}\"", &**system));
            }
        }
        (None, Some(system)) => text.push_str(&format!(" SYSTEM \"{}\"", &**system)),
        (None, None) => {}
    }
    text
}
