//! Single-pass body scanner built on the html5ever tokenizer.
//!
//! No tree is built. The sink reacts to open-tag, close-tag and text events,
//! carrying [`ExtractionState`] between callbacks, and re-serializes what it
//! keeps into a list of markup fragments.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::trace;

use crate::ExtractOptions;

/// Per-document scan state. Created for one source file and consumed by [`scan`].
#[derive(Debug, Default)]
pub(crate) struct ExtractionState {
    /// Between `<body>` and `</body>`.
    pub inside_body: bool,
    /// Kept markup, in document order.
    pub fragments: Vec<String>,
    /// Name of the most recently emitted open tag, cleared by any emitted close tag.
    pub current_tag: Option<String>,
    /// Character tokens seen since the last tag; filtered as one segment.
    pending_text: String,
    /// Inside `<script>`/`<style>`: text is passed through unescaped.
    raw_text: bool,
}

/// Run the scanner over a whole document and return its final state.
pub(crate) fn scan(html: &str, opts: &ExtractOptions) -> ExtractionState {
    let tokenizer = Tokenizer::new(BodyScanner::new(opts), TokenizerOpts::default());

    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&input);
    tokenizer.end();

    tokenizer.sink.finish()
}

// ---------------------------------------------------------------------------
// Token sink
// ---------------------------------------------------------------------------

struct BodyScanner<'a> {
    opts: &'a ExtractOptions,
    state: RefCell<ExtractionState>,
}

impl<'a> BodyScanner<'a> {
    fn new(opts: &'a ExtractOptions) -> Self {
        Self {
            opts,
            state: RefCell::new(ExtractionState::default()),
        }
    }

    fn finish(&self) -> ExtractionState {
        self.flush_text();
        self.state.take()
    }

    fn on_open_tag(&self, tag: &Tag) -> TokenSinkResult<()> {
        let name: &str = &tag.name;
        let next = match name {
            _ if tag.self_closing => TokenSinkResult::Continue,
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" => TokenSinkResult::RawData(RawKind::Rawtext),
            _ => TokenSinkResult::Continue,
        };

        let mut state = self.state.borrow_mut();
        state.raw_text = matches!(next, TokenSinkResult::RawData(_));

        if name == "body" {
            state.inside_body = true;
            return next;
        }
        if !state.inside_body {
            return next;
        }

        if name == "a" && self.is_video_link(tag) {
            trace!("dropping video link");
            return next;
        }

        state.fragments.push(open_tag_markup(tag));
        // A self-closing tag is its own close; nothing is left open to match.
        state.current_tag = if tag.self_closing {
            None
        } else {
            Some(name.to_string())
        };

        next
    }

    fn on_close_tag(&self, tag: &Tag) {
        let name: &str = &tag.name;
        let mut state = self.state.borrow_mut();
        state.raw_text = false;

        if name == "body" {
            state.inside_body = false;
            return;
        }
        if !state.inside_body {
            return;
        }

        // Only close a link if the last thing opened was a link. This keeps the
        // close tag of a dropped video link out, at the cost of also dropping
        // `</a>` after markup nested inside a kept link.
        if name == "a" && state.current_tag.as_deref() != Some("a") {
            return;
        }

        state.fragments.push(format!("</{name}>"));
        state.current_tag = None;
    }

    /// Emit or drop the text collected since the last tag.
    fn flush_text(&self) {
        let mut state = self.state.borrow_mut();
        if state.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut state.pending_text);

        if !state.inside_body || self.opts.is_filtered_text(&text) {
            return;
        }

        let fragment = if state.raw_text {
            text
        } else {
            escape_text(&text)
        };
        state.fragments.push(fragment);
    }

    fn is_video_link(&self, tag: &Tag) -> bool {
        tag.attrs
            .iter()
            .any(|attr| &*attr.name.local == "href" && self.opts.is_video_url(&attr.value))
    }
}

impl TokenSink for BodyScanner<'_> {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => {
                self.state.borrow_mut().pending_text.push_str(&text);
            }
            Token::NullCharacterToken | Token::ParseError(_) => {}
            Token::TagToken(tag) => {
                self.flush_text();
                match tag.kind {
                    TagKind::StartTag => return self.on_open_tag(&tag),
                    TagKind::EndTag => self.on_close_tag(&tag),
                }
            }
            // Comments, doctypes and EOF end the current text segment.
            _ => self.flush_text(),
        }
        TokenSinkResult::Continue
    }
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

/// `<name a="1" b="2">`, attributes in source order.
fn open_tag_markup(tag: &Tag) -> String {
    let mut out = format!("<{}", tag.name);
    for attr in &tag.attrs {
        out.push(' ');
        out.push_str(&attr.name.local);
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }
    out.push('>');
    out
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
