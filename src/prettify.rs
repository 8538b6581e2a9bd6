//! Post-processing of the assembled page markup.
//!
//! The page is re-tokenized with [`html5ever`] and written back one node per
//! line:
//!
//! ```text
//! <section class="section-main">           <section class="section-main">
//!  <div>                                      <div>
//!   <h1>                           →            <h1>
//!    Title                                        Title
//!   </h1>                                       </h1>
//! ```
//!
//! [`prettify`] indents one space per open element, then [`double_indent`]
//! doubles every line's leading whitespace. Neither step changes how the page
//! renders: text runs are trimmed only at element boundaries, and the contents
//! of `pre`, `textarea`, `script`, `style` and the other raw-text elements are
//! copied verbatim, indentation included.
//!
//! [`check_well_formed`] runs the same tokenizer and checks that every
//! non-void element is closed in order.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MarkupError {
    #[error("unexpected </{found}>, expected {}", closing_tag(.expected))]
    Unbalanced {
        expected: Option<String>,
        found: String,
    },
    #[error("unclosed elements: {}", .0.join(", "))]
    UnclosedTags(Vec<String>),
}

fn closing_tag(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("</{name}>"),
        None => "no closing tag".to_string(),
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is copied without re-indentation.
const PRESERVE_ELEMENTS: &[&str] = &[
    "pre", "textarea", "script", "style", "xmp", "iframe", "noembed", "noframes",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Tokenizer state the element's content must be read in.
fn raw_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "textarea" | "title" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// Elements whose content is copied without re-escaping.
fn is_raw_text(name: &str) -> bool {
    matches!(raw_kind(name), Some(RawKind::ScriptData | RawKind::Rawtext))
}

fn sink_result(tag: &Tag) -> TokenSinkResult<()> {
    match (tag.kind, raw_kind(&tag.name)) {
        (TagKind::StartTag, Some(kind)) if !tag.self_closing => TokenSinkResult::RawData(kind),
        _ => TokenSinkResult::Continue,
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn start_tag(tag: &Tag) -> String {
    let mut out = format!("<{}", &*tag.name);
    for attr in &tag.attrs {
        out.push_str(&format!(
            " {}=\"{}\"",
            &*attr.name.local,
            escape_attr(&attr.value)
        ));
    }
    out.push('>');
    out
}

fn run_tokenizer<S: TokenSink>(html: &str, sink: S) -> S {
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from(html));
    let _ = tokenizer.feed(&queue);
    tokenizer.end();
    tokenizer.sink
}

// ============================================================================
// Indentation
// ============================================================================

/// A run of prettified output.
///
/// `Verbatim` runs hold the content of preserved elements and must reach the
/// page untouched; only `Markup` runs are re-indented.
#[derive(Debug, Clone, PartialEq)]
enum Chunk {
    Markup(String),
    Verbatim(String),
}

#[derive(Default)]
struct Prettifier {
    chunks: RefCell<Vec<Chunk>>,
    depth: Cell<usize>,
    pending_text: RefCell<String>,
    /// Open preserve element and how many of it are nested.
    preserve: RefCell<Option<(String, usize)>>,
}

impl Prettifier {
    fn push_markup(&self, text: &str) {
        let mut chunks = self.chunks.borrow_mut();
        match chunks.last_mut() {
            Some(Chunk::Markup(last)) => last.push_str(text),
            _ => chunks.push(Chunk::Markup(text.to_string())),
        }
    }

    fn push_verbatim(&self, text: &str) {
        let mut chunks = self.chunks.borrow_mut();
        match chunks.last_mut() {
            Some(Chunk::Verbatim(last)) => last.push_str(text),
            _ => chunks.push(Chunk::Verbatim(text.to_string())),
        }
    }

    fn line(&self, text: &str) {
        self.push_markup(&format!("{}{}\n", " ".repeat(self.depth.get()), text));
    }

    fn flush_text(&self) {
        let text = std::mem::take(&mut *self.pending_text.borrow_mut());
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.line(&escape_text(trimmed));
        }
    }

    fn preserved_tag(&self, tag: &Tag) -> bool {
        let mut preserve = self.preserve.borrow_mut();
        let Some((name, nesting)) = preserve.as_mut() else {
            return false;
        };
        match tag.kind {
            TagKind::StartTag => {
                if *name == *tag.name {
                    *nesting += 1;
                }
                self.push_verbatim(&start_tag(tag));
            }
            TagKind::EndTag => {
                self.push_verbatim(&format!("</{}>", &*tag.name));
                if *name == *tag.name {
                    *nesting -= 1;
                    if *nesting == 0 {
                        *preserve = None;
                        self.push_markup("\n");
                    }
                }
            }
        }
        true
    }

    fn tag(&self, tag: &Tag) {
        if self.preserved_tag(tag) {
            return;
        }
        self.flush_text();
        let name: &str = &tag.name;
        match tag.kind {
            TagKind::StartTag if PRESERVE_ELEMENTS.contains(&name) && !tag.self_closing => {
                self.push_markup(&format!(
                    "{}{}",
                    " ".repeat(self.depth.get()),
                    start_tag(tag)
                ));
                *self.preserve.borrow_mut() = Some((name.to_string(), 1));
            }
            TagKind::StartTag => {
                self.line(&start_tag(tag));
                if !is_void(name) && !tag.self_closing {
                    self.depth.set(self.depth.get() + 1);
                }
            }
            TagKind::EndTag => {
                if is_void(name) {
                    return;
                }
                self.depth.set(self.depth.get().saturating_sub(1));
                self.line(&format!("</{name}>"));
            }
        }
    }
}

impl TokenSink for Prettifier {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                self.tag(&tag);
                return sink_result(&tag);
            }
            Token::CharacterTokens(text) => {
                let preserve = self.preserve.borrow();
                match preserve.as_ref() {
                    Some((name, _)) if is_raw_text(name) => self.push_verbatim(&text),
                    Some(_) => self.push_verbatim(&escape_text(&text)),
                    None => self.pending_text.borrow_mut().push_str(&text),
                }
            }
            Token::CommentToken(comment) => {
                self.flush_text();
                self.line(&format!("<!--{}-->", &*comment));
            }
            Token::DoctypeToken(doctype) => {
                self.flush_text();
                let name = doctype.name.as_deref().unwrap_or("html");
                self.line(&format!("<!DOCTYPE {name}>"));
            }
            Token::EOFToken => self.flush_text(),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn prettify_chunks(html: &str) -> Vec<Chunk> {
    run_tokenizer(html, Prettifier::default())
        .chunks
        .into_inner()
}

/// Re-indent HTML with one node per line, one space per nesting level.
pub fn prettify(html: &str) -> String {
    prettify_chunks(html)
        .into_iter()
        .map(|chunk| match chunk {
            Chunk::Markup(text) | Chunk::Verbatim(text) => text,
        })
        .collect()
}

static LEADING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)").expect("leading whitespace pattern is valid"));

/// Double the leading whitespace of every line.
pub fn double_indent(text: &str) -> String {
    LEADING_WHITESPACE.replace_all(text, "$1$1").into_owned()
}

/// Full post-processing pass: [`prettify`] then [`double_indent`].
///
/// Content of preserved elements is left as-is; only the lines `prettify`
/// produced itself get their indentation doubled.
pub fn reformat(html: &str) -> String {
    prettify_chunks(html)
        .into_iter()
        .map(|chunk| match chunk {
            Chunk::Markup(text) => double_indent(&text),
            Chunk::Verbatim(text) => text,
        })
        .collect()
}

// ============================================================================
// Balance check
// ============================================================================

#[derive(Default)]
struct BalanceChecker {
    open: RefCell<Vec<String>>,
    error: RefCell<Option<MarkupError>>,
}

impl TokenSink for BalanceChecker {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        let name: &str = &tag.name;
        if is_void(name) || self.error.borrow().is_some() {
            return sink_result(&tag);
        }
        let mut open = self.open.borrow_mut();
        match tag.kind {
            TagKind::StartTag if !tag.self_closing => open.push(name.to_string()),
            TagKind::StartTag => {}
            TagKind::EndTag => {
                if open.last().map(String::as_str) == Some(name) {
                    open.pop();
                } else {
                    *self.error.borrow_mut() = Some(MarkupError::Unbalanced {
                        expected: open.last().cloned(),
                        found: name.to_string(),
                    });
                }
            }
        }
        sink_result(&tag)
    }
}

/// Check that every non-void element in `html` is closed, innermost first.
pub fn check_well_formed(html: &str) -> Result<(), MarkupError> {
    let checker = run_tokenizer(html, BalanceChecker::default());
    if let Some(err) = checker.error.into_inner() {
        return Err(err);
    }
    let open = checker.open.into_inner();
    if open.is_empty() {
        Ok(())
    } else {
        Err(MarkupError::UnclosedTags(open))
    }
}
