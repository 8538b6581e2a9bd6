//! Markdown conversion with heading extraction.
//!
//! Wraps [`pulldown_cmark`] and threads its event stream through
//! [`AnnotateHeadings`], which:
//!
//! - gives every heading a stable anchor id (`toc_1`, `toc_2`, … in document
//!   order) unless the source already sets one with `{#id}`; generated ids
//!   skip any `toc_N` an explicit id already claims,
//! - adds the configured class to `<h1>` elements,
//! - records a [`Heading`] (id, plain text, level) for the side menu.
//!
//! Raw HTML in the source passes through unescaped.

use crate::types::Heading;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use std::collections::HashSet;

/// Converted body plus every heading found, in document order.
#[derive(Debug, Clone)]
pub struct RenderedMarkdown {
    pub html: String,
    pub headings: Vec<Heading>,
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Convert `source` to HTML and collect its headings.
///
/// `h1_class` is added to every `<h1>`; pass `""` to leave headings unstyled.
pub fn render(source: &str, h1_class: &str) -> RenderedMarkdown {
    let mut headings = Vec::new();
    let mut body = String::with_capacity(source.len() * 3 / 2);

    let reserved = explicit_ids(source);
    let events = Parser::new_ext(source, parser_options());
    let events = AnnotateHeadings::new(events, h1_class, reserved, &mut headings);
    html::push_html(&mut body, events);

    RenderedMarkdown {
        html: body,
        headings,
    }
}

/// Ids set explicitly with `{#id}` anywhere in the document.
fn explicit_ids(source: &str) -> HashSet<String> {
    Parser::new_ext(source, parser_options())
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect()
}

/// Event adapter assigning heading ids and collecting heading records.
pub struct AnnotateHeadings<'a, 'h, I> {
    inner: I,
    h1_class: &'h str,
    headings: &'h mut Vec<Heading>,
    /// Explicit ids; generated ids must not take these.
    reserved: HashSet<String>,
    used: HashSet<String>,
    current: Option<Heading>,
    seen: usize,
    _events: std::marker::PhantomData<Event<'a>>,
}

impl<'a, 'h, I> AnnotateHeadings<'a, 'h, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(
        inner: I,
        h1_class: &'h str,
        reserved: HashSet<String>,
        headings: &'h mut Vec<Heading>,
    ) -> Self {
        Self {
            inner,
            h1_class,
            headings,
            reserved,
            used: HashSet::new(),
            current: None,
            seen: 0,
            _events: std::marker::PhantomData,
        }
    }

    fn assign_id(&mut self, explicit: Option<CowStr<'a>>) -> CowStr<'a> {
        self.seen += 1;
        if let Some(id) = explicit {
            if !self.used.insert(id.to_string()) {
                log::warn!("duplicate heading id #{}", &*id);
            }
            return id;
        }
        let mut candidate = format!("toc_{}", self.seen);
        while self.reserved.contains(&candidate) || self.used.contains(&candidate) {
            self.seen += 1;
            candidate = format!("toc_{}", self.seen);
        }
        self.used.insert(candidate.clone());
        CowStr::from(candidate)
    }

    fn push_text(&mut self, text: &str) {
        if let Some(heading) = self.current.as_mut() {
            heading.text.push_str(text);
        }
    }
}

impl<'a, I> Iterator for AnnotateHeadings<'a, '_, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        let event = self.inner.next()?;
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                mut classes,
                attrs,
            }) => {
                let id = self.assign_id(id);
                if level == HeadingLevel::H1 && !self.h1_class.is_empty() {
                    classes.insert(0, CowStr::from(self.h1_class.to_string()));
                }
                self.current = Some(Heading::new(id.to_string(), String::new(), level as u8));
                Some(Event::Start(Tag::Heading {
                    level,
                    id: Some(id),
                    classes,
                    attrs,
                }))
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut heading) = self.current.take() {
                    heading.text = collapse_whitespace(&heading.text);
                    log::debug!(
                        "heading h{} #{}: {}",
                        heading.level,
                        heading.id,
                        heading.text
                    );
                    self.headings.push(heading);
                }
                Some(event)
            }
            Event::Text(ref text) | Event::Code(ref text) => {
                self.push_text(text);
                Some(event)
            }
            Event::SoftBreak | Event::HardBreak => {
                self.push_text(" ");
                Some(event)
            }
            _ => Some(event),
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
