//! Markup to HTML conversion.

use std::collections::HashSet;

use dossier_router::PageHeading;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Converts content-block markup to HTML.
pub trait MarkupRenderer: Send + Sync {
    /// Render `markup`, appending every heading it contains to `headings`.
    ///
    /// Heading anchors are claimed from `ids`, so they never repeat an id
    /// already used on the page.
    fn render(
        &self,
        markup: &str,
        ids: &mut HeadingIds,
        headings: &mut Vec<PageHeading>,
    ) -> String;
}

/// Element ids in use on one page.
#[derive(Clone, Debug, Default)]
pub struct HeadingIds {
    taken: HashSet<String>,
}

impl HeadingIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as used, e.g. a member anchor assigned by the router.
    pub fn reserve(&mut self, id: impl Into<String>) {
        self.taken.insert(id.into());
    }

    /// Whether `id` is in use.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    /// Claim `base`, or `base-1`, `base-2`, ... if it is taken.
    pub fn claim(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        if self.taken.insert(base.to_owned()) {
            return base.to_owned();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl<S: Into<String>> Extend<S> for HeadingIds {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.taken.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for HeadingIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut ids = Self::new();
        ids.extend(iter);
        ids
    }
}

/// CommonMark renderer with GFM tables, strikethrough and task lists.
#[derive(Debug, Clone)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl CommonMarkRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM,
        }
    }
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for CommonMarkRenderer {
    fn render(
        &self,
        markup: &str,
        ids: &mut HeadingIds,
        headings: &mut Vec<PageHeading>,
    ) -> String {
        let mut events: Vec<Event<'_>> = Vec::new();
        // Level and position of the placeholder for the open heading tag.
        let mut open: Option<(u8, usize)> = None;

        for event in Parser::new_ext(markup, self.options) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    open = Some((heading_level_to_num(level), events.len()));
                    events.push(Event::Html(CowStr::Borrowed("")));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, start)) = open.take() {
                        let text = plain_text(&events[start + 1..]);
                        let anchor = ids.claim(&slugify(&text));
                        events[start] =
                            Event::Html(format!("<h{level} id=\"{}\">", escape_html(&anchor)).into());
                        events.push(Event::Html(format!("</h{level}>\n").into()));
                        headings.push(PageHeading {
                            level,
                            text,
                            anchor,
                            kind: None,
                        });
                    }
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(markup.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Convert heading text to an anchor slug.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
