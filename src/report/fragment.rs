//! Render Results
//!
//! Renderers return a [`Fragment`]: the rendered text plus the number of
//! list items it contains. Section suppression reads the item count instead
//! of searching the markup.
//!
//! A fragment keeps escapable text (answers, headings) apart from raw markup
//! (figure blocks, exempt literals). [`Fragment::finish`] consumes the
//! fragment and applies the character escaping once over the escapable parts.

use crate::constants::latex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    /// Swept by the escaping pass
    Text(String),
    /// Emitted untouched
    Raw(String),
}

/// Rendered block with its list-item count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    parts: Vec<Part>,
    items: usize,
}

impl Fragment {
    /// Empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment holding escapable text
    pub fn text(text: impl Into<String>) -> Self {
        let mut fragment = Self::new();
        fragment.push_text(text);
        fragment
    }

    /// Fragment holding raw markup
    pub fn raw(text: impl Into<String>) -> Self {
        let mut fragment = Self::new();
        fragment.push_raw(text);
        fragment
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(Part::Text(last)) => last.push_str(&text),
            _ => self.parts.push(Part::Text(text)),
        }
    }

    pub fn push_raw(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(Part::Raw(last)) => last.push_str(&text),
            _ => self.parts.push(Part::Raw(text)),
        }
    }

    /// Append one list item line
    pub fn push_item(&mut self, item: &str) {
        self.push_text(format!("{}{}\n", latex::ITEM, item));
        self.items += 1;
    }

    /// Append another fragment, carrying over its items
    pub fn append(&mut self, other: Fragment) {
        self.items += other.items;
        for part in other.parts {
            match part {
                Part::Text(text) => self.push_text(text),
                Part::Raw(text) => self.push_raw(text),
            }
        }
    }

    /// Number of list items in this fragment and everything appended to it
    pub fn items(&self) -> usize {
        self.items
    }

    /// Content-presence check
    pub fn has_items(&self) -> bool {
        self.items > 0
    }

    /// No text at all
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Text without escaping
    pub fn as_plain(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Text(text) | Part::Raw(text) => text.as_str(),
            })
            .collect()
    }

    /// Produce the final document body, escaping text parts
    pub fn finish(self) -> String {
        let mut output = String::new();
        for part in self.parts {
            match part {
                Part::Text(text) => output.push_str(&escape_latex(&text)),
                Part::Raw(text) => output.push_str(&text),
            }
        }
        output
    }
}

/// Escape characters that are significant in LaTeX body text
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match latex::ESCAPES.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => escaped.push_str(to),
            None => escaped.push(ch),
        }
    }
    escaped
}
