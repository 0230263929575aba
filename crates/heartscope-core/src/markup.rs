#![forbid(unsafe_code)]

//! Structured emphasis for generated sentences.
//!
//! Sentences are assembled as a list of [`Segment`]s, each either plain or
//! strong, and only turned into markup by [`Sentence::to_html`] at the very
//! end. Generated text is never re-parsed.
//!
//! ```
//! use heartscope_core::markup::Sentence;
//!
//! let s = Sentence::new().strong("Cholesterol").plain(" is the top factor.");
//! assert_eq!(s.to_plain_text(), "Cholesterol is the top factor.");
//! assert_eq!(
//!     s.to_html(),
//!     r#"<strong class="text-primary">Cholesterol</strong> is the top factor."#
//! );
//! ```

use std::borrow::Cow;

/// Emphasis level of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emphasis {
    #[default]
    Plain,
    Strong,
}

/// A run of text with one emphasis level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: Cow<'static, str>,
    pub emphasis: Emphasis,
}

impl Segment {
    #[must_use]
    pub fn plain(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: text.into(),
            emphasis: Emphasis::Plain,
        }
    }

    #[must_use]
    pub fn strong(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: text.into(),
            emphasis: Emphasis::Strong,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// An ordered list of segments forming one sentence (or short paragraph).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sentence {
    segments: Vec<Segment>,
}

impl Sentence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append plain text. Empty text is skipped.
    #[must_use]
    pub fn plain(self, text: impl Into<Cow<'static, str>>) -> Self {
        self.push(Segment::plain(text))
    }

    /// Append emphasized text. Empty text is skipped.
    #[must_use]
    pub fn strong(self, text: impl Into<Cow<'static, str>>) -> Self {
        self.push(Segment::strong(text))
    }

    fn push(mut self, segment: Segment) -> Self {
        if segment.text.is_empty() {
            return self;
        }
        // Adjacent runs with the same emphasis merge.
        match self.segments.last_mut() {
            Some(last) if last.emphasis == segment.emphasis => {
                last.text.to_mut().push_str(&segment.text);
            }
            _ => self.segments.push(segment),
        }
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.segments.iter().map(Segment::as_str).collect()
    }

    /// Whether any segment contains `needle` (case-sensitive).
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.to_plain_text().contains(needle)
    }

    /// HTML with escaped text; strong runs become `<strong class="text-primary">`.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg.emphasis {
                Emphasis::Plain => escape_into(&mut out, &seg.text),
                Emphasis::Strong => {
                    out.push_str(r#"<strong class="text-primary">"#);
                    escape_into(&mut out, &seg.text);
                    out.push_str("</strong>");
                }
            }
        }
        out
    }
}

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn adjacent_runs_merge() {
        let s = Sentence::new()
            .plain("a")
            .plain("b")
            .strong("c")
            .strong("d")
            .plain("");
        assert_eq!(
            s.segments(),
            &[Segment::plain("ab"), Segment::strong("cd")]
        );
    }

    #[test]
    fn html_escapes_text_inside_and_outside_emphasis() {
        let s = Sentence::new()
            .strong("Cholesterol (≥ 240 mg/dl) & <b>")
            .plain(" \"quoted\"");
        assert_eq!(
            s.to_html(),
            "<strong class=\"text-primary\">Cholesterol (≥ 240 mg/dl) &amp; &lt;b&gt;</strong> &quot;quoted&quot;"
        );
    }

    #[test]
    fn empty_sentence_renders_nothing() {
        assert!(Sentence::new().is_empty());
        assert_eq!(Sentence::new().to_html(), "");
    }

    #[test]
    fn escape_html_handles_apostrophe() {
        assert_eq!(escape_html("it's"), "it&#39;s");
    }
}
