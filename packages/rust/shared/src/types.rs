//! Core domain types for footernotes documents.

use std::fmt;

/// Comment line opening the managed footnotes block.
pub const FOOTNOTES_BEGIN_MARKER: &str = "<!-- footernotes:begin -->";

/// Comment line closing the managed footnotes block.
pub const FOOTNOTES_END_MARKER: &str = "<!-- footernotes:end -->";

// ---------------------------------------------------------------------------
// FootnoteId
// ---------------------------------------------------------------------------

/// A bracketed footnote identifier such as `[^example.com-3]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FootnoteId(String);

impl FootnoteId {
    /// Build the canonical identifier for the `counter`-th footnote of `domain`.
    pub fn new(domain: &str, counter: u64) -> Self {
        Self(format!("[^{domain}-{counter}]"))
    }

    /// Wrap a bare label (the text between `[^` and `]`) in bracket form.
    pub fn from_label(label: &str) -> Self {
        Self(format!("[^{label}]"))
    }

    /// The identifier in its bracketed form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing `-<n>` counter of the label, if it has one.
    pub fn suffix(&self) -> Option<u64> {
        let label = self.0.strip_prefix("[^")?.strip_suffix(']')?;
        let (_, n) = label.rsplit_once('-')?;
        if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        n.parse().ok()
    }
}

impl fmt::Display for FootnoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Citation
// ---------------------------------------------------------------------------

/// One inline `([Title](URL))` occurrence in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// The full matched text, parentheses included.
    pub full_match: String,
    /// Link title with newlines folded to single spaces.
    pub title: String,
    /// Link target.
    pub url: String,
    /// Byte offset of the opening parenthesis.
    pub start: usize,
    /// Byte offset just past the closing parenthesis.
    pub end: usize,
}

// ---------------------------------------------------------------------------
// Footnote
// ---------------------------------------------------------------------------

/// A footnote entry, either parsed from a footnotes block or newly minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub id: FootnoteId,
    pub title: String,
    pub url: String,
}
