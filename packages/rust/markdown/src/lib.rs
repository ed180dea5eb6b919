//! Inline citation to footnote conversion for Markdown documents.
//!
//! Rewrites every `([Title](URL))` citation into a `[^domain-n]` reference and
//! keeps the referenced links in a managed block delimited by
//! `<!-- footernotes:begin -->` and `<!-- footernotes:end -->`. The block
//! doubles as the durable store of per-domain counters between runs.

pub mod scanner;
pub mod url_utils;

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use footernotes_shared::{
    Citation, FOOTNOTES_END_MARKER, Footnote, FootnoteId, FooternotesError, Result,
};

use crate::scanner::{
    create_footnotes_section, find_existing_footnotes, find_inline_citations,
    get_footnotes_insert_position, has_footnotes_section, render_footnote_lines,
};
use crate::url_utils::extract_domain;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Counts describing what a conversion did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Inline citations replaced by a footnote reference.
    pub citations_replaced: usize,
    /// Footnote entries added to the block.
    pub footnotes_added: usize,
    /// Footnote entries that were already present.
    pub footnotes_preserved: usize,
}

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The converted document.
    pub text: String,
    /// What changed.
    pub stats: ConversionStats,
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Convert inline citations in `text` to footnotes.
///
/// Returns the input unchanged when it contains no citations.
pub fn convert_to_footnotes(text: &str) -> Result<String> {
    convert_with_report(text).map(|conversion| conversion.text)
}

/// Convert inline citations in `text` to footnotes, reporting what changed.
///
/// 1. Scans citations and existing footnotes
/// 2. Assigns one identifier per distinct URL, reusing existing ones
/// 3. Rewrites each citation span with its identifier
/// 4. Merges new entries after the existing ones
/// 5. Updates the footnotes block in place, or appends a new one
#[instrument(skip(text), fields(len = text.len()))]
pub fn convert_with_report(text: &str) -> Result<Conversion> {
    let citations = find_inline_citations(text);
    let existing = find_existing_footnotes(text);

    debug!(
        citations = citations.len(),
        existing = existing.len(),
        "scanned document"
    );

    if citations.is_empty() {
        return Ok(Conversion {
            text: text.to_string(),
            stats: ConversionStats {
                footnotes_preserved: existing.len(),
                ..ConversionStats::default()
            },
        });
    }

    let mut ids = IdAssigner::seeded(&existing);
    for citation in &citations {
        ids.assign(&citation.url)?;
    }

    // The first citation of each URL supplies the entry's title.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut new_footnotes = Vec::new();
    for citation in &citations {
        if seen.insert(&citation.url) {
            new_footnotes.push(Footnote {
                id: ids.get(&citation.url)?.clone(),
                title: citation.title.clone(),
                url: citation.url.clone(),
            });
        }
    }

    let body = splice_citations(text, &citations, &ids)?;

    let preserved = existing.len();
    let merged = merge_footnotes(existing, new_footnotes);
    let stats = ConversionStats {
        citations_replaced: citations.len(),
        footnotes_added: merged.len() - preserved,
        footnotes_preserved: preserved,
    };

    let text = reconcile_block(&body, &merged);

    debug!(
        citations_replaced = stats.citations_replaced,
        footnotes_added = stats.footnotes_added,
        "conversion complete"
    );

    Ok(Conversion { text, stats })
}

// ---------------------------------------------------------------------------
// Identifier assignment
// ---------------------------------------------------------------------------

/// Per-run identifier state: highest suffix per domain and the id of each URL.
#[derive(Debug, Default)]
struct IdAssigner {
    counters: HashMap<String, u64>,
    by_url: HashMap<String, FootnoteId>,
}

impl IdAssigner {
    /// Seed counters and URL ids from footnotes already in the document.
    fn seeded(existing: &[Footnote]) -> Self {
        let mut assigner = Self::default();
        for footnote in existing {
            // Counters are keyed by the URL's hostname, not the label prefix,
            // so a hand-written label for another host does not advance them.
            let Some(domain) = extract_domain(&footnote.url) else {
                continue;
            };
            if let Some(n) = footnote.id.suffix() {
                let counter = assigner.counters.entry(domain).or_insert(0);
                *counter = (*counter).max(n);
            }
            assigner
                .by_url
                .insert(footnote.url.clone(), footnote.id.clone());
        }
        assigner
    }

    /// Make sure `url` has an identifier, minting the next one for its domain if needed.
    fn assign(&mut self, url: &str) -> Result<()> {
        if self.by_url.contains_key(url) {
            return Ok(());
        }

        let domain = extract_domain(url).ok_or_else(|| FooternotesError::invalid_url(url))?;
        let counter = self.counters.entry(domain.clone()).or_insert(0);
        let Some(next) = counter.checked_add(1) else {
            return Err(FooternotesError::CounterExhausted { domain });
        };
        *counter = next;

        let id = FootnoteId::new(&domain, next);
        debug!(url, id = %id, "minted footnote id");
        self.by_url.insert(url.to_string(), id);
        Ok(())
    }

    /// Identifier previously assigned to `url`.
    fn get(&self, url: &str) -> Result<&FootnoteId> {
        self.by_url
            .get(url)
            .ok_or_else(|| FooternotesError::invalid_url(url))
    }
}

// ---------------------------------------------------------------------------
// Body rewriting and block reconciliation
// ---------------------------------------------------------------------------

/// Rebuild `text` with every citation span replaced by its identifier.
///
/// Citations must be ordered and non-overlapping, as `find_inline_citations`
/// returns them; offsets refer to the original `text`.
fn splice_citations(text: &str, citations: &[Citation], ids: &IdAssigner) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for citation in citations {
        out.push_str(&text[cursor..citation.start]);
        out.push_str(ids.get(&citation.url)?.as_str());
        cursor = citation.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}

/// Existing entries first, untouched; then new entries for URLs not yet present.
fn merge_footnotes(existing: Vec<Footnote>, new_footnotes: Vec<Footnote>) -> Vec<Footnote> {
    let mut merged = existing;
    for footnote in new_footnotes {
        if !merged.iter().any(|f| f.url == footnote.url) {
            merged.push(footnote);
        }
    }
    merged
}

/// Replace the content of the footnotes block, or append a fresh block.
fn reconcile_block(body: &str, footnotes: &[Footnote]) -> String {
    if has_footnotes_section(body) {
        let insert = get_footnotes_insert_position(body);
        if let Some(offset) = body[insert..].find(FOOTNOTES_END_MARKER) {
            let end = insert + offset;
            return format!(
                "{}\n{}\n{}",
                &body[..insert],
                render_footnote_lines(footnotes),
                &body[end..]
            );
        }
        debug!("end marker precedes begin marker, appending a new block");
    }

    format!(
        "{}\n\n{}",
        body.trim_end(),
        create_footnotes_section(footnotes)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
