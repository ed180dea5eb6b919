//! Document scanning: inline citations, existing footnotes, and the
//! managed footnotes block.

use std::sync::LazyLock;

use regex::Regex;

use footernotes_shared::{
    Citation, FOOTNOTES_BEGIN_MARKER, FOOTNOTES_END_MARKER, Footnote, FootnoteId,
};

use crate::url_utils::{convert_newlines_to_br_tags, extract_text_fragment, is_valid_url};

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\(\[(.*?)\]\((.*?)\)\)").expect("valid regex")
});

static FOOTNOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\^(.*?)\]:\s*\[(.*?)\]\((.*?)\)(?:\s*<blockquote>.*?</blockquote>)?")
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Find every `([Title](URL))` citation, left to right.
///
/// Matches with an empty title, an empty URL or a URL that is not absolute
/// http(s) are skipped. Titles may span lines; their newlines become spaces.
pub fn find_inline_citations(text: &str) -> Vec<Citation> {
    CITATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = caps.get(1)?.as_str();
            let url = caps.get(2)?.as_str();
            if title.is_empty() || url.is_empty() || !is_valid_url(url) {
                return None;
            }
            Some(Citation {
                full_match: whole.as_str().to_string(),
                title: title.replace('\n', " "),
                url: url.to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Find every `[^id]: [Title](URL)` footnote entry with a valid URL.
///
/// A trailing ` <blockquote>…</blockquote>` is consumed but not kept, since
/// it is re-derived from the URL when the block is rendered.
pub fn find_existing_footnotes(text: &str) -> Vec<Footnote> {
    FOOTNOTE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let label = caps.get(1)?.as_str();
            let title = caps.get(2)?.as_str();
            let url = caps.get(3)?.as_str();
            if label.is_empty() || title.is_empty() || url.is_empty() || !is_valid_url(url) {
                return None;
            }
            Some(Footnote {
                id: FootnoteId::from_label(label),
                title: title.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Footnotes block
// ---------------------------------------------------------------------------

/// Whether both block markers are present.
pub fn has_footnotes_section(text: &str) -> bool {
    text.contains(FOOTNOTES_BEGIN_MARKER) && text.contains(FOOTNOTES_END_MARKER)
}

/// Offset right after the begin marker, or the end of the text if there is none.
pub fn get_footnotes_insert_position(text: &str) -> usize {
    match text.find(FOOTNOTES_BEGIN_MARKER) {
        Some(idx) => idx + FOOTNOTES_BEGIN_MARKER.len(),
        None => text.len(),
    }
}

/// Render one footnote entry line (no trailing newline).
pub fn render_footnote_line(footnote: &Footnote) -> String {
    let line = format!("{}: [{}]({})", footnote.id, footnote.title, footnote.url);
    match extract_text_fragment(&footnote.url) {
        Some(fragment) => format!(
            "{line} <blockquote>{}</blockquote>",
            convert_newlines_to_br_tags(&fragment)
        ),
        None => line,
    }
}

/// Render the entry lines of a block, joined by newlines.
pub(crate) fn render_footnote_lines(footnotes: &[Footnote]) -> String {
    footnotes
        .iter()
        .map(render_footnote_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a complete footnotes block, markers included.
pub fn create_footnotes_section(footnotes: &[Footnote]) -> String {
    format!(
        "{FOOTNOTES_BEGIN_MARKER}\n{}\n{FOOTNOTES_END_MARKER}",
        render_footnote_lines(footnotes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footnote(id: &str, title: &str, url: &str) -> Footnote {
        Footnote {
            id: FootnoteId::from_label(id),
            title: title.into(),
            url: url.into(),
        }
    }

    // --- find_inline_citations ---

    #[test]
    fn finds_single_citation() {
        let text = "Text with ([Title](https://example.com)) citation";
        let citations = find_inline_citations(text);
        assert_eq!(citations.len(), 1);
        assert_eq!(
            citations[0],
            Citation {
                full_match: "([Title](https://example.com))".into(),
                title: "Title".into(),
                url: "https://example.com".into(),
                start: text.find("([").unwrap(),
                end: text.find("))").unwrap() + 2,
            }
        );
    }

    #[test]
    fn finds_multiple_citations_in_order() {
        let text = "First ([One](https://example.com/1)) and second ([Two](https://example.com/2))";
        let citations = find_inline_citations(text);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].title, "One");
        assert_eq!(citations[1].title, "Two");
        assert!(citations[0].end <= citations[1].start);
    }

    #[test]
    fn skips_invalid_urls() {
        assert!(find_inline_citations("Invalid ([Title](not-a-url)) citation").is_empty());
        assert!(find_inline_citations("Ftp ([Title](ftp://example.com)) citation").is_empty());
    }

    #[test]
    fn skips_empty_title() {
        assert!(find_inline_citations("Empty ([](https://example.com)) title").is_empty());
    }

    #[test]
    fn folds_newlines_in_title() {
        let text = "Text with ([Title\nContinued](https://example.com)) citation";
        let citations = find_inline_citations(text);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].full_match, "([Title\nContinued](https://example.com))");
        assert_eq!(citations[0].title, "Title Continued");
        assert_eq!(citations[0].start, text.find("([").unwrap());
        assert_eq!(citations[0].end, text.find("))").unwrap() + 2);
    }

    #[test]
    fn title_with_nested_brackets() {
        let text = "Text ([Text [Text5] Text2](https://example.com/a)) end";
        let citations = find_inline_citations(text);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].title, "Text [Text5] Text2");
        assert_eq!(citations[0].url, "https://example.com/a");
    }

    #[test]
    fn offsets_are_byte_offsets() {
        let text = "日本語 ([題](https://example.jp/)) です";
        let citations = find_inline_citations(text);
        assert_eq!(citations.len(), 1);
        let c = &citations[0];
        assert_eq!(&text[c.start..c.end], c.full_match);
    }

    #[test]
    fn plain_links_are_not_citations() {
        assert!(find_inline_citations("See [Title](https://example.com) here").is_empty());
    }

    // --- find_existing_footnotes ---

    #[test]
    fn finds_single_footnote() {
        let footnotes = find_existing_footnotes("[^example.com-1]: [Title](https://example.com)");
        assert_eq!(footnotes, vec![footnote("example.com-1", "Title", "https://example.com")]);
    }

    #[test]
    fn finds_multiple_footnotes() {
        let text = "
[^example.com-1]: [One](https://example.com/1)
[^example.com-2]: [Two](https://example.com/2)
";
        assert_eq!(find_existing_footnotes(text).len(), 2);
    }

    #[test]
    fn finds_footnotes_with_blockquotes() {
        let text = "
[^example.com-1]: [Title](https://example.com#:~:text=Quote) <blockquote>Quoted text</blockquote>
[^example.com-2]: [Another](https://example.com/page)
";
        let footnotes = find_existing_footnotes(text);
        assert_eq!(footnotes.len(), 2);
        assert_eq!(
            footnotes[0],
            footnote("example.com-1", "Title", "https://example.com#:~:text=Quote")
        );
    }

    #[test]
    fn skips_footnotes_with_invalid_urls() {
        assert!(find_existing_footnotes("[^example-1]: [Title](not-a-url)").is_empty());
    }

    // --- block helpers ---

    #[test]
    fn detects_footnotes_section() {
        let text = "
Some text
<!-- footernotes:begin -->
[^1]: Note
<!-- footernotes:end -->
";
        assert!(has_footnotes_section(text));
        assert!(!has_footnotes_section("Some text without footnotes section"));
        assert!(!has_footnotes_section("only <!-- footernotes:begin --> here"));
    }

    #[test]
    fn insert_position_after_begin_marker() {
        let text = "<!-- footernotes:begin -->content<!-- footernotes:end -->";
        assert_eq!(get_footnotes_insert_position(text), FOOTNOTES_BEGIN_MARKER.len());
    }

    #[test]
    fn insert_position_at_end_without_section() {
        let text = "Some text";
        assert_eq!(get_footnotes_insert_position(text), text.len());
    }

    #[test]
    fn creates_formatted_section() {
        let section = create_footnotes_section(&[
            footnote("example.com-1", "One", "https://example.com/1"),
            footnote("example.com-2", "Two", "https://example.com/2"),
        ]);
        assert_eq!(
            section,
            "<!-- footernotes:begin -->\n\
             [^example.com-1]: [One](https://example.com/1)\n\
             [^example.com-2]: [Two](https://example.com/2)\n\
             <!-- footernotes:end -->"
        );
    }

    #[test]
    fn renders_text_fragment_quote() {
        let line = render_footnote_line(&footnote(
            "example.com-1",
            "Title",
            "https://example.com/page#:~:text=Hello%20World",
        ));
        assert_eq!(
            line,
            "[^example.com-1]: [Title](https://example.com/page#:~:text=Hello%20World) <blockquote>Hello World</blockquote>"
        );
    }

    #[test]
    fn renders_multiline_fragment_on_one_line() {
        let line = render_footnote_line(&footnote(
            "example.com-1",
            "Title",
            "https://example.com/#:~:text=one%0Atwo",
        ));
        assert!(line.ends_with("<blockquote>one<br>two</blockquote>"));
        assert!(!line.contains('\n'));
    }
}
