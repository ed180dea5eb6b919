//! URL inspection and HTML escaping helpers.
//!
//! Every function here is total: parse failures turn into `false`/`None`
//! rather than errors, so callers can filter malformed input silently.

use url::Url;

/// Fragment directive prefix used by text-fragment deep links.
const TEXT_FRAGMENT_PREFIX: &str = ":~:text=";

/// Whether `url` is an absolute `http`/`https` URL.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Hostname of `url`, or `None` if it does not parse or has no host.
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}

/// Decoded, HTML-escaped quotation from a `#:~:text=` fragment.
///
/// Returns `None` when the URL does not parse, has no fragment, the fragment
/// is not a text fragment, or the percent-encoded text is not valid UTF-8.
pub fn extract_text_fragment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let encoded = parsed.fragment()?.strip_prefix(TEXT_FRAGMENT_PREFIX)?;
    let decoded = urlencoding::decode(encoded).ok()?;
    Some(escape_html(&decoded))
}

/// Escape `& < > " '` as HTML entities.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
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
    out
}

/// Replace every `\n` with `<br>`.
pub fn convert_newlines_to_br_tags(text: &str) -> String {
    text.replace('\n', "<br>")
}

/// Escape `text`, turn its line breaks into `<br>`, and wrap it in a blockquote.
pub fn create_blockquote(text: &str) -> String {
    format!(
        "<blockquote>{}</blockquote>",
        convert_newlines_to_br_tags(&escape_html(text))
    )
}
