//! HTML title extraction
//!
//! Bodies arrive truncated, so the parser has to cope with documents that
//! stop mid-tag; `html5ever` recovers from that the same way a browser does.

use scraper::{Html, Selector};

/// Title recorded when a page has no usable `<title>`
pub const NO_TITLE: &str = "no title";

/// Extracts the text of the first `<title>` element
///
/// Surrounding whitespace is trimmed; an empty title counts as absent.
///
/// # Example
///
/// ```
/// use subdomain_census::crawler::extract_title;
///
/// let html = "<html><head><title> Home </title></head></html>";
/// assert_eq!(extract_title(html), Some("Home".to_string()));
/// ```
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Like [`extract_title`] but falls back to [`NO_TITLE`]
pub fn title_or_placeholder(html: &str) -> String {
    extract_title(html).unwrap_or_else(|| NO_TITLE.to_string())
}
