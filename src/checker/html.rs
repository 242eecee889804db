// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, which never rejects markup: broken HTML is
//   repaired the same way a browser would repair it
//
// We also use the `url` crate to resolve relative hrefs against the URL
// of the page they were found on.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

use crate::crawl::canonicalize;

// "a[href]" means "all <a> tags that have an href attribute"
fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("constant selector is valid"))
}

// Extracts every hyperlink target from an HTML page
//
// Parameters:
//   html: the page body
//   fetch_url: the URL the page was fetched from (for resolving relative links)
//
// Returns: the set of absolute URLs, fragments removed.
// Scheme filtering is left to the caller, so mailto: and friends are included.
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   fetch_url = "https://example.com/guide/"
//   result = {"https://example.com/docs"}
pub fn extract_links(html: &str, fetch_url: &Url) -> HashSet<Url> {
    let document = Html::parse_document(html);

    document
        .select(anchor_selector())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(fetch_url, href))
        .collect()
}

// Resolves a possibly-relative href to an absolute URL
//
// Url::join handles every form we care about:
//   "/docs"               -> https://example.com/docs
//   "../other"            -> https://example.com/other
//   "//cdn.example.com/x" -> https://cdn.example.com/x (protocol-relative)
//   "#section"            -> the fetch URL itself
//   "https://other.com"   -> https://other.com/
//
// Returns None for hrefs that cannot be parsed (e.g. "http://[bad").
fn resolve_url(fetch_url: &Url, href: &str) -> Option<Url> {
    fetch_url.join(href.trim()).ok().map(canonicalize)
}
