// src/checker/mod.rs
// =============================================================================
// This module contains the page-level building blocks of a run.
//
// Submodules:
// - http: Fetches pages for the crawler and probes them for liveness
// - html: Extracts links from HTML pages
//
// This file (mod.rs) is the module root - it re-exports the public API so the
// rest of the crate can write `checker::probe()` instead of
// `checker::http::probe()`.
// =============================================================================

mod html;
mod http;

pub use html::extract_links;
pub use http::{
    build_client, fetch_page, probe, probe_all, FetchError, FetchedPage, PageResult, PageStatus,
    USER_AGENT,
};
