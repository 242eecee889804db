// src/crawl/queue.rs
// =============================================================================
// This module implements website crawling with a breadth-first approach.
//
// How it works:
// 1. Start with the seed URL in a queue at depth 0
// 2. Fetch the page HTML
// 3. Extract all links from the page
// 4. Queue in-scope links that were never seen before, one hop deeper
// 5. Repeat until the queue is empty
//
// Guarantees:
// - A URL is queued (and therefore fetched) at most once per crawl
// - Nothing at max_depth or deeper is fetched (except a seed at depth 0);
//   pages in the last layer are recorded unfetched for the prober
// - A failed fetch only affects that page; the crawl carries on
//
// Rust concepts:
// - HashSet: To track seen URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - Url: For parsing and comparing hosts
// =============================================================================

use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};
use url::Url;

use super::scope::{canonicalize, in_scope};
use crate::checker::{extract_links, fetch_page};

// Represents a page in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: Url,
    depth: usize, // Link hops from the seed (the seed itself is 0)
}

// Crawls a website starting from a URL
//
// Parameters:
//   client: HTTP client (carries the per-request timeout)
//   base_url: The seed URL; also defines which host is in scope
//   max_depth: Maximum number of link hops from the seed
//
// Returns: every discovered in-scope URL, each exactly once
//
// Which URLs count as discovered:
// - the seed, if it answers HTTP 200
// - every page that answered HTTP 200
// - every in-scope link found on such a page within max_depth, even when
//   fetching it failed (that is precisely what the prober should report);
//   links in the last layer are recorded without being fetched
//
// Example:
//   max_depth=0: Only the seed
//   max_depth=1: Seed + every page it links to
//   max_depth=2: ... + every page those link to
pub async fn crawl(client: &Client, base_url: &Url, max_depth: usize) -> HashSet<Url> {
    let seed = canonicalize(base_url.clone());

    // Queue of pages to crawl
    let mut queue = VecDeque::new();
    queue.push_back(CrawlItem {
        url: seed.clone(),
        depth: 0,
    });

    // URLs already fetched or waiting in the queue
    // Inserting at enqueue time means a page linked from two parents in the
    // same layer is still fetched only once.
    let mut visited = HashSet::new();
    visited.insert(seed.clone());

    let mut discovered = HashSet::new();

    while let Some(item) = queue.pop_front() {
        if item.depth > max_depth {
            continue;
        }

        // The deepest layer can't contribute links, and the prober will GET
        // these pages anyway
        if item.depth == max_depth && item.url != seed {
            discovered.insert(item.url);
            continue;
        }

        debug!(depth = item.depth, url = %item.url, "crawling");

        let page = match fetch_page(client, &item.url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %item.url, error = %e, "failed to fetch page");
                if item.url != seed {
                    discovered.insert(item.url);
                }
                continue;
            }
        };

        // Relative links resolve against where the page was actually served.
        // A redirect off the site means the body belongs to someone else.
        if !in_scope(&page.final_url, &seed) {
            debug!(url = %item.url, served_from = %page.final_url, "redirected off site");
        } else if item.depth < max_depth {
            for link in extract_links(&page.body, &page.final_url) {
                if in_scope(&link, &seed) && visited.insert(link.clone()) {
                    queue.push_back(CrawlItem {
                        url: link,
                        depth: item.depth + 1,
                    });
                }
            }
        }

        discovered.insert(item.url);
    }

    discovered
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does this always terminate?
//    - `visited` only grows, and a URL enters the queue only when it is
//      inserted into `visited` for the first time
//    - Only URLs within max_depth hops are queued
//    - So the loop runs at most once per distinct in-scope URL within reach,
//      no matter how many cycles the link graph has
//
// 2. Why is the first discovery the shortest path?
//    - Breadth-first order: every depth-d page is popped before any depth-d+1
//      page, so a URL is first queued from the shallowest page linking to it
//
// 3. Why is the seed treated differently on failure?
//    - Every other failed URL was linked from a live page of the site: it's a
//      real page that is down. A failed seed gives us nothing to report on.
// -----------------------------------------------------------------------------
