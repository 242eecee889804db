// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Same-site restriction (doesn't crawl external sites)
// - Depth limit counted in link hops from the seed (seed = depth 0)
// - Every URL fetched at most once per crawl
//
// Rust concepts:
// - Async programming: the fetches are network I/O
// - Collections: HashSet for tracking visited URLs, VecDeque for the queue
// =============================================================================

mod queue;
mod scope;

pub use queue::crawl;
pub use scope::{canonicalize, in_scope};
