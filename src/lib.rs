//! Crawls a single website from a seed URL, checks every same-site page it
//! discovers and reports the ones that are offline.
//!
//! The pipeline, leaf-first:
//! - [`crawl::in_scope`] decides which URLs belong to the site
//! - [`checker::extract_links`] pulls hyperlinks out of a page
//! - [`crawl::crawl`] walks the site breadth-first up to a depth limit
//! - [`checker::probe`] classifies one page online/offline
//! - [`monitor::Monitor::run`] ties it together, archives a snapshot and
//!   sends at most one alert per run

pub mod checker;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod logging;
pub mod monitor;
pub mod server;
