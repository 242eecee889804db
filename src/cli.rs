// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Commands:
// - serve: HTTP trigger (GET /monitor) plus the recurring scheduled scan
// - run:   one scan in the foreground, printed as a table or JSON
// =============================================================================

use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(
    name = "site-monitor",
    version,
    about = "Crawls a website, checks every page it finds and alerts when pages go offline",
    long_about = "site-monitor crawls a site from a seed URL, probes every same-site page it \
                  discovers, archives a snapshot of each run and emails an alert listing the \
                  pages that are offline."
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve GET /monitor and run the scheduled scan
    ///
    /// Example: site-monitor serve --addr 127.0.0.1:5000
    Serve {
        /// Address to listen on (default: LISTEN_ADDR or 0.0.0.0:5000)
        #[arg(long)]
        addr: Option<SocketAddr>,

        /// Only serve on-demand requests, never scan on a schedule
        #[arg(long)]
        no_schedule: bool,
    },

    /// Scan a website once and exit
    ///
    /// Example: site-monitor run https://example.com --max-depth 2
    ///
    /// Exit code: 0 = all pages online, 1 = offline pages found, 2 = error
    Run {
        /// Seed URL (default: MONITOR_BASE_URL)
        base_url: Option<String>,

        /// Maximum link hops from the seed; 0 = only the seed page
        /// (default: MONITOR_MAX_DEPTH or 2)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output the run result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
