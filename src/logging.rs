// src/logging.rs
// =============================================================================
// Sets up structured logging with tracing-subscriber.
//
// RUST_LOG always wins; without it we log our own crate at info (debug with
// --verbose) and dependencies at warn.
// =============================================================================

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber. Call once, from main.
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => default_filter(verbose)?,
    };

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    Ok(())
}

fn default_filter(verbose: bool) -> Result<EnvFilter> {
    let own_level = if verbose { "debug" } else { "info" };
    Ok(EnvFilter::new("warn").add_directive(format!("site_monitor={}", own_level).parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        let quiet = default_filter(false).unwrap().to_string();
        assert!(quiet.contains("site_monitor=info"));

        let verbose = default_filter(true).unwrap().to_string();
        assert!(verbose.contains("site_monitor=debug"));
    }
}
