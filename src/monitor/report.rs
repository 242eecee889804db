// src/monitor/report.rs
// =============================================================================
// The terminal output of a run, and the alert text derived from it.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::checker::PageResult;

/// Subject line of every alert email
pub const ALERT_SUBJECT: &str = "⚠️ Alert: Offline Pages Detected";

/// Everything one pipeline run produced
///
/// `offline_pages` is always the subset of `results` that is offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub results: Vec<PageResult>,
    pub offline_pages: Vec<PageResult>,
}

impl RunResult {
    /// Partitions probe results into the full list and the offline subset
    pub fn from_results(results: Vec<PageResult>) -> Self {
        let offline_pages = results
            .iter()
            .filter(|r| !r.is_online())
            .cloned()
            .collect();

        RunResult {
            results,
            offline_pages,
        }
    }

    pub fn has_offline_pages(&self) -> bool {
        !self.offline_pages.is_empty()
    }
}

/// One line of the alert body: `<url> - <error>` or `<url> - Code: <code>`
pub fn offline_line(page: &PageResult) -> String {
    match (&page.error, page.code) {
        (Some(error), _) => format!("{} - {}", page.url, error),
        (None, Some(code)) => format!("{} - Code: {}", page.url, code),
        (None, None) => format!("{} - unknown error", page.url),
    }
}

/// Full alert body listing every offline page, one per line
pub fn alert_body(offline_pages: &[PageResult]) -> String {
    let lines: Vec<String> = offline_pages.iter().map(offline_line).collect();
    format!("The following pages are offline:\n\n{}", lines.join("\n"))
}
