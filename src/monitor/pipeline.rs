// src/monitor/pipeline.rs
// =============================================================================
// Runs one complete monitoring pass:
//
//   seed -> crawl -> probe every page -> archive snapshot -> alert if needed
//
// Side effects never change the returned RunResult: archive and notification
// failures are logged and swallowed, and nothing is retried.
//
// A Monitor keeps no per-run state, so one instance can serve overlapping
// runs (a scheduled run and an on-demand one); each run gets its own crawler.
// =============================================================================

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

use super::archive::{archive_key, Archiver};
use super::notify::{anonymize_email, Notifier};
use super::report::{alert_body, RunResult, ALERT_SUBJECT};
use crate::checker::{build_client, probe_all};
use crate::config::Config;
use crate::crawl::crawl;

/// HTTP behaviour shared by crawling and probing
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub probe_concurrency: usize,
}

/// The pipeline orchestrator
pub struct Monitor {
    http: HttpSettings,
    notifier: Arc<dyn Notifier>,
    archiver: Arc<dyn Archiver>,
    recipient: String,
    archive_prefix: String,
}

impl Monitor {
    pub fn new(
        http: HttpSettings,
        notifier: Arc<dyn Notifier>,
        archiver: Arc<dyn Archiver>,
        recipient: impl Into<String>,
        archive_prefix: impl Into<String>,
    ) -> Self {
        Self {
            http,
            notifier,
            archiver,
            recipient: recipient.into(),
            archive_prefix: archive_prefix.into(),
        }
    }

    /// Wires a monitor from process configuration and its collaborators
    pub fn from_config(
        config: &Config,
        notifier: Arc<dyn Notifier>,
        archiver: Arc<dyn Archiver>,
    ) -> Self {
        Self::new(
            HttpSettings {
                timeout: config.request_timeout,
                probe_concurrency: config.probe_concurrency,
            },
            notifier,
            archiver,
            config.alert_recipient.clone(),
            config.archive.prefix.clone(),
        )
    }

    /// Crawls `base_url`, probes what it found and reports on it
    ///
    /// Only fails if the HTTP client cannot be built; every per-page and
    /// side-effect failure is folded into the result or logged.
    pub async fn run(&self, base_url: &Url, max_depth: usize) -> Result<RunResult> {
        info!(%base_url, max_depth, "starting site scan");

        let client = build_client(self.http.timeout)?;

        let urls = crawl(&client, base_url, max_depth).await;
        info!(count = urls.len(), "found URLs");
        if urls.is_empty() {
            warn!(%base_url, "seed page could not be fetched, nothing to check");
        }

        let results = probe_all(&client, urls, self.http.probe_concurrency).await;
        let run = RunResult::from_results(results);

        self.archive(base_url, &run).await;

        if run.has_offline_pages() {
            for page in &run.offline_pages {
                warn!(url = %page.url, code = ?page.code, error = ?page.error, "offline page");
            }
            self.alert(&run).await;
        } else {
            info!(pages = run.results.len(), "all pages online");
        }

        Ok(run)
    }

    async fn archive(&self, base_url: &Url, run: &RunResult) {
        let key = archive_key(&self.archive_prefix, base_url, Utc::now());

        let payload = match serde_json::to_vec_pretty(&run.results) {
            Ok(payload) => payload,
            Err(e) => {
                error!(%key, error = %e, "failed to serialize snapshot");
                return;
            }
        };

        match self.archiver.archive(&key, &payload).await {
            Ok(()) => info!(%key, bytes = payload.len(), "archived snapshot"),
            Err(e) => {
                let detail = format!("{:#}", e);
                error!(%key, error = %detail, "failed to archive snapshot");
            }
        }
    }

    async fn alert(&self, run: &RunResult) {
        let body = alert_body(&run.offline_pages);
        let recipient = anonymize_email(&self.recipient);

        match self
            .notifier
            .notify(ALERT_SUBJECT, &body, &self.recipient)
            .await
        {
            Ok(()) => info!(%recipient, offline = run.offline_pages.len(), "alert sent"),
            Err(e) => {
                let detail = format!("{:#}", e);
                error!(%recipient, error = %detail, "failed to send alert");
            }
        }
    }
}
