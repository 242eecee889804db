// src/monitor/mod.rs
// =============================================================================
// The pipeline orchestrator and the collaborators it reports to.
//
// Submodules:
// - pipeline: Monitor::run, crawl -> probe -> archive -> alert
// - report: RunResult and the alert text
// - notify: Notifier trait + SMTP implementation
// - archive: Archiver trait + S3 implementation + snapshot keys
// =============================================================================

mod archive;
mod notify;
mod pipeline;
mod report;

pub use archive::{archive_key, ArchiveConfig, Archiver, S3Archiver};
pub use notify::{anonymize_email, Notifier, SmtpConfig, SmtpNotifier};
pub use pipeline::{HttpSettings, Monitor};
pub use report::{alert_body, offline_line, RunResult, ALERT_SUBJECT};
