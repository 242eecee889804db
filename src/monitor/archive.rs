// src/monitor/archive.rs
// =============================================================================
// Stores a JSON snapshot of every run.
//
// Keys are partitioned by UTC time so one object exists per site per hour:
//   <prefix>/<host>/<YYYY>/<MM>/<DD>/<HH>.json
// A second run within the same hour overwrites the earlier snapshot.
// =============================================================================

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use url::Url;

/// Anything that can durably store a payload under a key
#[async_trait]
pub trait Archiver: Send + Sync {
    async fn archive(&self, key: &str, payload: &[u8]) -> Result<()>;
}

/// Configuration for S3-compatible storage
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2...); AWS when None
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    /// Leading key segment shared by every snapshot
    pub prefix: String,
}

/// Archives snapshots into an S3 bucket
pub struct S3Archiver {
    bucket: Box<Bucket>,
}

impl S3Archiver {
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| anyhow!("Invalid S3 region '{}': {}", config.region, e))?,
        };

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| anyhow!("Failed to create S3 credentials: {}", e))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| anyhow!("Failed to create S3 bucket: {}", e))?;
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }
}

#[async_trait]
impl Archiver for S3Archiver {
    async fn archive(&self, key: &str, payload: &[u8]) -> Result<()> {
        let response = self
            .bucket
            .put_object_with_content_type(key, payload, "application/json")
            .await
            .map_err(|e| anyhow!("Failed to upload to S3: {}", e))?;

        let code = response.status_code();
        if !(200..300).contains(&code) {
            bail!("S3 rejected upload of {} with HTTP {}", key, code);
        }
        Ok(())
    }
}

/// Builds the time-partitioned key for a run of `base_url` at `now`
///
/// Example: `website-monitor/www.example.com/2026/10/16/09.json`
pub fn archive_key(prefix: &str, base_url: &Url, now: DateTime<Utc>) -> String {
    let mut namespace = base_url.host_str().unwrap_or("unknown-host").to_string();
    if let Some(port) = base_url.port() {
        namespace = format!("{}_{}", namespace, port);
    }

    let prefix = prefix.trim_matches('/');
    if !prefix.is_empty() {
        namespace = format!("{}/{}", prefix, namespace);
    }

    format!("{}/{}.json", namespace, now.format("%Y/%m/%d/%H"))
}
