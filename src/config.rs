// src/config.rs
// =============================================================================
// Process configuration, built once at startup.
//
// Everything comes from environment variables (optionally seeded from a .env
// file by main). Missing required settings and malformed values are fatal:
// `Config::from_env` fails before any run begins.
//
// Loading goes through a lookup function so tests can feed a plain map
// instead of mutating the process environment.
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::monitor::{ArchiveConfig, SmtpConfig};

/// Site monitored by on-demand runs when the caller gives no base_url
pub const DEFAULT_BASE_URL: &str = "https://www.urbiaparques.com.br";
pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_INTERVAL_SECS: u64 = 60 * 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROBE_CONCURRENCY: usize = 16;
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Clone)]
pub struct Config {
    pub smtp: SmtpConfig,
    pub archive: ArchiveConfig,
    /// Where alert emails go
    pub alert_recipient: String,
    /// Defaults for on-demand runs
    pub default_base_url: Url,
    pub default_max_depth: usize,
    pub schedule: ScheduleConfig,
    pub request_timeout: Duration,
    pub probe_concurrency: usize,
    pub listen_addr: SocketAddr,
}

/// Fixed parameters of the recurring run
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub base_url: Url,
    pub max_depth: usize,
    pub interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup: &lookup };

        let default_base_url = vars.url_or("MONITOR_BASE_URL", DEFAULT_BASE_URL)?;
        let default_max_depth = vars.parse_or("MONITOR_MAX_DEPTH", DEFAULT_MAX_DEPTH)?;

        let schedule = ScheduleConfig {
            enabled: vars.parse_or("SCHEDULE_ENABLED", true)?,
            base_url: vars.url_or("SCHEDULE_BASE_URL", default_base_url.as_str())?,
            max_depth: vars.parse_or("SCHEDULE_MAX_DEPTH", default_max_depth)?,
            interval: Duration::from_secs(
                vars.parse_or("SCHEDULE_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?,
            ),
        };
        if schedule.interval.is_zero() {
            bail!("SCHEDULE_INTERVAL_SECS must be greater than zero");
        }

        let probe_concurrency = vars.parse_or("PROBE_CONCURRENCY", DEFAULT_PROBE_CONCURRENCY)?;
        if probe_concurrency == 0 {
            bail!("PROBE_CONCURRENCY must be greater than zero");
        }

        let smtp_user = vars.required("SMTP_USER")?;
        let smtp = SmtpConfig {
            host: vars.required("SMTP_SERVER")?,
            port: vars.parse_or("SMTP_PORT", 587)?,
            from: vars.get("SMTP_FROM").unwrap_or_else(|| smtp_user.clone()),
            password: vars.required("SMTP_PASS")?,
            username: smtp_user,
            tls: vars.parse_or("SMTP_TLS", true)?,
        };

        let archive = ArchiveConfig {
            bucket: vars.required("ARCHIVE_BUCKET")?,
            region: vars
                .get("ARCHIVE_REGION")
                .unwrap_or_else(|| "us-east-1".to_string()),
            endpoint: vars.get("ARCHIVE_ENDPOINT"),
            access_key: vars.required("ARCHIVE_ACCESS_KEY")?,
            secret_key: vars.required("ARCHIVE_SECRET_KEY")?,
            prefix: vars
                .get("ARCHIVE_PREFIX")
                .unwrap_or_else(|| "website-monitor".to_string()),
        };

        Ok(Self {
            smtp,
            archive,
            alert_recipient: vars.required("DEFAULT_EMAIL")?,
            default_base_url,
            default_max_depth,
            schedule,
            request_timeout: Duration::from_secs(
                vars.parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            ),
            probe_concurrency,
            listen_addr: vars.parse_or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR.parse::<SocketAddr>()?)?,
        })
    }
}

/// Parses a seed URL and checks it is something we can crawl
pub fn parse_seed(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid URL '{}': {}", raw, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("URL must use http or https: {}", raw);
    }
    if url.host_str().is_none() {
        bail!("URL has no host: {}", raw);
    }
    Ok(url)
}

// Thin helper over the lookup function. Empty values count as unset.
struct Vars<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Vars<'_> {
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .with_context(|| format!("{} must be set", key))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
            None => Ok(default),
        }
    }

    fn url_or(&self, key: &str, default: &str) -> Result<Url> {
        let raw = self.get(key).unwrap_or_else(|| default.to_string());
        parse_seed(&raw).with_context(|| format!("{} is not a usable URL", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_USER", "monitor@example.com"),
            ("SMTP_PASS", "secret"),
            ("DEFAULT_EMAIL", "ops@example.com"),
            ("ARCHIVE_BUCKET", "snapshots"),
            ("ARCHIVE_ACCESS_KEY", "AKIA"),
            ("ARCHIVE_SECRET_KEY", "shh"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.from, "monitor@example.com");
        assert!(config.smtp.tls);
        assert_eq!(config.archive.region, "us-east-1");
        assert_eq!(config.archive.prefix, "website-monitor");
        assert!(config.archive.endpoint.is_none());
        assert_eq!(config.default_base_url.as_str(), "https://www.urbiaparques.com.br/");
        assert_eq!(config.default_max_depth, 2);
        assert!(config.schedule.enabled);
        assert_eq!(config.schedule.base_url, config.default_base_url);
        assert_eq!(config.schedule.interval, Duration::from_secs(3600));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.probe_concurrency, 16);
        assert_eq!(config.listen_addr.port(), 5000);
    }

    #[test]
    fn test_missing_required_setting_is_fatal() {
        let mut env = base_env();
        env.remove("SMTP_PASS");
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains("SMTP_PASS"));

        let mut env = base_env();
        env.insert("ARCHIVE_BUCKET", "  ");
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains("ARCHIVE_BUCKET"));
    }

    #[test]
    fn test_malformed_values_are_fatal() {
        let mut env = base_env();
        env.insert("SMTP_PORT", "not-a-port");
        assert!(load(&env).is_err());

        let mut env = base_env();
        env.insert("SCHEDULE_INTERVAL_SECS", "0");
        assert!(load(&env).is_err());

        let mut env = base_env();
        env.insert("MONITOR_BASE_URL", "ftp://example.com");
        assert!(load(&env).is_err());
    }

    #[test]
    fn test_schedule_overrides() {
        let mut env = base_env();
        env.insert("MONITOR_BASE_URL", "https://example.com");
        env.insert("SCHEDULE_BASE_URL", "https://status.example.com");
        env.insert("SCHEDULE_MAX_DEPTH", "1");
        env.insert("SCHEDULE_ENABLED", "false");
        let config = load(&env).unwrap();
        assert_eq!(config.default_base_url.as_str(), "https://example.com/");
        assert_eq!(config.schedule.base_url.as_str(), "https://status.example.com/");
        assert_eq!(config.schedule.max_depth, 1);
        assert!(!config.schedule.enabled);
    }

    #[test]
    fn test_parse_seed() {
        assert!(parse_seed("https://example.com").is_ok());
        assert!(parse_seed("not a url").is_err());
        assert!(parse_seed("mailto:a@example.com").is_err());
    }
}
