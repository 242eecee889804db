// src/server.rs
// =============================================================================
// The two ways a run gets triggered:
// - On demand: GET /monitor?base_url=...&max_depth=... returns the RunResult
// - On a schedule: a fixed site and depth, every `interval`, side effects only
//
// Both go through the same Monitor. Each run builds its own crawler state, so
// an on-demand run overlapping a scheduled one is fine.
// =============================================================================

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};
use url::Url;

use crate::config::{parse_seed, ScheduleConfig};
use crate::monitor::{Monitor, RunResult};

/// Shared state injected into every route handler via `State<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
    pub default_base_url: Url,
    pub default_max_depth: usize,
}

/// Query string of `GET /monitor`; both parameters are optional
#[derive(Debug, Deserialize)]
pub struct MonitorQuery {
    pub base_url: Option<String>,
    pub max_depth: Option<usize>,
}

async fn monitor_handler(
    State(state): State<AppState>,
    Query(query): Query<MonitorQuery>,
) -> Result<Json<RunResult>, (StatusCode, String)> {
    let base_url = match query.base_url {
        Some(raw) => parse_seed(&raw).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => state.default_base_url.clone(),
    };
    let max_depth = query.max_depth.unwrap_or(state.default_max_depth);

    state
        .monitor
        .run(&base_url, max_depth)
        .await
        .map(Json)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Monitor error: {}", e),
            )
        })
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/monitor", get(monitor_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serves the HTTP trigger until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, version = env!("CARGO_PKG_VERSION"), "site-monitor listening");

    axum::serve(listener, create_app(state))
        .await
        .context("HTTP server stopped")
}

/// Runs the fixed scheduled scan forever, once per `schedule.interval`
///
/// The first run happens one interval after startup. A run that takes longer
/// than the interval delays the next one instead of stacking runs up.
pub async fn run_schedule(monitor: Arc<Monitor>, schedule: ScheduleConfig) {
    info!(
        base_url = %schedule.base_url,
        max_depth = schedule.max_depth,
        every_secs = schedule.interval.as_secs(),
        "scheduled monitoring enabled"
    );

    let monitor = &monitor;
    let schedule = &schedule;
    run_every(schedule.interval, move || async move {
        match monitor.run(&schedule.base_url, schedule.max_depth).await {
            Ok(run) => info!(
                pages = run.results.len(),
                offline = run.offline_pages.len(),
                "scheduled run finished"
            ),
            Err(e) => error!(error = %e, "scheduled run failed"),
        }
    })
    .await
}

// Calls `job` every `period`, starting one period from now, never overlapping
async fn run_every<F, Fut>(period: Duration, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick of a tokio interval completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        job().await;
    }
}
