// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load .env (if any), parse command-line arguments, set up logging
// 2. Build the configuration once; anything missing is fatal right here
// 3. Wire the SMTP notifier and S3 archiver into a Monitor
// 4. Dispatch to the subcommand (serve / run)
// 5. Exit with proper code (0 = all online, 1 = offline pages, 2 = error)
// =============================================================================

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use std::sync::Arc;
use tracing::{error, info, warn};

use site_monitor::checker::{PageResult, PageStatus};
use site_monitor::cli::{Cli, Commands};
use site_monitor::config::{parse_seed, Config};
use site_monitor::logging::init_logging;
use site_monitor::monitor::{Monitor, RunResult, S3Archiver, SmtpNotifier};
use site_monitor::server::{self, AppState};

#[tokio::main]
async fn main() {
    // A missing .env file is normal in production
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: failed to initialise logging: {}", e);
        std::process::exit(2);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no offline pages
//   Ok(1) = offline pages found (run command only)
//   Err   = configuration or startup failure
async fn run(cli: Cli) -> Result<i32> {
    let config = Config::from_env()?;
    let monitor = Arc::new(build_monitor(&config)?);

    match cli.command {
        Commands::Serve { addr, no_schedule } => {
            handle_serve(&config, monitor, addr, no_schedule).await
        }
        Commands::Run {
            base_url,
            max_depth,
            json,
        } => {
            let base_url = match base_url {
                Some(raw) => parse_seed(&raw)?,
                None => config.default_base_url.clone(),
            };
            let max_depth = max_depth.unwrap_or(config.default_max_depth);

            let run = monitor.run(&base_url, max_depth).await?;
            print_results(&run, json)?;

            Ok(if run.has_offline_pages() { 1 } else { 0 })
        }
    }
}

fn build_monitor(config: &Config) -> Result<Monitor> {
    let notifier = SmtpNotifier::new(&config.smtp, config.request_timeout)?;
    let archiver = S3Archiver::new(&config.archive)?;
    Ok(Monitor::from_config(
        config,
        Arc::new(notifier),
        Arc::new(archiver),
    ))
}

async fn handle_serve(
    config: &Config,
    monitor: Arc<Monitor>,
    addr: Option<std::net::SocketAddr>,
    no_schedule: bool,
) -> Result<i32> {
    if config.schedule.enabled && !no_schedule {
        tokio::spawn(server::run_schedule(
            monitor.clone(),
            config.schedule.clone(),
        ));
    } else {
        info!("scheduled monitoring disabled");
    }

    let state = AppState {
        monitor,
        default_base_url: config.default_base_url.clone(),
        default_max_depth: config.default_max_depth,
    };

    server::serve(addr.unwrap_or(config.listen_addr), state).await?;
    warn!("server exited");
    Ok(0)
}

// Prints the results either as a table or JSON
fn print_results(run: &RunResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(run)?);
    } else {
        print_table(&run.results);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[PageResult]) {
    println!("{:<60} {:<10} {:<30}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(100));

    for result in results {
        let status = match result.status {
            PageStatus::Online => "ONLINE",
            PageStatus::Offline => "OFFLINE",
        };
        let detail = match (&result.error, result.code) {
            (Some(error), _) => error.clone(),
            (None, Some(code)) => format!("HTTP {}", code),
            (None, None) => String::new(),
        };

        // Truncate URL if too long for display
        let url_display = if result.url.chars().count() > 57 {
            format!("{}...", result.url.chars().take(57).collect::<String>())
        } else {
            result.url.clone()
        };

        println!("{:<60} {:<10} {:<30}", url_display, status, detail);
    }

    println!();

    let online = results.iter().filter(|r| r.is_online()).count();
    println!("Summary:");
    println!("   Online:  {}", online);
    println!("   Offline: {}", results.len() - online);
    println!("   Total:   {}", results.len());
}
