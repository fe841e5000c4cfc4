use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use jwt_token_agent::cache::TokenIssuer;
use jwt_token_agent::config::proc_loader::issuer_config;
use jwt_token_agent::config::settings::FileSinkConfig;
use jwt_token_agent::helpers::jwt::log_token;
use jwt_token_agent::observability::metrics::IssuerMetrics;
use jwt_token_agent::sinks::file_sink::FileSink;
use jwt_token_agent::utils::config_loader;
use jwt_token_agent::utils::logging::{self, LogLevel};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{interval, MissedTickBehavior};
use tokio::select;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "jwt-token-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// log the decoded header kid and claims of the issued token
    #[arg(long)]
    print_claims: bool,
    /// keep the token in `sink.path` fresh until SIGINT / SIGTERM
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, start logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config)?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build the issuer (no key parsing yet)
    // -------------------------------

    let metrics = Arc::new(IssuerMetrics::new()?);
    let issuer = TokenIssuer::with_metrics(issuer_config(&service_config)?, metrics.clone())?;

    if !args.watch {
        let token = issuer.bearer_token()?;
        if args.print_claims {
            log_token(&token)?;
        }
        log_metrics(&metrics);
        println!("{}", token);
        return Ok(());
    }

    // -------------------------------
    // 3. Watch mode: keep the file sink fresh
    // -------------------------------

    let sink_config = service_config
        .sink
        .as_ref()
        .ok_or_else(|| anyhow!("--watch requires a 'sink' block in the config"))?;
    run_watch(&issuer, &metrics, sink_config, args.print_claims).await
}

async fn run_watch(
    issuer: &TokenIssuer,
    metrics: &IssuerMetrics,
    cfg: &FileSinkConfig,
    print_claims: bool,
) -> Result<()> {
    let mut sink = FileSink::new(cfg);
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut ticker = interval(Duration::from_secs(cfg.refresh_interval_seconds));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Service starting...");
    loop {
        select! {
            _ = ticker.tick() => {
                // failures are retried on the next tick
                sink.refresh(issuer, print_claims).await;
                log_metrics(metrics);
            }
            _ = sigint.recv() => {
                info!("Received SIGINT (Ctrl+C). Initiating graceful shutdown...");
                break;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM. Initiating graceful shutdown...");
                break;
            }
        }
    }

    sink.remove().await?;
    Ok(())
}

fn log_metrics(metrics: &IssuerMetrics) {
    match metrics.render() {
        Ok(text) => debug!("{}", text),
        Err(e) => error!("failed to render metrics: {:#}", e),
    }
}
