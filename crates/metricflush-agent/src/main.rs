//! metricflush agent
//!
//! Reads one number per line from stdin and records each as a data point of a
//! single metric. Buffered points are flushed on EOF and on Ctrl-C.

mod config;
mod input;

use anyhow::Result;
use metricflush_aggregation::{create_data_point, MonitoringClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AgentConfig;
use crate::input::parse_sample;

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting metricflush agent v{}", AGENT_VERSION);

    // Load configuration
    let config = AgentConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let client = MonitoringClient::new(config.monitoring())?;
    let aggregation = client.start_aggregation(config.identity());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut recorded = 0u64;
    let mut rejected = 0u64;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                match parse_sample(&line) {
                    Some(Ok(value)) => {
                        aggregation.write(create_data_point(value)).await;
                        recorded += 1;
                    }
                    Some(Err(reason)) => {
                        warn!(%reason, "Skipping input line");
                        rejected += 1;
                    }
                    None => {}
                }
            }
            result = &mut shutdown => {
                result?;
                info!("Received shutdown signal");
                break;
            }
        }
    }

    aggregation.shutdown().await;
    info!(recorded, rejected, "Shutting down metricflush agent");
    Ok(())
}
