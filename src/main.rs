use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use weblogic_eda::config::{load_config, EdaConfig};
use weblogic_eda::{ChangeEvent, EventQueue, SourceManager, StdoutQueue};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only events
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weblogic_eda=info".into()),
        )
        .init();

    info!("WebLogic EDA source starting...");

    // WL_EDA_CONFIG names a TOML file; otherwise a single source from WL_*
    let config = match std::env::var("WL_EDA_CONFIG") {
        Ok(path) => load_config(&path)?,
        Err(_) => EdaConfig::from_env()?,
    };

    for source in &config.sources {
        info!(
            source = %source.name,
            instance = %source.instance,
            interval_secs = source.interval_secs,
            "Configuration loaded"
        );
    }

    let (tx, mut rx) = mpsc::channel::<ChangeEvent>(config.queue_capacity);

    let mut manager = SourceManager::new(config.sources);
    let started = manager.start(Arc::new(tx)).await?;
    info!(loops_started = started, "Waiting for events...");

    // Stand-in consumer: print every event
    let stdout = StdoutQueue::new();
    let consumer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(e) = stdout.put(event).await {
                warn!(error = %e, "Failed to print event");
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    manager.shutdown().await;
    // All senders dropped with the loops, so the consumer drains and exits
    if let Err(e) = consumer.await {
        warn!(error = %e, "Event consumer task failed");
    }
    info!("WebLogic EDA source stopped");

    Ok(())
}
