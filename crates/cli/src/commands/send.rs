//! `send` command implementation.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{DeliveryContext, EventSink, KubeEvent};
use observability::DeliveryAggregator;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::SendArgs;

/// An event file holds one event or an array of them
#[derive(Deserialize)]
#[serde(untagged)]
enum EventFile {
    Many(Vec<KubeEvent>),
    One(Box<KubeEvent>),
}

/// Execute the `send` command
pub async fn run_send(args: &SendArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let receiver = match &args.receiver {
        Some(name) => config
            .receiver(name)
            .with_context(|| format!("Receiver '{name}' not found in configuration"))?,
        None => config
            .receivers
            .first()
            .context("No receivers configured")?,
    };

    let events = load_events(&args.events)?;
    info!(receiver = %receiver.name, events = events.len(), "Events loaded");

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut sink = sinks::build_sink(receiver)?;

    let shutdown = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_signal(shutdown.clone()));

    let mut aggregator = DeliveryAggregator::new();
    for (path, event) in &events {
        if shutdown.is_cancelled() {
            warn!("Shutdown requested, remaining events skipped");
            break;
        }
        observability::record_event_received();

        let cx = delivery_context(args.timeout_ms, &shutdown);
        let started = Instant::now();
        let result = sink.send(event, &cx).await;
        aggregator.update(
            sinks::outcome_label(&result),
            started.elapsed().as_secs_f64() * 1000.0,
        );

        match result {
            Ok(()) => info!(
                file = %path.display(),
                event = %event.display_name(),
                "Marker delivered"
            ),
            // Keep going: one failed event does not block the rest.
            Err(e) => error!(
                file = %path.display(),
                event = %event.display_name(),
                error = %e,
                "Marker delivery failed"
            ),
        }
    }

    watcher.abort();
    sink.close().await?;

    let summary = aggregator.summary();
    println!("{}", summary);

    if summary.failed > 0 {
        anyhow::bail!("{} of {} events failed", summary.failed, summary.total);
    }
    Ok(())
}

fn delivery_context(timeout_ms: u64, shutdown: &CancellationToken) -> DeliveryContext {
    let cx = if timeout_ms == 0 {
        DeliveryContext::new()
    } else {
        DeliveryContext::with_timeout(Duration::from_millis(timeout_ms))
    };
    cx.cancel_token(shutdown.child_token())
}

/// Read every event file, keeping the file each event came from
fn load_events(paths: &[PathBuf]) -> Result<Vec<(PathBuf, KubeEvent)>> {
    let mut events = Vec::new();
    for path in paths {
        let parsed = read_event_file(path)?;
        match parsed {
            EventFile::Many(many) => {
                events.extend(many.into_iter().map(|event| (path.clone(), event)));
            }
            EventFile::One(one) => events.push((path.clone(), *one)),
        }
    }
    Ok(events)
}

fn read_event_file(path: &Path) -> Result<EventFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event file {}", path.display()))
}

/// Cancel in-flight deliveries on Ctrl+C or SIGTERM
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Received shutdown signal, cancelling deliveries");
    token.cancel();
}
