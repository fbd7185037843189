//! `faultled-monitor` -- operational status to fault LED daemon.
//!
//! Hosts an in-memory object tree (optionally seeded from a JSON snapshot),
//! reads property-changed notifications as JSON lines from stdin, and lets
//! the [`Monitor`] reconcile fault LED groups and chassis critical
//! associations for every OperationalStatus change. Logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable                       | Default                          | Description                               |
//! |--------------------------------|----------------------------------|-------------------------------------------|
//! | `FAULTLED_PLATFORM`            | `generic`                        | Exclusion preset (`generic`, `ibm-sai`)   |
//! | `FAULTLED_EXCLUDED_GROUPS`     | --                               | Extra comma-separated excluded LED groups |
//! | `FAULTLED_INVENTORY_NAMESPACE` | `/xyz/openbmc_project/inventory` | Monitored inventory namespace             |
//! | `FAULTLED_SNAPSHOT`            | --                               | JSON object tree to start from            |
//! | `FAULTLED_DUMP_STATE`          | `false`                          | Print the final object tree to stdout     |

use std::sync::Arc;

use anyhow::Context;
use faultled_bus::signal::DEFAULT_CAPACITY;
use faultled_bus::{InMemoryObjects, SignalBus};
use faultled_monitor::{feed, Listener, Monitor, MonitorConfig};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faultled_monitor=info,faultled_bus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = MonitorConfig::from_env().context("Invalid configuration")?;

    let objects = match &config.snapshot {
        Some(path) => InMemoryObjects::load_snapshot(path)
            .await
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?,
        None => InMemoryObjects::new(),
    };
    let objects = Arc::new(objects);

    let excluded = config.excluded_groups();
    tracing::info!(
        platform = config.platform.as_str(),
        excluded_groups = excluded.len(),
        namespace = %config.inventory_namespace,
        "Starting faultled-monitor",
    );

    let monitor = Monitor::new(objects.clone()).with_excluded_groups(excluded);
    let (bus, receiver) = SignalBus::channel(DEFAULT_CAPACITY);
    let listener = tokio::spawn(Listener::run(monitor, config.match_rule(), receiver));

    let published = feed::pump(BufReader::new(tokio::io::stdin()), &objects, &bus).await?;
    tracing::info!(published, "Notification feed exhausted");

    drop(bus);
    let stats = listener.await.context("Listener task failed")?;
    tracing::info!(
        dispatched = stats.dispatched,
        ignored = stats.ignored,
        "Listener stopped",
    );

    if config.dump_state {
        println!("{}", serde_json::to_string_pretty(&objects.snapshot())?);
    }

    Ok(())
}
