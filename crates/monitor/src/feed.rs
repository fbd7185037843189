//! Newline-delimited JSON notification feed for the simulator daemon.
//!
//! Each non-blank line is either a full envelope
//!
//! ```json
//! {"path": "/xyz/openbmc_project/inventory/system/chassis/fan0",
//!  "interface": "xyz.openbmc_project.State.Decorator.OperationalStatus",
//!  "changed": {"Functional": {"type": "bool", "value": false}}}
//! ```
//!
//! or the shorthand `{"path": "...", "functional": false}`. Lines starting
//! with `#` are comments.
//!
//! [`pump`] plays the role of the inventory manager: it records a boolean
//! `Functional` change on the owning object before publishing the signal.

use faultled_bus::{InMemoryObjects, PropertiesChanged, SignalBus, SignalBusClosed};
use faultled_core::interfaces::{FUNCTIONAL_PROPERTY, OPERATIONAL_STATUS_INTERFACE};
use faultled_core::types::lookup_bool;
use faultled_core::ObjectPath;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Invalid notification on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read notification feed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Closed(#[from] SignalBusClosed),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedLine {
    Envelope(PropertiesChanged),
    Functional { path: ObjectPath, functional: bool },
}

impl From<FeedLine> for PropertiesChanged {
    fn from(line: FeedLine) -> Self {
        match line {
            FeedLine::Envelope(signal) => signal,
            FeedLine::Functional { path, functional } => {
                PropertiesChanged::new(path, OPERATIONAL_STATUS_INTERFACE)
                    .with_property(FUNCTIONAL_PROPERTY, functional)
            }
        }
    }
}

/// Parse one feed line. Blank and comment lines yield `Ok(None)`.
pub fn parse_line(raw: &str, line: usize) -> Result<Option<PropertiesChanged>, FeedError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str::<FeedLine>(trimmed)
        .map(|parsed| Some(parsed.into()))
        .map_err(|source| FeedError::Parse { line, source })
}

/// Record a `Functional` change on the emitting object.
///
/// Only a boolean `Functional` on the OperationalStatus interface is
/// mirrored. Anything else leaves the owner untouched; the signal is still
/// published so the monitor sees and reports it.
pub fn apply_to_owner(objects: &InMemoryObjects, signal: &PropertiesChanged) {
    if signal.interface != OPERATIONAL_STATUS_INTERFACE {
        return;
    }
    match lookup_bool(&signal.changed, FUNCTIONAL_PROPERTY) {
        Ok(Some(functional)) => objects.upsert_property(
            &signal.path,
            OPERATIONAL_STATUS_INTERFACE,
            FUNCTIONAL_PROPERTY,
            functional,
        ),
        Ok(None) => {}
        Err(e) => {
            tracing::debug!(path = %signal.path, error = %e, "Not recording Functional on owner");
        }
    }
}

/// Read the feed to EOF, publishing every valid notification.
///
/// Malformed lines are logged and skipped. Publishing waits while the
/// signal queue is full. Returns the number of signals published.
pub async fn pump<R>(
    reader: R,
    objects: &InMemoryObjects,
    bus: &SignalBus,
) -> Result<usize, FeedError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;
    let mut published = 0;

    while let Some(raw) = lines.next_line().await? {
        line_no += 1;
        match parse_line(&raw, line_no) {
            Ok(Some(signal)) => {
                apply_to_owner(objects, &signal);
                bus.publish(signal).await?;
                published += 1;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping notification"),
        }
    }

    Ok(published)
}
