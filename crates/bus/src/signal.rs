//! Property-changed notifications and the in-process hub that carries them.
//!
//! [`SignalBus`] is a bounded single-consumer queue of [`PropertiesChanged`]
//! envelopes, backed by `tokio::sync::mpsc`. The notification source
//! publishes; the listener is the only receiver.

use faultled_core::{ObjectPath, PropertyMap, PropertyValue};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// PropertiesChanged
// ---------------------------------------------------------------------------

/// A property-changed signal emitted by the object at `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesChanged {
    /// Path of the object whose properties changed.
    pub path: ObjectPath,

    /// Interface the changed properties belong to.
    pub interface: String,

    /// Changed property names mapped to their new values.
    #[serde(default)]
    pub changed: PropertyMap,
}

impl PropertiesChanged {
    pub fn new(path: impl Into<ObjectPath>, interface: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            interface: interface.into(),
            changed: PropertyMap::new(),
        }
    }

    /// Add one changed property to the signal.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.changed.insert(name.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// SignalBus
// ---------------------------------------------------------------------------

/// Queue depth used by the daemon.
pub const DEFAULT_CAPACITY: usize = 64;

/// The listener side of the queue went away.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Signal queue closed, dropped signal for {path}")]
pub struct SignalBusClosed {
    pub path: ObjectPath,
}

/// Publishing half of the single-consumer signal queue.
///
/// Signals reach the one [`SignalReceiver`] in publish order and none are
/// dropped: once `capacity` signals are queued, [`publish`](Self::publish)
/// waits until the receiver takes one.
///
/// ```rust
/// use faultled_bus::SignalBus;
///
/// let (bus, rx) = SignalBus::channel(8);
/// drop(bus);
/// drop(rx);
/// ```
#[derive(Clone)]
pub struct SignalBus {
    sender: mpsc::Sender<PropertiesChanged>,
}

/// Receiving half of the signal queue, owned by the listener.
pub type SignalReceiver = mpsc::Receiver<PropertiesChanged>;

impl SignalBus {
    /// Create a queue holding at most `capacity` undelivered signals.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn channel(capacity: usize) -> (Self, SignalReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Queue a signal, waiting while the queue is full.
    pub async fn publish(&self, signal: PropertiesChanged) -> Result<(), SignalBusClosed> {
        self.sender
            .send(signal)
            .await
            .map_err(|mpsc::error::SendError(signal)| SignalBusClosed { path: signal.path })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn functional(path: &str, value: bool) -> PropertiesChanged {
        PropertiesChanged::new(path, "xyz.openbmc_project.State.Decorator.OperationalStatus")
            .with_property("Functional", value)
    }

    #[tokio::test]
    async fn delivers_in_publish_order() {
        let (bus, mut rx) = SignalBus::channel(4);

        bus.publish(functional("/inv/cpu0", false)).await.unwrap();
        bus.publish(functional("/inv/cpu1", true)).await.unwrap();
        bus.publish(functional("/inv/cpu0", true)).await.unwrap();
        drop(bus);

        let mut seen = Vec::new();
        while let Some(signal) = rx.recv().await {
            seen.push((signal.path, signal.changed["Functional"].as_bool()));
        }
        assert_eq!(
            seen,
            vec![
                ("/inv/cpu0".to_string(), Some(false)),
                ("/inv/cpu1".to_string(), Some(true)),
                ("/inv/cpu0".to_string(), Some(true)),
            ]
        );
    }

    #[tokio::test]
    async fn publish_waits_while_queue_is_full() {
        let (bus, mut rx) = SignalBus::channel(1);
        bus.publish(functional("/inv/fan0", false)).await.unwrap();

        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            bus.publish(functional("/inv/fan1", false)),
        )
        .await;
        assert!(blocked.is_err(), "publish should wait for queue space");

        assert_eq!(rx.recv().await.unwrap().path, "/inv/fan0");
        bus.publish(functional("/inv/fan1", false)).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().path, "/inv/fan1");
    }

    #[tokio::test]
    async fn publish_after_receiver_dropped_reports_path() {
        let (bus, rx) = SignalBus::channel(1);
        drop(rx);

        let err = bus.publish(functional("/inv/psu0", true)).await.unwrap_err();
        assert_eq!(err.path, "/inv/psu0");
    }

    #[test]
    fn envelope_parses_without_changed_map() {
        let signal: PropertiesChanged =
            serde_json::from_str(r#"{"path": "/inv/psu0", "interface": "iface"}"#).unwrap();
        assert!(signal.changed.is_empty());
    }
}
