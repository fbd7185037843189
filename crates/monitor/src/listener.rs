//! Signal dispatch loop.
//!
//! [`Listener`] drains the [`SignalReceiver`], filters signals through a
//! [`MatchRule`], and hands each matching signal to the [`Monitor`].
//! Signals are handled one at a time in queue order; the next one is not
//! taken until the monitor has finished with the current one. The loop
//! exits once every [`SignalBus`](faultled_bus::SignalBus) handle is
//! dropped and the queue is empty.

use faultled_bus::{MatchRule, SignalReceiver};

use crate::monitor::Monitor;

/// Counters reported when the listener shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub dispatched: u64,
    pub ignored: u64,
}

/// Background service feeding queued property-changed signals to a
/// [`Monitor`].
pub struct Listener;

impl Listener {
    /// Run the dispatch loop until the queue closes.
    pub async fn run(monitor: Monitor, rule: MatchRule, mut receiver: SignalReceiver) -> ListenerStats {
        let mut stats = ListenerStats::default();

        while let Some(signal) = receiver.recv().await {
            if !rule.matches(&signal) {
                tracing::debug!(
                    path = %signal.path,
                    interface = %signal.interface,
                    "Ignoring signal outside match rule"
                );
                stats.ignored += 1;
                continue;
            }
            monitor.on_properties_changed(&signal).await;
            stats.dispatched += 1;
        }

        tracing::info!("Signal queue closed, listener shutting down");
        stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
