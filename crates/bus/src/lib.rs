//! Bus transport surface consumed by the fault monitor.
//!
//! - [`PropertyAccessor`] — generic get/set of remote object properties.
//! - [`PropertiesChanged`] / [`SignalBus`] — property-changed notifications
//!   and the bounded in-process queue that carries them to the listener.
//! - [`MatchRule`] — interface + path-namespace filter for notifications.
//! - [`InMemoryObjects`] — in-process object tree implementing
//!   [`PropertyAccessor`], used by tests and the simulator daemon.

pub mod accessor;
pub mod match_rule;
pub mod memory;
pub mod signal;

pub use accessor::PropertyAccessor;
pub use match_rule::MatchRule;
pub use memory::{InMemoryObjects, ObjectTree, SnapshotError, WriteRecord};
pub use signal::{PropertiesChanged, SignalBus, SignalBusClosed, SignalReceiver};
