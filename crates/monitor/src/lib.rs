//! `faultled-monitor` library crate.
//!
//! Re-exports the monitor and its plumbing for integration testing. The
//! binary entrypoint lives in `main.rs`.

pub mod config;
pub mod feed;
pub mod listener;
pub mod monitor;

pub use config::{ConfigError, MonitorConfig};
pub use listener::{Listener, ListenerStats};
pub use monitor::Monitor;
