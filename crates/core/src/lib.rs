//! Shared vocabulary for the fault-LED operational status monitor.
//!
//! - [`types`] — the bus value model ([`PropertyValue`], [`AssociationTuple`]).
//! - [`interfaces`] — well-known interface, property and path names.
//! - [`error`] — transport and decode error types.
//! - [`platform`] — platform presets for indicator groups driven elsewhere.

pub mod error;
pub mod interfaces;
pub mod platform;
pub mod types;

pub use error::{BusError, DecodeError, UnknownPlatform};
pub use platform::Platform;
pub use types::{AssociationTuple, ObjectPath, PropertyMap, PropertyValue};
