use crate::types::ObjectPath;

/// Failure of a remote property read or write.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Object not found: {path}")]
    ObjectNotFound { path: ObjectPath },

    #[error("Property not found: {interface}.{property} on {path}")]
    PropertyNotFound {
        path: ObjectPath,
        interface: String,
        property: String,
    },

    #[error("Bus call failed on {path}: {reason}")]
    CallFailed { path: ObjectPath, reason: String },

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// A bus value was present but did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {actual}")]
pub struct DecodeError {
    pub expected: &'static str,
    pub actual: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
