//! Bus value model.
//!
//! Property values travel over the bus as variants. [`PropertyValue`] is the
//! closed set of shapes this system reads or writes, and every conversion
//! out of it is a checked decode returning [`DecodeError`] on a kind
//! mismatch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Bus object path, e.g. `/xyz/openbmc_project/inventory/system/chassis`.
pub type ObjectPath = String;

/// Changed-property map carried by a property-changed notification.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

// ---------------------------------------------------------------------------
// AssociationTuple
// ---------------------------------------------------------------------------

/// One `(forward, reverse, endpoint)` association record.
///
/// Equality is structural over all three fields. Serialized as a JSON
/// 3-element array to match the `a(sss)` wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "(String, String, ObjectPath)",
    into = "(String, String, ObjectPath)"
)]
pub struct AssociationTuple {
    pub forward: String,
    pub reverse: String,
    pub endpoint: ObjectPath,
}

impl AssociationTuple {
    pub fn new(
        forward: impl Into<String>,
        reverse: impl Into<String>,
        endpoint: impl Into<ObjectPath>,
    ) -> Self {
        Self {
            forward: forward.into(),
            reverse: reverse.into(),
            endpoint: endpoint.into(),
        }
    }
}

impl From<(String, String, ObjectPath)> for AssociationTuple {
    fn from((forward, reverse, endpoint): (String, String, ObjectPath)) -> Self {
        Self {
            forward,
            reverse,
            endpoint,
        }
    }
}

impl From<AssociationTuple> for (String, String, ObjectPath) {
    fn from(t: AssociationTuple) -> Self {
        (t.forward, t.reverse, t.endpoint)
    }
}

// ---------------------------------------------------------------------------
// PropertyValue
// ---------------------------------------------------------------------------

/// A bus property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Bool(bool),
    String(String),
    ObjectPaths(Vec<ObjectPath>),
    Associations(Vec<AssociationTuple>),
}

impl PropertyValue {
    /// Short name of the variant, used in decode errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::String(_) => "string",
            PropertyValue::ObjectPaths(_) => "object_paths",
            PropertyValue::Associations(_) => "associations",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Result<bool, DecodeError> {
        match self {
            PropertyValue::Bool(b) => Ok(b),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn into_object_paths(self) -> Result<Vec<ObjectPath>, DecodeError> {
        match self {
            PropertyValue::ObjectPaths(paths) => Ok(paths),
            other => Err(other.mismatch("object_paths")),
        }
    }

    pub fn into_associations(self) -> Result<Vec<AssociationTuple>, DecodeError> {
        match self {
            PropertyValue::Associations(list) => Ok(list),
            other => Err(other.mismatch("associations")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> DecodeError {
        DecodeError {
            expected,
            actual: self.kind(),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<Vec<ObjectPath>> for PropertyValue {
    fn from(paths: Vec<ObjectPath>) -> Self {
        PropertyValue::ObjectPaths(paths)
    }
}

impl From<Vec<AssociationTuple>> for PropertyValue {
    fn from(list: Vec<AssociationTuple>) -> Self {
        PropertyValue::Associations(list)
    }
}

/// Typed lookup of a boolean entry in a changed-property map.
///
/// Returns `Ok(None)` when `key` is absent and an error when it is present
/// with a non-boolean value.
pub fn lookup_bool(props: &PropertyMap, key: &str) -> Result<Option<bool>, DecodeError> {
    match props.get(key) {
        None => Ok(None),
        Some(value) => value.clone().into_bool().map(Some),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
