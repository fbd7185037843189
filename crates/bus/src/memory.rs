//! In-process object tree implementing [`PropertyAccessor`].
//!
//! [`InMemoryObjects`] holds `path -> interface -> property -> value` and
//! behaves like a bus peer hosting those objects: reads of missing objects
//! or properties fail, and writes must match the existing property kind.
//! Every accepted write through [`PropertyAccessor::set_property`] is
//! appended to a journal.
//!
//! The tree can be seeded from a JSON snapshot whose shape is
//! [`ObjectTree`]:
//!
//! ```json
//! {
//!   "/xyz/openbmc_project/led/groups/cpu0_fault": {
//!     "xyz.openbmc_project.Led.Group": {
//!       "Asserted": { "type": "bool", "value": false }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use faultled_core::{BusError, DecodeError, ObjectPath, PropertyMap, PropertyValue};

use crate::accessor::PropertyAccessor;

/// Serializable object tree: path → interface → properties.
pub type ObjectTree = BTreeMap<ObjectPath, BTreeMap<String, PropertyMap>>;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// WriteRecord
// ---------------------------------------------------------------------------

/// One accepted property write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub path: ObjectPath,
    pub interface: String,
    pub property: String,
    pub value: PropertyValue,
}

// ---------------------------------------------------------------------------
// InMemoryObjects
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryObjects {
    objects: RwLock<ObjectTree>,
    journal: Mutex<Vec<WriteRecord>>,
}

impl InMemoryObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: ObjectTree) -> Self {
        Self {
            objects: RwLock::new(tree),
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Load the object tree from a JSON snapshot file.
    pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let tree: ObjectTree = serde_json::from_str(&raw)?;
        Ok(Self::from_tree(tree))
    }

    /// Owner-side update: create or overwrite a property without going
    /// through the bus surface. Not journaled.
    pub fn upsert_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
        value: impl Into<PropertyValue>,
    ) {
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        objects
            .entry(path.to_string())
            .or_default()
            .entry(interface.to_string())
            .or_default()
            .insert(property.to_string(), value.into());
    }

    /// Builder-style [`upsert_property`](Self::upsert_property).
    pub fn with_property(
        self,
        path: &str,
        interface: &str,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.upsert_property(path, interface, property, value);
        self
    }

    /// Current value of a property, if the object hosts it.
    pub fn property(&self, path: &str, interface: &str, property: &str) -> Option<PropertyValue> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .get(path)
            .and_then(|ifaces| ifaces.get(interface))
            .and_then(|props| props.get(property))
            .cloned()
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> ObjectTree {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every write accepted through the bus surface, in order.
    pub fn journal(&self) -> Vec<WriteRecord> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Journaled writes that targeted `path`.
    pub fn writes_to(&self, path: &str) -> Vec<WriteRecord> {
        self.journal()
            .into_iter()
            .filter(|w| w.path == path)
            .collect()
    }
}

#[async_trait]
impl PropertyAccessor for InMemoryObjects {
    async fn get_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<PropertyValue, BusError> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let ifaces = objects.get(path).ok_or_else(|| BusError::ObjectNotFound {
            path: path.to_string(),
        })?;
        ifaces
            .get(interface)
            .and_then(|props| props.get(property))
            .cloned()
            .ok_or_else(|| BusError::PropertyNotFound {
                path: path.to_string(),
                interface: interface.to_string(),
                property: property.to_string(),
            })
    }

    async fn set_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), BusError> {
        {
            let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
            let ifaces = objects
                .get_mut(path)
                .ok_or_else(|| BusError::ObjectNotFound {
                    path: path.to_string(),
                })?;
            let slot = ifaces
                .get_mut(interface)
                .and_then(|props| props.get_mut(property))
                .ok_or_else(|| BusError::PropertyNotFound {
                    path: path.to_string(),
                    interface: interface.to_string(),
                    property: property.to_string(),
                })?;

            if slot.kind() != value.kind() {
                return Err(DecodeError {
                    expected: slot.kind(),
                    actual: value.kind(),
                }
                .into());
            }
            *slot = value.clone();
        }

        tracing::debug!(path, interface, property, "Property written");

        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(WriteRecord {
                path: path.to_string(),
                interface: interface.to_string(),
                property: property.to_string(),
                value,
            });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
