//! Operational status → fault indicator reconciliation.
//!
//! [`Monitor`] reacts to a change of an inventory object's `Functional`
//! property. On recovery it retracts the chassis critical health-rollup
//! association, then drives every indicator group bound to the object
//! through its `fault_identifying` association to `Asserted = !functional`.
//!
//! The monitor holds no state between events. Every remote failure is
//! logged where it happens and swallowed; no operation here returns an
//! error to its caller.

use std::collections::BTreeSet;
use std::sync::Arc;

use faultled_bus::{PropertiesChanged, PropertyAccessor};
use faultled_core::interfaces::{
    critical_association, fault_identifying_path, ASSERTED_PROPERTY,
    ASSOCIATIONS_PROPERTY, ASSOCIATION_DEFINITIONS_INTERFACE, ASSOCIATION_INTERFACE,
    ENDPOINTS_PROPERTY, FUNCTIONAL_PROPERTY, LED_GROUP_INTERFACE,
};
use faultled_core::types::lookup_bool;
use faultled_core::{BusError, ObjectPath, PropertyValue};

/// Reconciles fault indicator groups with inventory `Functional` changes.
///
/// Remote state is reached only through the [`PropertyAccessor`] handed to
/// [`Monitor::new`]. Groups added with
/// [`with_excluded_groups`](Self::with_excluded_groups) are never written.
pub struct Monitor {
    bus: Arc<dyn PropertyAccessor>,
    /// Indicator groups driven by some other service; never written here.
    excluded_groups: BTreeSet<ObjectPath>,
}

impl Monitor {
    pub fn new(bus: Arc<dyn PropertyAccessor>) -> Self {
        Self {
            bus,
            excluded_groups: BTreeSet::new(),
        }
    }

    pub fn with_excluded_groups<I, P>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ObjectPath>,
    {
        self.excluded_groups
            .extend(groups.into_iter().map(Into::into));
        self
    }

    /// Decode an OperationalStatus property-changed signal and react to it.
    ///
    /// Signals without a `Functional` entry are ignored. A `Functional`
    /// entry that is not a boolean is logged and the signal is dropped.
    pub async fn on_properties_changed(&self, signal: &PropertiesChanged) {
        match lookup_bool(&signal.changed, FUNCTIONAL_PROPERTY) {
            Ok(Some(functional)) => self.on_functional_changed(&signal.path, functional).await,
            Ok(None) => {
                tracing::debug!(path = %signal.path, "Signal carries no Functional property");
            }
            Err(e) => {
                tracing::error!(
                    path = %signal.path,
                    error = %e,
                    "Failed to get the Functional property"
                );
            }
        }
    }

    /// React to `inventory_path` becoming functional or non-functional.
    pub async fn on_functional_changed(&self, inventory_path: &str, functional: bool) {
        tracing::debug!(path = inventory_path, functional, "Functional changed");

        if functional {
            self.retract_critical_association(inventory_path).await;
        }

        let groups = self.find_indicator_groups(inventory_path).await;
        if groups.is_empty() {
            tracing::info!(
                path = inventory_path,
                "Inventory object is not associated with any LED group"
            );
            return;
        }

        self.assert_indicator_groups(&groups, functional).await;
    }

    /// Remove the chassis critical association from `inventory_path`.
    ///
    /// Only the first structurally equal entry is removed. No match is a
    /// no-op; failures are logged and swallowed.
    pub async fn retract_critical_association(&self, inventory_path: &str) {
        match self.try_retract(inventory_path).await {
            Ok(true) => {
                tracing::info!(
                    path = inventory_path,
                    "Removed chassis critical association"
                );
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(
                    path = inventory_path,
                    error = %e,
                    "Failed to remove chassis critical association"
                );
            }
        }
    }

    async fn try_retract(&self, inventory_path: &str) -> Result<bool, BusError> {
        let mut associations = self
            .bus
            .get_property(
                inventory_path,
                ASSOCIATION_DEFINITIONS_INTERFACE,
                ASSOCIATIONS_PROPERTY,
            )
            .await?
            .into_associations()?;

        let critical = critical_association();
        let Some(pos) = associations.iter().position(|a| *a == critical) else {
            return Ok(false);
        };
        associations.remove(pos);

        self.bus
            .set_property(
                inventory_path,
                ASSOCIATION_DEFINITIONS_INTERFACE,
                ASSOCIATIONS_PROPERTY,
                PropertyValue::Associations(associations),
            )
            .await?;
        Ok(true)
    }

    /// Indicator groups bound to `inventory_path`, in endpoint order.
    ///
    /// An absent binding and a failed read both yield an empty list.
    pub async fn find_indicator_groups(&self, inventory_path: &str) -> Vec<ObjectPath> {
        let binding = fault_identifying_path(inventory_path);

        let endpoints = self
            .bus
            .get_property(&binding, ASSOCIATION_INTERFACE, ENDPOINTS_PROPERTY)
            .await
            .and_then(|value| value.into_object_paths().map_err(BusError::from));

        match endpoints {
            Ok(paths) => paths,
            Err(BusError::ObjectNotFound { .. }) => {
                tracing::debug!(path = %binding, "No fault identifying association");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(
                    path = %binding,
                    error = %e,
                    "Failed to get endpoints property"
                );
                Vec::new()
            }
        }
    }

    /// Set `Asserted = !functional` on every non-excluded group.
    ///
    /// Each write is attempted independently; a failure is logged and the
    /// remaining groups are still written.
    pub async fn assert_indicator_groups(&self, groups: &[ObjectPath], functional: bool) {
        let asserted = !functional;

        for path in groups {
            if self.excluded_groups.contains(path) {
                tracing::debug!(path = %path, "Skipping excluded LED group");
                continue;
            }

            if let Err(e) = self
                .bus
                .set_property(
                    path,
                    LED_GROUP_INTERFACE,
                    ASSERTED_PROPERTY,
                    PropertyValue::Bool(asserted),
                )
                .await
            {
                tracing::error!(path = %path, error = %e, "Failed to set Asserted property");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
