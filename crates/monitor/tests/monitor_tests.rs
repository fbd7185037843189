//! Integration tests for the operational status monitor.
//!
//! Drives [`Monitor`] through its public entry points against an
//! [`InMemoryObjects`] tree, wrapped where needed in a transport double
//! that records every call and fails reads or writes on chosen paths.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use faultled_bus::{InMemoryObjects, PropertiesChanged, PropertyAccessor};
use faultled_core::interfaces::{
    critical_association, fault_identifying_path, ASSERTED_PROPERTY, ASSOCIATIONS_PROPERTY,
    ASSOCIATION_DEFINITIONS_INTERFACE, ASSOCIATION_INTERFACE, CHASSIS_PATH, ENDPOINTS_PROPERTY,
    FUNCTIONAL_PROPERTY, LED_GROUP_INTERFACE, OPERATIONAL_STATUS_INTERFACE,
};
use faultled_core::platform::{PARTITION_SAI, PLATFORM_SAI};
use faultled_core::{AssociationTuple, BusError, Platform, PropertyValue};
use faultled_monitor::Monitor;

const DIMM: &str = "/xyz/openbmc_project/inventory/system/chassis/motherboard/dimm3";
const G1: &str = "/xyz/openbmc_project/led/groups/dimm3_fault";
const G2: &str = "/xyz/openbmc_project/led/groups/enclosure_fault";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Call recorded by [`RecordingBus`].
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Get { path: String, property: String },
    Set { path: String, property: String },
}

/// Transport double forwarding to an [`InMemoryObjects`] tree.
struct RecordingBus {
    inner: Arc<InMemoryObjects>,
    failing_reads: BTreeSet<String>,
    failing_writes: BTreeSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingBus {
    fn new(inner: Arc<InMemoryObjects>) -> Self {
        Self {
            inner,
            failing_reads: BTreeSet::new(),
            failing_writes: BTreeSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_reads_to(mut self, path: &str) -> Self {
        self.failing_reads.insert(path.to_string());
        self
    }

    fn failing_writes_to(mut self, path: &str) -> Self {
        self.failing_writes.insert(path.to_string());
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn reads_of(&self, property: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Get { property: p, .. } if p == property))
            .count()
    }

    fn write_attempts_to(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Set { path: p, .. } if p == path))
            .count()
    }
}

#[async_trait]
impl PropertyAccessor for RecordingBus {
    async fn get_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<PropertyValue, BusError> {
        self.calls.lock().unwrap().push(Call::Get {
            path: path.to_string(),
            property: property.to_string(),
        });
        if self.failing_reads.contains(path) {
            return Err(BusError::CallFailed {
                path: path.to_string(),
                reason: "org.freedesktop.DBus.Error.NoReply".to_string(),
            });
        }
        self.inner.get_property(path, interface, property).await
    }

    async fn set_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), BusError> {
        self.calls.lock().unwrap().push(Call::Set {
            path: path.to_string(),
            property: property.to_string(),
        });
        if self.failing_writes.contains(path) {
            return Err(BusError::CallFailed {
                path: path.to_string(),
                reason: "org.freedesktop.DBus.Error.AccessDenied".to_string(),
            });
        }
        self.inner.set_property(path, interface, property, value).await
    }
}

/// Inventory object bound to `groups`, each group initially deasserted.
fn inventory(groups: &[&str], entries: Vec<AssociationTuple>) -> Arc<InMemoryObjects> {
    let mut objects = InMemoryObjects::new()
        .with_property(DIMM, OPERATIONAL_STATUS_INTERFACE, FUNCTIONAL_PROPERTY, true)
        .with_property(
            DIMM,
            ASSOCIATION_DEFINITIONS_INTERFACE,
            ASSOCIATIONS_PROPERTY,
            entries,
        );

    if !groups.is_empty() {
        objects = objects.with_property(
            &fault_identifying_path(DIMM),
            ASSOCIATION_INTERFACE,
            ENDPOINTS_PROPERTY,
            groups.iter().map(|g| g.to_string()).collect::<Vec<_>>(),
        );
    }
    for group in groups {
        objects = objects.with_property(group, LED_GROUP_INTERFACE, ASSERTED_PROPERTY, false);
    }
    Arc::new(objects)
}

fn asserted(objects: &InMemoryObjects, group: &str) -> Option<bool> {
    objects
        .property(group, LED_GROUP_INTERFACE, ASSERTED_PROPERTY)
        .and_then(|v| v.as_bool())
}

fn associations(objects: &InMemoryObjects) -> Vec<AssociationTuple> {
    objects
        .property(DIMM, ASSOCIATION_DEFINITIONS_INTERFACE, ASSOCIATIONS_PROPERTY)
        .expect("associations should exist")
        .into_associations()
        .expect("associations should decode")
}

// ---------------------------------------------------------------------------
// Test: recovery and failure scenarios
// ---------------------------------------------------------------------------

/// Functional false → true with one bound group and no critical association:
/// the group is deasserted and the no-op retraction writes nothing.
#[tokio::test]
async fn recovery_deasserts_single_group() {
    let objects = inventory(&[G1], Vec::new());
    objects.upsert_property(G1, LED_GROUP_INTERFACE, ASSERTED_PROPERTY, true);
    let monitor = Monitor::new(objects.clone());

    monitor.on_functional_changed(DIMM, true).await;

    assert_eq!(asserted(&objects, G1), Some(false));
    assert!(associations(&objects).is_empty());
    assert!(objects.writes_to(DIMM).is_empty());
}

/// Functional true → false with two bound groups: both are asserted and
/// the association collection is never read.
#[tokio::test]
async fn failure_asserts_every_bound_group_without_retraction() {
    let objects = inventory(&[G1, G2], vec![critical_association()]);
    let bus = Arc::new(RecordingBus::new(objects.clone()));
    let monitor = Monitor::new(bus.clone());

    monitor.on_functional_changed(DIMM, false).await;

    assert_eq!(asserted(&objects, G1), Some(true));
    assert_eq!(asserted(&objects, G2), Some(true));
    assert_eq!(bus.reads_of(ASSOCIATIONS_PROPERTY), 0);
    assert_eq!(associations(&objects), vec![critical_association()]);
}

/// A failed write to the first group does not stop the second.
#[tokio::test]
async fn failed_write_does_not_stop_fan_out() {
    let objects = inventory(&[G1, G2], Vec::new());
    let bus = Arc::new(RecordingBus::new(objects.clone()).failing_writes_to(G1));
    let monitor = Monitor::new(bus.clone());

    monitor.on_functional_changed(DIMM, false).await;

    assert_eq!(bus.write_attempts_to(G1), 1);
    assert_eq!(bus.write_attempts_to(G2), 1);
    assert_eq!(asserted(&objects, G1), Some(false));
    assert_eq!(asserted(&objects, G2), Some(true));
}

// ---------------------------------------------------------------------------
// Test: critical association retraction
// ---------------------------------------------------------------------------

/// Recovery removes exactly the chassis critical entry and keeps the rest.
#[tokio::test]
async fn recovery_removes_only_chassis_critical_entry() {
    let chassis = AssociationTuple::new("chassis", "all_sensors", CHASSIS_PATH);
    let warning = AssociationTuple::new("health_rollup", "warning", CHASSIS_PATH);
    let objects = inventory(
        &[G1],
        vec![chassis.clone(), critical_association(), warning.clone()],
    );
    let monitor = Monitor::new(objects.clone());

    monitor.on_functional_changed(DIMM, true).await;

    assert_eq!(associations(&objects), vec![chassis, warning]);
}

/// Only the first of duplicated critical entries is removed per call.
#[tokio::test]
async fn retraction_removes_first_match_only() {
    let objects = inventory(&[], vec![critical_association(), critical_association()]);
    let monitor = Monitor::new(objects.clone());

    monitor.retract_critical_association(DIMM).await;

    assert_eq!(associations(&objects), vec![critical_association()]);
}

/// Retracting twice leaves the same collection as retracting once.
#[tokio::test]
async fn retraction_is_idempotent() {
    let other = AssociationTuple::new("inventory", "led", G1);
    let objects = inventory(&[], vec![other.clone(), critical_association()]);
    let monitor = Monitor::new(objects.clone());

    monitor.retract_critical_association(DIMM).await;
    let after_first = associations(&objects);
    monitor.retract_critical_association(DIMM).await;

    assert_eq!(associations(&objects), after_first);
    assert_eq!(after_first, vec![other]);
    assert_eq!(objects.writes_to(DIMM).len(), 1);
}

/// A failed association write is swallowed and the LED is still driven.
#[tokio::test]
async fn failed_retraction_write_still_drives_leds() {
    let objects = inventory(&[G1], vec![critical_association()]);
    objects.upsert_property(G1, LED_GROUP_INTERFACE, ASSERTED_PROPERTY, true);
    let bus = Arc::new(RecordingBus::new(objects.clone()).failing_writes_to(DIMM));
    let monitor = Monitor::new(bus.clone());

    monitor.on_functional_changed(DIMM, true).await;

    assert_eq!(associations(&objects), vec![critical_association()]);
    assert_eq!(asserted(&objects, G1), Some(false));
}

/// A failed read of the association collection skips the retraction and
/// still drives the LED.
#[tokio::test]
async fn failed_association_read_is_swallowed() {
    let objects = inventory(&[G1], vec![critical_association()]);
    objects.upsert_property(G1, LED_GROUP_INTERFACE, ASSERTED_PROPERTY, true);
    let bus = Arc::new(RecordingBus::new(objects.clone()).failing_reads_to(DIMM));
    let monitor = Monitor::new(bus.clone());

    monitor.on_functional_changed(DIMM, true).await;

    assert_eq!(bus.reads_of(ASSOCIATIONS_PROPERTY), 1);
    assert_eq!(bus.write_attempts_to(DIMM), 0);
    assert_eq!(associations(&objects), vec![critical_association()]);
    assert_eq!(asserted(&objects, G1), Some(false));
}

// ---------------------------------------------------------------------------
// Test: bindings and exclusions
// ---------------------------------------------------------------------------

/// Without a fault-identifying binding no LED group is touched.
#[tokio::test]
async fn unbound_object_writes_no_led_group() {
    let objects = inventory(&[], Vec::new());
    let bus = Arc::new(RecordingBus::new(objects.clone()));
    let monitor = Monitor::new(bus.clone());

    monitor.on_functional_changed(DIMM, false).await;
    monitor.on_functional_changed(DIMM, true).await;

    let led_writes = bus
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Set { property, .. } if property == ASSERTED_PROPERTY))
        .count();
    assert_eq!(led_writes, 0);
}

/// A failed read of the binding yields no groups and no LED writes.
#[tokio::test]
async fn failed_binding_read_yields_no_groups() {
    let objects = inventory(&[G1, G2], Vec::new());
    let bus = Arc::new(
        RecordingBus::new(objects.clone()).failing_reads_to(&fault_identifying_path(DIMM)),
    );
    let monitor = Monitor::new(bus.clone());

    assert!(monitor.find_indicator_groups(DIMM).await.is_empty());

    monitor.on_functional_changed(DIMM, false).await;

    assert_eq!(bus.reads_of(ENDPOINTS_PROPERTY), 2);
    assert!(!bus.calls().iter().any(|c| matches!(c, Call::Set { .. })));
    assert_eq!(asserted(&objects, G1), Some(false));
    assert_eq!(asserted(&objects, G2), Some(false));
}

/// Platform-reserved groups are never written, whatever the Functional value.
#[tokio::test]
async fn excluded_groups_are_never_written() {
    let objects = inventory(&[G1, PARTITION_SAI, PLATFORM_SAI], Vec::new());
    let bus = Arc::new(RecordingBus::new(objects.clone()));
    let monitor =
        Monitor::new(bus.clone()).with_excluded_groups(Platform::IbmSai.reserved_groups().iter().copied());

    monitor.on_functional_changed(DIMM, false).await;
    monitor.on_functional_changed(DIMM, true).await;

    assert_eq!(bus.write_attempts_to(PARTITION_SAI), 0);
    assert_eq!(bus.write_attempts_to(PLATFORM_SAI), 0);
    assert_eq!(bus.write_attempts_to(G1), 2);
    assert_eq!(asserted(&objects, PARTITION_SAI), Some(false));
}

// ---------------------------------------------------------------------------
// Test: repeated input and signal decoding
// ---------------------------------------------------------------------------

/// Repeating the same Functional value converges to the same Asserted value.
#[tokio::test]
async fn repeated_identical_input_converges() {
    let objects = inventory(&[G1, G2], Vec::new());
    let monitor = Monitor::new(objects.clone());

    for _ in 0..3 {
        monitor.on_functional_changed(DIMM, false).await;
        assert_eq!(asserted(&objects, G1), Some(true));
        assert_eq!(asserted(&objects, G2), Some(true));
    }
    for _ in 0..3 {
        monitor.on_functional_changed(DIMM, true).await;
        assert_eq!(asserted(&objects, G1), Some(false));
        assert_eq!(asserted(&objects, G2), Some(false));
    }
}

/// A mistyped Functional value is dropped before any bus call.
#[tokio::test]
async fn mistyped_functional_makes_no_bus_calls() {
    let objects = inventory(&[G1], vec![critical_association()]);
    let bus = Arc::new(RecordingBus::new(objects.clone()));
    let monitor = Monitor::new(bus.clone());

    let signal = PropertiesChanged::new(DIMM, OPERATIONAL_STATUS_INTERFACE)
        .with_property(FUNCTIONAL_PROPERTY, vec![G1.to_string()]);
    monitor.on_properties_changed(&signal).await;

    assert!(bus.calls().is_empty());
}

/// A boolean Functional value in the signal drives the full reconciliation.
#[tokio::test]
async fn functional_signal_drives_reconciliation() {
    let objects = inventory(&[G1], vec![critical_association()]);
    objects.upsert_property(G1, LED_GROUP_INTERFACE, ASSERTED_PROPERTY, true);
    let monitor = Monitor::new(objects.clone());

    let signal = PropertiesChanged::new(DIMM, OPERATIONAL_STATUS_INTERFACE)
        .with_property(FUNCTIONAL_PROPERTY, true);
    monitor.on_properties_changed(&signal).await;

    assert!(associations(&objects).is_empty());
    assert_eq!(asserted(&objects, G1), Some(false));
}
