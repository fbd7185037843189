//! Well-known bus interface, property and path names.

use crate::types::{AssociationTuple, ObjectPath};

pub const OPERATIONAL_STATUS_INTERFACE: &str =
    "xyz.openbmc_project.State.Decorator.OperationalStatus";
pub const FUNCTIONAL_PROPERTY: &str = "Functional";

pub const ASSOCIATION_DEFINITIONS_INTERFACE: &str = "xyz.openbmc_project.Association.Definitions";
pub const ASSOCIATIONS_PROPERTY: &str = "Associations";

pub const ASSOCIATION_INTERFACE: &str = "xyz.openbmc_project.Association";
pub const ENDPOINTS_PROPERTY: &str = "endpoints";

pub const LED_GROUP_INTERFACE: &str = "xyz.openbmc_project.Led.Group";
pub const ASSERTED_PROPERTY: &str = "Asserted";

/// Root of the inventory object namespace.
pub const INVENTORY_ROOT: &str = "/xyz/openbmc_project/inventory";

pub const CHASSIS_PATH: &str = "/xyz/openbmc_project/inventory/system/chassis";

/// Leaf name of the association object binding an inventory object to its
/// fault indicator groups.
pub const FAULT_IDENTIFYING: &str = "fault_identifying";

pub const HEALTH_ROLLUP: &str = "health_rollup";
pub const CRITICAL: &str = "critical";

/// `("health_rollup", "critical", <chassis>)`: the chassis is critical
/// because of the object carrying this entry.
pub fn critical_association() -> AssociationTuple {
    AssociationTuple::new(HEALTH_ROLLUP, CRITICAL, CHASSIS_PATH)
}

/// Path of the fault-identifying association object for `inventory_path`.
pub fn fault_identifying_path(inventory_path: &str) -> ObjectPath {
    format!("{inventory_path}/{FAULT_IDENTIFYING}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_identifying_path_appends_leaf() {
        assert_eq!(
            fault_identifying_path("/xyz/openbmc_project/inventory/system/chassis/motherboard/cpu0"),
            "/xyz/openbmc_project/inventory/system/chassis/motherboard/cpu0/fault_identifying"
        );
    }

    #[test]
    fn critical_association_targets_chassis() {
        let a = critical_association();
        assert_eq!(a.forward, "health_rollup");
        assert_eq!(a.reverse, "critical");
        assert_eq!(a.endpoint, "/xyz/openbmc_project/inventory/system/chassis");
    }
}
