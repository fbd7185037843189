use faultled_core::interfaces::{INVENTORY_ROOT, OPERATIONAL_STATUS_INTERFACE};

use crate::signal::PropertiesChanged;

/// Filter selecting which property-changed signals a subscriber handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    pub interface: String,
    /// Only objects at or below this path match. `/` matches everything.
    pub path_namespace: String,
}

impl MatchRule {
    pub fn new(interface: impl Into<String>, path_namespace: impl Into<String>) -> Self {
        let mut path_namespace: String = path_namespace.into();
        while path_namespace.len() > 1 && path_namespace.ends_with('/') {
            path_namespace.pop();
        }
        Self {
            interface: interface.into(),
            path_namespace,
        }
    }

    /// OperationalStatus changes on inventory objects below `namespace`.
    pub fn operational_status(namespace: impl Into<String>) -> Self {
        Self::new(OPERATIONAL_STATUS_INTERFACE, namespace)
    }

    pub fn matches(&self, signal: &PropertiesChanged) -> bool {
        signal.interface == self.interface && self.in_namespace(&signal.path)
    }

    fn in_namespace(&self, path: &str) -> bool {
        if self.path_namespace == "/" {
            return path.starts_with('/');
        }
        match path.strip_prefix(self.path_namespace.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl Default for MatchRule {
    fn default() -> Self {
        Self::operational_status(INVENTORY_ROOT)
    }
}
