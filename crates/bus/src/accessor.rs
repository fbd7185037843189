use std::sync::Arc;

use async_trait::async_trait;
use faultled_core::{BusError, PropertyValue};

/// Generic property get/set on remote bus objects.
///
/// Every call is a round trip that may fail (missing object, permission,
/// transport). Implementations do not retry.
#[async_trait]
pub trait PropertyAccessor: Send + Sync {
    /// Read `interface.property` on the object at `path`.
    async fn get_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<PropertyValue, BusError>;

    /// Write `interface.property` on the object at `path`.
    async fn set_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), BusError>;
}

#[async_trait]
impl<T: PropertyAccessor + ?Sized> PropertyAccessor for Arc<T> {
    async fn get_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
    ) -> Result<PropertyValue, BusError> {
        (**self).get_property(path, interface, property).await
    }

    async fn set_property(
        &self,
        path: &str,
        interface: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), BusError> {
        (**self).set_property(path, interface, property, value).await
    }
}
