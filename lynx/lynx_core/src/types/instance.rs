//! Instance handles: the result of constructing a discovered class.
//!
//! Construction produces an opaque payload plus the capability the class was
//! requested under (if any). The caller performs the typed cast, which fails
//! loudly with a [`ConstructionError`] rather than succeeding silently with
//! the wrong shape.

use std::any::Any;
use std::fmt;

use crate::error::{ConstructionError, Error};
use crate::id::InstanceId;
use crate::types::meta::CapabilityRef;

/// A freshly constructed instance of a discovered class.
///
/// Instances are never cached by the discovery engine; every construction
/// call produces a new handle with a new [`InstanceId`].
pub struct Instance {
    id: InstanceId,
    class: String,
    requested: Option<CapabilityRef>,
    payload: Box<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wrap a constructor's output.
    pub fn new(
        class: impl Into<String>,
        requested: Option<CapabilityRef>,
        payload: Box<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            id: InstanceId::new(),
            class: class.into(),
            requested,
            payload,
        }
    }

    /// Unique identifier of this instance handle.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Qualified name of the class this instance was constructed from.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The capability the class was requested under, if the caller queried
    /// by capability.
    pub fn requested_capability(&self) -> Option<&CapabilityRef> {
        self.requested.as_ref()
    }

    /// Whether the payload is a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Cast the payload to `T`, consuming the handle.
    ///
    /// Fails with [`ConstructionError::CastFailed`] when the payload is not a
    /// `T`; the error names the class and the requested target type.
    pub fn downcast<T: 'static>(self) -> Result<Box<T>, Error> {
        let class = self.class;
        self.payload.downcast::<T>().map_err(|_| {
            ConstructionError::CastFailed {
                class,
                target: std::any::type_name::<T>().to_owned(),
            }
            .into()
        })
    }

    /// Take the opaque payload out of the handle.
    pub fn into_inner(self) -> Box<dyn Any + Send + Sync> {
        self.payload
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("requested", &self.requested)
            .finish_non_exhaustive()
    }
}
