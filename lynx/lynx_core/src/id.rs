//! Strongly-typed identifiers for the Lynx discovery system.
//!
//! This module provides the identifier types used throughout the system,
//! ensuring type safety and clear semantics. Each identifier type is a thin
//! wrapper around a UUID with a phantom type parameter so that identifiers
//! for different entity types cannot be mixed up.
//!
//! # Examples
//!
//! ```
//! use lynx_core::id::ModuleId;
//! use std::str::FromStr;
//!
//! // Create a new random ID
//! let module_id = ModuleId::new();
//!
//! // Create from string
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let module_id = ModuleId::from_str(id_str).unwrap();
//! assert_eq!(module_id.to_string(), id_str);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
///
/// This is a generic identifier type that is specialized for different
/// entity types using the phantom type parameter `T`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: std::marker::PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Create an identifier from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_uuid(Uuid::from_str(s)?))
    }
}

/// Marker type for [`ModuleId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleMarker;

/// Marker type for [`InstanceId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceMarker;

/// Identifier for a loaded module.
pub type ModuleId = Id<ModuleMarker>;

/// Identifier for a constructed instance.
pub type InstanceId = Id<InstanceMarker>;
