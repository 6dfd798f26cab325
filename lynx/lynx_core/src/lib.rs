//! # Lynx Core
//!
//! `lynx_core` provides the shared vocabulary for the Lynx capability
//! discovery system: error types, strongly-typed identifiers, the type
//! metadata graph, exposed-class descriptors, instance handles, and the
//! provider contract consumed by the discovery engine.
//!
//! ## Core Principles
//!
//! 1. **Capabilities as metadata handles**: a capability (an interface or a
//!    base type a class can be queried against) is represented by a cheap,
//!    clonable [`CapabilityRef`] that exposes its own declared interfaces and
//!    parent, so closure walks recurse through capability metadata without
//!    any global type registry.
//!
//! 2. **Immutable descriptors**: everything a provider reports about a class
//!    is frozen at load time. Indexes built over descriptors can therefore be
//!    published once and read concurrently without further synchronization.
//!
//! 3. **Typed error taxonomy**: load failures, per-descriptor failures, and
//!    construction failures are distinct error families with distinct blast
//!    radii. A lookup miss is not an error at all.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all Lynx components
//! - **id**: Strongly-typed identifier types
//! - **config**: Process-wide configuration values
//! - **traits**: The `CapabilityProvider` collaborator contract
//! - **types**: Type metadata, class descriptors, and instance handles

pub mod config;
pub mod error;
pub mod id;
pub mod traits;
pub mod types;

// Re-export key types and traits for convenience
pub use config::NameMatching;
pub use error::{ConfigError, ConstructionError, DescriptorError, Error, LoadError, Result};
pub use id::{InstanceId, ModuleId};
pub use traits::CapabilityProvider;
pub use types::{
    CapabilityRef, ClassDescriptor, Constructor, Instance, ModuleExports, Relations, TypeKind,
    TypeMeta,
};
