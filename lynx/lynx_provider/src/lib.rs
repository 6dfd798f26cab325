//! # Lynx Provider
//!
//! Implementations of the [`CapabilityProvider`](lynx_core::CapabilityProvider)
//! contract: the collaborator that turns a module path into exposed-class
//! descriptors for the discovery engine.
//!
//! Two realizations are provided:
//!
//! - **static_registry**: [`StaticProvider`], a programmatic registry of
//!   [`ModuleBlueprint`]s assembled in code. This is the embedded-plugin-set
//!   realization, and the natural test double.
//! - **manifest**: [`ManifestProvider`], which reads a self-describing TOML
//!   manifest per module (interfaces, classes, and their relationships)
//!   and resolves each concrete class's constructor from a
//!   [`ConstructorTable`] of registered closures.
//!
//! Both funnel class relationships into the shared `Arc`-based metadata
//! graph from `lynx_core`, which is what keeps the discovery engine's
//! closure walk free of any name resolution.

pub mod manifest;
pub mod static_registry;

mod graph;

// Re-export commonly used types
pub use manifest::{ConstructorTable, ManifestProvider};
pub use static_registry::{ModuleBlueprint, StaticProvider};
