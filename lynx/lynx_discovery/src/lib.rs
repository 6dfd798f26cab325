//! # Lynx Discovery
//!
//! This crate implements the capability-indexing engine of the Lynx plugin
//! discovery system. Given modules materialized by a
//! [`CapabilityProvider`](lynx_core::CapabilityProvider), it indexes each
//! exposed class by the capabilities it satisfies (the full interface
//! closure plus the inheritance chain) and by every name it can be looked
//! up under, then answers capability and name queries in O(1) per class.
//!
//! ## Core Components
//!
//! - **class**: `ModuleClass`, one loaded class with its lazily built,
//!   build-once/read-many capability index
//! - **module**: `Module`, one loaded module's usable classes in declaration
//!   order
//! - **repository**: `ModuleRepository`, an append-only collection
//!   federating queries across modules in load order
//! - **naming**: the process-wide name-matching mode, pinned at first use
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lynx_core::types::{ClassDescriptor, TypeMeta};
//! use lynx_discovery::ModuleRepository;
//! use lynx_provider::{ModuleBlueprint, StaticProvider};
//!
//! // Describe a module: one interface, one class implementing it.
//! let codec = TypeMeta::interface("ICodec").namespace("Archive").build();
//! let zip = TypeMeta::class("ZipCodec")
//!     .namespace("Archive")
//!     .with_interface(&codec)
//!     .build();
//!
//! let provider = Arc::new(StaticProvider::new());
//! provider.register(
//!     "archive.lynx",
//!     ModuleBlueprint::new("archive").with_class(ClassDescriptor::new(zip, None)),
//! );
//!
//! // Load it and query by capability or by name.
//! let repository = ModuleRepository::new(provider);
//! repository.load("archive.lynx").unwrap();
//!
//! let class = repository.first_class(Some(&codec), None).unwrap();
//! assert_eq!(class.qualified_name(), "Archive.ZipCodec");
//! assert!(class.matches_name("ICodec"));
//! ```

pub mod class;
pub mod module;
pub mod naming;
pub mod repository;

// Re-export commonly used types
pub use class::ModuleClass;
pub use module::Module;
pub use naming::set_name_matching;
pub use repository::ModuleRepository;

pub use lynx_core::NameMatching;
