//! Data structures used throughout the discovery system.

mod class;
mod instance;
mod meta;

pub use class::{ClassDescriptor, Constructor, ConstructorFn, ModuleExports, Relations};
pub use instance::Instance;
pub use meta::{CapabilityRef, TypeKind, TypeMeta, TypeMetaBuilder};
