//! The provider contract: turning a module path into class descriptors.
//!
//! The discovery engine never inspects binaries itself. A
//! [`CapabilityProvider`] is the collaborator that knows how to materialize
//! a module's exposed classes, whether from a dynamic library with embedded
//! metadata, from a manifest file, or from a registry assembled at build
//! time. The engine consumes whatever descriptor sequence the provider
//! reports and indexes it.

use crate::error::LoadError;
use crate::types::ModuleExports;

/// Materializes a module's exposed-class descriptors from a load path.
///
/// Implementations must be safe to share across threads: one provider
/// instance typically backs a whole repository.
///
/// # Examples
///
/// ```
/// use lynx_core::error::LoadError;
/// use lynx_core::traits::CapabilityProvider;
/// use lynx_core::types::ModuleExports;
///
/// struct EmptyProvider;
///
/// impl CapabilityProvider for EmptyProvider {
///     fn load_module(&self, path: &str) -> Result<ModuleExports, LoadError> {
///         Ok(ModuleExports::new(path.to_owned(), Vec::new()))
///     }
/// }
/// ```
pub trait CapabilityProvider: Send + Sync {
    /// Load the module identified by `path` and report its name and
    /// exposed-class descriptors, in declaration order.
    ///
    /// # Returns
    ///
    /// * `Ok(ModuleExports)` - The module's name and descriptors.
    /// * `Err(LoadError)` - The module could not be loaded at all. Failures
    ///   scoped to a single class belong on that class's descriptor instead,
    ///   so one unreadable class cannot poison the rest of the module.
    fn load_module(&self, path: &str) -> Result<ModuleExports, LoadError>;
}
