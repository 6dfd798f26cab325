//! Federating queries across many loaded modules.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use lynx_core::error::Result;
use lynx_core::types::CapabilityRef;
use lynx_core::CapabilityProvider;

use crate::class::ModuleClass;
use crate::module::Module;

/// An append-only, thread-safe collection of loaded modules.
///
/// Module order is load order, and that order is the cross-module tie-break
/// for every "first match" query: modules are scanned in load order and,
/// within a module, classes in declaration order. Nothing is ever removed or
/// reordered.
pub struct ModuleRepository {
    provider: Arc<dyn CapabilityProvider>,
    modules: Mutex<Vec<Arc<Module>>>,
}

impl ModuleRepository {
    /// Create an empty repository backed by `provider`.
    pub fn new(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            provider,
            modules: Mutex::new(Vec::new()),
        }
    }

    /// Load the module at `path` and append it.
    ///
    /// The (potentially slow) provider load runs before the guard is taken,
    /// so one slow load never stalls readers or other loads already past the
    /// provider. Returns the loaded module for direct use.
    pub fn load(&self, path: &str) -> Result<Arc<Module>> {
        let module = Arc::new(Module::load(self.provider.as_ref(), path)?);
        self.modules.lock().push(Arc::clone(&module));
        info!(module = %module.name(), path, "module registered");
        Ok(module)
    }

    /// A point-in-time snapshot of the loaded modules, in load order.
    ///
    /// The copy is taken under the guard and iterated without it, so readers
    /// never block loaders and never observe a list mutating mid-iteration.
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.modules.lock().clone()
    }

    /// Number of loaded modules.
    pub fn len(&self) -> usize {
        self.modules.lock().len()
    }

    /// Whether no module has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.modules.lock().is_empty()
    }

    /// Classes satisfying `capability` across all modules, module-load order
    /// first, declaration order within each module.
    pub fn classes_with_capability(&self, capability: &CapabilityRef) -> Vec<Arc<ModuleClass>> {
        let mut matches = Vec::new();
        for module in self.modules() {
            matches.extend(module.classes_with_capability(capability).cloned());
        }
        matches
    }

    /// First class matching the given filters across all modules.
    ///
    /// Scans modules in load order and classes in declaration order; the
    /// first match wins, with no other tie-break. `None` is the normal
    /// not-found outcome.
    pub fn first_class(
        &self,
        capability: Option<&CapabilityRef>,
        name: Option<&str>,
    ) -> Option<Arc<ModuleClass>> {
        self.modules()
            .into_iter()
            .find_map(|module| module.first_class(capability, name))
    }
}

impl fmt::Debug for ModuleRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRepository")
            .field("modules", &self.len())
            .finish_non_exhaustive()
    }
}
