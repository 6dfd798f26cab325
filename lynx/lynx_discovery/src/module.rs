//! One loaded module: a stable, queryable collection of usable classes.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use lynx_core::error::{LoadError, Result};
use lynx_core::types::{CapabilityRef, TypeKind};
use lynx_core::{CapabilityProvider, ModuleId};

use crate::class::ModuleClass;

/// A loaded module's usable classes, in declaration order.
///
/// The class list is computed exactly once, at load time. Descriptors that
/// are not usable (non-public, abstract, or not class-shaped) are filtered
/// out; descriptors whose relationship metadata could not be read are
/// skipped with a warning, never failing the load.
pub struct Module {
    id: ModuleId,
    name: String,
    path: String,
    loaded_at: DateTime<Utc>,
    classes: Vec<Arc<ModuleClass>>,
}

impl Module {
    /// Load the module at `path` through `provider`.
    ///
    /// Fails with [`LoadError::EmptyPath`] for an empty or whitespace path
    /// and with whatever [`LoadError`] the provider reports for the load
    /// itself. Per-class metadata failures do not fail the load.
    pub fn load(provider: &dyn CapabilityProvider, path: &str) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(LoadError::EmptyPath.into());
        }

        let exports = provider.load_module(path)?;
        let (name, descriptors) = exports.into_parts();
        let id = ModuleId::new();

        let mut classes = Vec::new();
        for descriptor in descriptors {
            if !descriptor.is_public() || !descriptor.is_concrete() {
                continue;
            }
            let class_type = match descriptor.relations() {
                Ok(class_type) => class_type.clone(),
                Err(err) => {
                    warn!(
                        module = %name,
                        class = descriptor.qualified_name(),
                        error = %err,
                        "skipping class with unreadable metadata"
                    );
                    continue;
                }
            };
            if class_type.kind() != TypeKind::Class {
                continue;
            }
            classes.push(Arc::new(ModuleClass::new(
                Arc::new(descriptor),
                class_type,
                id,
                name.clone(),
            )));
        }

        debug!(module = %name, path, classes = classes.len(), "module loaded");

        Ok(Self {
            id,
            name,
            path: path.to_owned(),
            loaded_at: Utc::now(),
            classes,
        })
    }

    /// Identifier assigned at load time.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Display name reported by the provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path this module was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// When this module was loaded.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// All usable classes, in declaration order. Restartable: every call
    /// iterates the same cached list in the same order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ModuleClass>> {
        self.classes.iter()
    }

    /// Number of usable classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the module exposes no usable classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes satisfying `capability`, preserving declaration order.
    pub fn classes_with_capability<'a>(
        &'a self,
        capability: &'a CapabilityRef,
    ) -> impl Iterator<Item = &'a Arc<ModuleClass>> + 'a {
        self.classes
            .iter()
            .filter(move |class| class.has_capability(capability))
    }

    /// First class matching the given filters, in declaration order.
    ///
    /// With a capability, only classes satisfying it are considered; with a
    /// name, only classes matching it. With neither, the first class wins.
    /// `None` is the normal not-found outcome, not an error.
    pub fn first_class(
        &self,
        capability: Option<&CapabilityRef>,
        name: Option<&str>,
    ) -> Option<Arc<ModuleClass>> {
        self.classes
            .iter()
            .find(|class| {
                capability.map_or(true, |cap| class.has_capability(cap))
                    && name.map_or(true, |n| class.matches_name(n))
            })
            .cloned()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("classes", &self.classes.len())
            .finish()
    }
}
