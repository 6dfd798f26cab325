//! A manifest-backed provider: self-describing TOML metadata per module.
//!
//! A module manifest declares the module's type graph: interfaces with the
//! interfaces they extend, classes with the interfaces they implement and
//! the class they inherit from. It also names a constructor key per concrete
//! class. Constructors themselves are Rust closures registered in a
//! [`ConstructorTable`] before the provider is built.
//!
//! Example manifest:
//!
//! ```toml
//! name = "archive-tools"
//!
//! [[types]]
//! kind = "interface"
//! name = "ICodec"
//! namespace = "Archive"
//!
//! [[types]]
//! kind = "interface"
//! name = "ICompressor"
//! namespace = "Archive"
//! extends = ["Archive.ICodec"]
//!
//! [[types]]
//! kind = "class"
//! name = "ZipCompressor"
//! namespace = "Archive"
//! implements = ["Archive.ICompressor"]
//! constructor = "archive.zip"
//! ```
//!
//! Load failures follow the system's blast-radius rules: an unreadable or
//! unparsable manifest fails the load; a class with a dangling reference, an
//! inheritance cycle, or an unregistered constructor key gets a broken
//! descriptor and is skipped by the discovery engine, leaving the rest of
//! the module usable.

use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use lynx_core::error::{ConstructionError, DescriptorError, LoadError};
use lynx_core::types::{CapabilityRef, ClassDescriptor, Constructor, ModuleExports, TypeKind};
use lynx_core::CapabilityProvider;

use crate::graph::{TypeEntry, TypeGraph};

/// Registered construction entry points, keyed by the names manifests use.
#[derive(Clone, Default)]
pub struct ConstructorTable {
    inner: HashMap<String, Constructor>,
}

impl ConstructorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under a key. Last registration wins.
    pub fn register<F>(&mut self, key: impl Into<String>, constructor: F)
    where
        F: Fn(&[Value]) -> Result<Box<dyn Any + Send + Sync>, ConstructionError>
            + Send
            + Sync
            + 'static,
    {
        self.inner.insert(key.into(), Arc::new(constructor));
    }

    /// Look up a constructor by key.
    pub fn get(&self, key: &str) -> Option<Constructor> {
        self.inner.get(key).cloned()
    }

    /// Whether a constructor is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of registered constructors.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for ConstructorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ConstructorTable").field("keys", &keys).finish()
    }
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,
    #[serde(default)]
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct RawType {
    kind: RawKind,
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    extends: Vec<String>,
    #[serde(default)]
    implements: Vec<String>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    constructor: Option<String>,
    #[serde(default = "default_public")]
    public: bool,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    Interface,
    Class,
}

/// A provider that loads modules from TOML manifests on disk.
///
/// Also keeps a registry of every type it has interned, so hosts can obtain
/// the [`CapabilityRef`] for a type they only know by name.
pub struct ManifestProvider {
    constructors: ConstructorTable,
    types: Mutex<HashMap<String, CapabilityRef>>,
}

impl ManifestProvider {
    /// Create a provider resolving constructor keys from `constructors`.
    pub fn new(constructors: ConstructorTable) -> Self {
        Self {
            constructors,
            types: Mutex::new(HashMap::new()),
        }
    }

    /// The handle for a type interned by an earlier load, by qualified name.
    pub fn capability(&self, qualified_name: &str) -> Option<CapabilityRef> {
        self.types.lock().get(qualified_name).cloned()
    }

    fn validate(raw: &RawType) -> Result<(), String> {
        match raw.kind {
            RawKind::Interface => {
                if !raw.implements.is_empty() || raw.parent.is_some() {
                    return Err(format!(
                        "interface \"{}\" cannot declare implements/parent",
                        raw.name
                    ));
                }
                if raw.constructor.is_some() {
                    return Err(format!(
                        "interface \"{}\" cannot declare a constructor",
                        raw.name
                    ));
                }
            }
            RawKind::Class => {
                if !raw.extends.is_empty() {
                    return Err(format!(
                        "class \"{}\" cannot declare extends; use implements/parent",
                        raw.name
                    ));
                }
            }
        }
        Ok(())
    }

    fn descriptor_for(
        &self,
        raw: &RawType,
        resolution: Result<CapabilityRef, DescriptorError>,
    ) -> ClassDescriptor {
        let class_type = match resolution {
            Ok(class_type) => class_type,
            Err(err) => {
                warn!(class = %raw.name, error = %err, "class metadata did not resolve");
                return ClassDescriptor::broken(raw.name.clone(), raw.namespace.clone(), err);
            }
        };

        let constructor = match (&raw.constructor, raw.is_abstract) {
            (Some(key), false) => match self.constructors.get(key) {
                Some(constructor) => Some(constructor),
                None => {
                    let err = DescriptorError::UnknownConstructor {
                        class: class_type.qualified_name().to_owned(),
                        key: key.clone(),
                    };
                    warn!(class = %raw.name, error = %err, "constructor key did not resolve");
                    return ClassDescriptor::broken(raw.name.clone(), raw.namespace.clone(), err);
                }
            },
            _ => None,
        };

        let mut descriptor = ClassDescriptor::new(class_type, constructor);
        if !raw.public {
            descriptor = descriptor.private();
        }
        if raw.is_abstract {
            descriptor = descriptor.abstract_class();
        }
        descriptor
    }
}

impl CapabilityProvider for ManifestProvider {
    fn load_module(&self, path: &str) -> Result<ModuleExports, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        let raw: RawManifest = toml::from_str(&text).map_err(|err| LoadError::Parse {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;

        for raw_type in &raw.types {
            Self::validate(raw_type).map_err(|reason| LoadError::Parse {
                path: path.to_owned(),
                reason,
            })?;
        }

        let entries: Vec<TypeEntry> = raw
            .types
            .iter()
            .map(|raw_type| TypeEntry {
                kind: match raw_type.kind {
                    RawKind::Interface => TypeKind::Interface,
                    RawKind::Class => TypeKind::Class,
                },
                name: raw_type.name.clone(),
                namespace: raw_type.namespace.clone(),
                interfaces: match raw_type.kind {
                    RawKind::Interface => raw_type.extends.clone(),
                    RawKind::Class => raw_type.implements.clone(),
                },
                parent: raw_type.parent.clone(),
            })
            .collect();

        let mut graph = TypeGraph::new(entries).map_err(|err| LoadError::Parse {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;

        // Resolve everything once so standalone interfaces land in the type
        // registry too; per-class failures are reported on the descriptors.
        for idx in 0..graph.len() {
            let _ = graph.resolve(idx);
        }

        let mut classes = Vec::new();
        for (idx, raw_type) in raw.types.iter().enumerate() {
            if raw_type.kind != RawKind::Class {
                continue;
            }
            let resolution = graph.resolve(idx);
            classes.push(self.descriptor_for(raw_type, resolution));
        }

        {
            let mut registry = self.types.lock();
            for idx in 0..graph.len() {
                if let Some(resolved) = graph.resolved(idx) {
                    registry.insert(resolved.qualified_name().to_owned(), resolved.clone());
                }
            }
        }

        debug!(
            module = %raw.name,
            path,
            classes = classes.len(),
            "manifest loaded"
        );
        Ok(ModuleExports::new(raw.name, classes))
    }
}

impl fmt::Debug for ManifestProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestProvider")
            .field("constructors", &self.constructors)
            .field("known_types", &self.types.lock().len())
            .finish()
    }
}
