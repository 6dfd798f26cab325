//! Exposed-class descriptors: what a provider reports about one loadable
//! class, before any index is built over it.

use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{ConstructionError, DescriptorError};
use crate::types::meta::CapabilityRef;

/// Construction entry point signature: dynamic arguments in, opaque boxed
/// instance out.
pub type ConstructorFn =
    dyn Fn(&[Value]) -> std::result::Result<Box<dyn Any + Send + Sync>, ConstructionError>
        + Send
        + Sync;

/// A shared construction entry point.
pub type Constructor = Arc<ConstructorFn>;

/// The relationship-metadata handle carried by a descriptor.
///
/// Providers that fail to read one class's metadata report the failure here
/// instead of failing the whole module load; the discovery engine skips
/// broken descriptors.
#[derive(Clone, Debug)]
pub enum Relations {
    /// Metadata resolved; the handle is the class's own type node.
    Resolved(CapabilityRef),

    /// Metadata could not be read.
    Broken(DescriptorError),
}

/// Descriptor for one class exposed by a loaded module.
///
/// Identity, usability flags, the relationship-metadata handle, and the
/// construction entry point. Immutable after creation; the discovery engine
/// references descriptors but never owns or mutates them.
#[derive(Clone)]
pub struct ClassDescriptor {
    simple_name: String,
    namespace: Option<String>,
    qualified_name: String,
    public: bool,
    concrete: bool,
    relations: Relations,
    constructor: Option<Constructor>,
}

impl ClassDescriptor {
    /// Create a descriptor for a class whose metadata resolved, deriving
    /// identity from the type node. Public and concrete by default.
    pub fn new(class_type: CapabilityRef, constructor: Option<Constructor>) -> Self {
        Self {
            simple_name: class_type.simple_name().to_owned(),
            namespace: class_type.namespace().map(str::to_owned),
            qualified_name: class_type.qualified_name().to_owned(),
            public: true,
            concrete: true,
            relations: Relations::Resolved(class_type),
            constructor,
        }
    }

    /// Create a descriptor whose metadata could not be read.
    ///
    /// Identity must be supplied directly since there is no type node to
    /// derive it from. The class will be skipped at module load.
    pub fn broken(
        simple_name: impl Into<String>,
        namespace: Option<String>,
        error: DescriptorError,
    ) -> Self {
        let simple_name = simple_name.into();
        let qualified_name = match &namespace {
            Some(ns) => format!("{}.{}", ns, simple_name),
            None => simple_name.clone(),
        };
        Self {
            simple_name,
            namespace,
            qualified_name,
            public: true,
            concrete: true,
            relations: Relations::Broken(error),
            constructor: None,
        }
    }

    /// Mark the class non-public. Non-public classes are not usable.
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Mark the class abstract. Abstract classes are not usable.
    pub fn abstract_class(mut self) -> Self {
        self.concrete = false;
        self
    }

    /// Simple name, without namespace.
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// Namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Fully qualified name.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Whether the class is publicly visible.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Whether the class is concrete (instantiable in principle).
    pub fn is_concrete(&self) -> bool {
        self.concrete
    }

    /// The relationship-metadata handle, or the error that broke it.
    pub fn relations(&self) -> std::result::Result<&CapabilityRef, DescriptorError> {
        match &self.relations {
            Relations::Resolved(class_type) => Ok(class_type),
            Relations::Broken(err) => Err(err.clone()),
        }
    }

    /// The construction entry point, if the class has one.
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("qualified_name", &self.qualified_name)
            .field("public", &self.public)
            .field("concrete", &self.concrete)
            .field("relations", &self.relations)
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// A provider's load result: the module's display name and its exposed-class
/// descriptors in declaration order.
#[derive(Clone, Debug)]
pub struct ModuleExports {
    name: String,
    classes: Vec<ClassDescriptor>,
}

impl ModuleExports {
    /// Create a load result.
    pub fn new(name: impl Into<String>, classes: Vec<ClassDescriptor>) -> Self {
        Self {
            name: name.into(),
            classes,
        }
    }

    /// The module's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The exposed-class descriptors in declaration order.
    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    /// Decompose into name and descriptors.
    pub fn into_parts(self) -> (String, Vec<ClassDescriptor>) {
        (self.name, self.classes)
    }
}
