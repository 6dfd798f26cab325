//! Type metadata: the relationship graph capabilities are resolved against.
//!
//! A loaded module describes its types as an acyclic graph of [`TypeMeta`]
//! nodes: interfaces pointing at the interfaces they extend, classes pointing
//! at the interfaces they implement and the class they inherit from. Nodes
//! are shared through [`CapabilityRef`] handles, which double as the
//! capability identifiers the discovery engine indexes by.
//!
//! The graph is acyclic by construction: a handle can only point at metadata
//! that already existed when the handle was created, and nothing here is
//! mutable after creation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The shape of a type in the metadata graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// An interface; may extend other interfaces.
    Interface,

    /// A class; may implement interfaces and inherit from one parent class.
    Class,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface => write!(f, "interface"),
            Self::Class => write!(f, "class"),
        }
    }
}

/// Identity and relationship metadata for one type.
///
/// Immutable after creation. Assembled with [`TypeMeta::interface`] /
/// [`TypeMeta::class`], which return a builder:
///
/// ```
/// use lynx_core::types::TypeMeta;
///
/// let codec = TypeMeta::interface("ICodec").namespace("Archive").build();
/// let zip = TypeMeta::class("ZipCodec")
///     .namespace("Archive")
///     .with_interface(&codec)
///     .build();
///
/// assert_eq!(zip.qualified_name(), "Archive.ZipCodec");
/// assert_eq!(zip.interfaces().len(), 1);
/// ```
#[derive(Debug)]
pub struct TypeMeta {
    kind: TypeKind,
    simple_name: String,
    namespace: Option<String>,
    qualified_name: String,
    interfaces: Vec<CapabilityRef>,
    parent: Option<CapabilityRef>,
}

impl TypeMeta {
    /// Start building an interface type.
    pub fn interface(name: impl Into<String>) -> TypeMetaBuilder {
        TypeMetaBuilder::new(TypeKind::Interface, name.into())
    }

    /// Start building a class type.
    pub fn class(name: impl Into<String>) -> TypeMetaBuilder {
        TypeMetaBuilder::new(TypeKind::Class, name.into())
    }
}

/// A shared handle to one type's metadata, used as a capability identifier.
///
/// Cloning is cheap (an `Arc` bump). Equality and hashing are by qualified
/// name, so two handles obtained independently for the same type compare
/// equal. The handle exposes the type's own declared interfaces and parent,
/// which is what lets closure walks recurse through capability metadata.
#[derive(Clone)]
pub struct CapabilityRef(Arc<TypeMeta>);

impl CapabilityRef {
    /// The shape of the referenced type.
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Simple name, without namespace (example: `"ZipCodec"`).
    pub fn simple_name(&self) -> &str {
        &self.0.simple_name
    }

    /// Namespace, if the type has one (example: `"Archive"`).
    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace.as_deref()
    }

    /// Fully qualified name (example: `"Archive.ZipCodec"`).
    pub fn qualified_name(&self) -> &str {
        &self.0.qualified_name
    }

    /// Interfaces declared directly on this type.
    ///
    /// For an interface this is the set it extends; for a class, the set it
    /// implements. Inherited interfaces are not included here; computing the
    /// closure is the discovery engine's job.
    pub fn interfaces(&self) -> &[CapabilityRef] {
        &self.0.interfaces
    }

    /// The immediate parent type, if any.
    pub fn parent(&self) -> Option<&CapabilityRef> {
        self.0.parent.as_ref()
    }
}

impl PartialEq for CapabilityRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.qualified_name == other.0.qualified_name
    }
}

impl Eq for CapabilityRef {}

impl Hash for CapabilityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.qualified_name.hash(state);
    }
}

impl fmt::Debug for CapabilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityRef({} {})", self.0.kind, self.0.qualified_name)
    }
}

impl fmt::Display for CapabilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.qualified_name)
    }
}

/// Builder for [`TypeMeta`], produced by [`TypeMeta::interface`] and
/// [`TypeMeta::class`].
#[derive(Debug)]
pub struct TypeMetaBuilder {
    kind: TypeKind,
    simple_name: String,
    namespace: Option<String>,
    interfaces: Vec<CapabilityRef>,
    parent: Option<CapabilityRef>,
}

impl TypeMetaBuilder {
    fn new(kind: TypeKind, simple_name: String) -> Self {
        Self {
            kind,
            simple_name,
            namespace: None,
            interfaces: Vec::new(),
            parent: None,
        }
    }

    /// Set the namespace.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Declare an interface edge: an implemented interface for a class, an
    /// extended interface for an interface.
    pub fn with_interface(mut self, interface: &CapabilityRef) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Set the immediate parent type.
    pub fn with_parent(mut self, parent: &CapabilityRef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Freeze the metadata and return a shared handle to it.
    pub fn build(self) -> CapabilityRef {
        let qualified_name = match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.simple_name),
            None => self.simple_name.clone(),
        };
        CapabilityRef(Arc::new(TypeMeta {
            kind: self.kind,
            simple_name: self.simple_name,
            namespace: self.namespace,
            qualified_name,
            interfaces: self.interfaces,
            parent: self.parent,
        }))
    }
}
