//! A loaded class and its lazily built capability index.
//!
//! `ModuleClass` is the unit the whole system exists to serve: it answers
//! "does this class satisfy capability T?" and "can this class be found by
//! lookup string S?" in O(1) after a one-time index construction over the
//! class's type-relationship metadata.
//!
//! The index is built at most once per class, on first query, and published
//! atomically: the first caller computes the full result locally and
//! publishes it through the cell; concurrent callers block for the (short)
//! build or observe the finished index. No caller ever sees a partial index,
//! and once published nothing is mutated again, so reads need no further
//! synchronization.

use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use lynx_core::error::{ConstructionError, Error, Result};
use lynx_core::types::{CapabilityRef, ClassDescriptor, Instance};
use lynx_core::ModuleId;

use crate::naming::{self, NameSet};

/// The cached index: interface closure, ancestor chain, and name index.
///
/// All fields are immutable once the cell publishes them.
pub(crate) struct CapabilityIndex {
    /// Interfaces declared directly on the class.
    direct: HashSet<CapabilityRef>,
    /// Full interface closure: direct interfaces, interfaces they extend
    /// (transitively), and every ancestor's interfaces (transitively).
    all: HashSet<CapabilityRef>,
    /// Parent chain in order, nearest first, up to where the chain ends.
    ancestors: Vec<CapabilityRef>,
    /// Lookup strings: own names plus the names of everything in `all` and
    /// `ancestors`, folded per the pinned matching mode.
    names: NameSet,
}

impl CapabilityIndex {
    /// Walk the relationship metadata and build the full index.
    ///
    /// Explicit worklist + seen-set; the seen-set is what collapses diamonds
    /// and keeps repeated interfaces from being visited twice.
    fn build(class_type: &CapabilityRef) -> Self {
        let mut names = NameSet::new(naming::active_matching());
        names.insert(class_type.simple_name());
        names.insert(class_type.qualified_name());

        // Ancestors first: their declared interfaces seed the closure too.
        let mut ancestors = Vec::new();
        let mut worklist: VecDeque<CapabilityRef> =
            class_type.interfaces().iter().cloned().collect();
        let mut parent = class_type.parent().cloned();
        while let Some(base) = parent {
            names.insert(base.simple_name());
            names.insert(base.qualified_name());
            worklist.extend(base.interfaces().iter().cloned());
            parent = base.parent().cloned();
            ancestors.push(base);
        }

        let direct: HashSet<CapabilityRef> = class_type.interfaces().iter().cloned().collect();

        let mut all = HashSet::new();
        while let Some(interface) = worklist.pop_front() {
            if !all.insert(interface.clone()) {
                continue;
            }
            names.insert(interface.simple_name());
            names.insert(interface.qualified_name());
            worklist.extend(interface.interfaces().iter().cloned());
        }

        CapabilityIndex {
            direct,
            all,
            ancestors,
            names,
        }
    }
}

/// One usable class within a loaded module.
///
/// Thread safe: the descriptor is immutable, and the index cell is built
/// once and read many times.
pub struct ModuleClass {
    descriptor: Arc<ClassDescriptor>,
    class_type: CapabilityRef,
    module_id: ModuleId,
    module_name: String,
    index: OnceCell<CapabilityIndex>,
}

impl ModuleClass {
    pub(crate) fn new(
        descriptor: Arc<ClassDescriptor>,
        class_type: CapabilityRef,
        module_id: ModuleId,
        module_name: String,
    ) -> Self {
        Self {
            descriptor,
            class_type,
            module_id,
            module_name,
            index: OnceCell::new(),
        }
    }

    /// The built index, building it on first use.
    fn index(&self) -> &CapabilityIndex {
        self.index
            .get_or_init(|| CapabilityIndex::build(&self.class_type))
    }

    /// Simple name of the class (example: `"ZipCodec"`).
    pub fn simple_name(&self) -> &str {
        self.descriptor.simple_name()
    }

    /// Namespace of the class (example: `"Archive"`).
    pub fn namespace(&self) -> Option<&str> {
        self.descriptor.namespace()
    }

    /// Fully qualified name (example: `"Archive.ZipCodec"`).
    pub fn qualified_name(&self) -> &str {
        self.descriptor.qualified_name()
    }

    /// The class's own type node.
    pub fn class_type(&self) -> &CapabilityRef {
        &self.class_type
    }

    /// Identifier of the module this class was loaded from.
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    /// Display name of the module this class was loaded from.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// The underlying descriptor.
    pub fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    /// Interfaces declared directly on the class.
    ///
    /// Cached on first use, like every other index view.
    pub fn interfaces(&self) -> impl Iterator<Item = &CapabilityRef> {
        self.index().direct.iter()
    }

    /// Every interface the class satisfies, directly or through interface
    /// extension or inheritance.
    pub fn all_interfaces(&self) -> impl Iterator<Item = &CapabilityRef> {
        self.index().all.iter()
    }

    /// The inheritance chain, nearest parent first.
    pub fn ancestors(&self) -> &[CapabilityRef] {
        &self.index().ancestors
    }

    /// Whether the class satisfies `capability`: present in the interface
    /// closure or in the inheritance chain. A class is not considered to
    /// satisfy its own type.
    pub fn has_capability(&self, capability: &CapabilityRef) -> bool {
        let index = self.index();
        index.all.contains(capability) || index.ancestors.contains(capability)
    }

    /// Whether the class can be found under the lookup string `name`.
    ///
    /// Matches the class's own simple and qualified names and those of every
    /// ancestor and every interface in the closure, folded per the pinned
    /// matching mode.
    pub fn matches_name(&self, name: &str) -> bool {
        self.index().names.contains(name)
    }

    /// Construct a fresh instance of this class.
    ///
    /// Nothing is cached; every call invokes the construction entry point.
    pub fn create_instance(&self, args: &[Value]) -> Result<Instance> {
        self.construct(None, args)
    }

    /// Construct a fresh instance, recording the capability it was requested
    /// under.
    ///
    /// Fails up front with [`ConstructionError::MissingCapability`] when the
    /// class does not satisfy `capability`, so a later typed cast cannot
    /// silently produce the wrong shape.
    pub fn create_instance_as(
        &self,
        capability: &CapabilityRef,
        args: &[Value],
    ) -> Result<Instance> {
        if !self.has_capability(capability) {
            return Err(ConstructionError::MissingCapability {
                class: self.qualified_name().to_owned(),
                capability: capability.qualified_name().to_owned(),
            }
            .into());
        }
        self.construct(Some(capability.clone()), args)
    }

    fn construct(&self, requested: Option<CapabilityRef>, args: &[Value]) -> Result<Instance> {
        let constructor = self.descriptor.constructor().ok_or_else(|| {
            Error::from(ConstructionError::NotInstantiable(
                self.qualified_name().to_owned(),
            ))
        })?;
        let payload = constructor(args)?;
        Ok(Instance::new(self.qualified_name(), requested, payload))
    }
}

impl fmt::Debug for ModuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleClass")
            .field("qualified_name", &self.qualified_name())
            .field("module", &self.module_name)
            .field("indexed", &self.index.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_core::types::TypeMeta;
    use serde_json::json;

    fn class_of(class_type: &CapabilityRef) -> ModuleClass {
        let descriptor = Arc::new(ClassDescriptor::new(class_type.clone(), None));
        ModuleClass::new(
            descriptor,
            class_type.clone(),
            ModuleId::new(),
            "test-module".into(),
        )
    }

    #[test]
    fn test_closure_spans_extension_and_inheritance() {
        // C implements I1; I1 extends I2; C inherits B; B implements I3.
        let i2 = TypeMeta::interface("I2").namespace("Demo").build();
        let i1 = TypeMeta::interface("I1")
            .namespace("Demo")
            .with_interface(&i2)
            .build();
        let i3 = TypeMeta::interface("I3").namespace("Demo").build();
        let b = TypeMeta::class("B")
            .namespace("Demo")
            .with_interface(&i3)
            .build();
        let c = TypeMeta::class("C")
            .namespace("Demo")
            .with_interface(&i1)
            .with_parent(&b)
            .build();
        let unrelated = TypeMeta::interface("IUnrelated").namespace("Demo").build();

        let class = class_of(&c);
        assert!(class.has_capability(&i1));
        assert!(class.has_capability(&i2));
        assert!(class.has_capability(&i3));
        assert!(class.has_capability(&b));
        assert!(!class.has_capability(&unrelated));
        // A class does not satisfy its own type.
        assert!(!class.has_capability(&c));
    }

    #[test]
    fn test_diamond_collapses_to_one_entry() {
        let i0 = TypeMeta::interface("I0").build();
        let left = TypeMeta::interface("ILeft").with_interface(&i0).build();
        let right = TypeMeta::interface("IRight").with_interface(&i0).build();
        let c = TypeMeta::class("C")
            .with_interface(&left)
            .with_interface(&right)
            .build();

        let class = class_of(&c);
        let occurrences = class.all_interfaces().filter(|i| **i == i0).count();
        assert_eq!(occurrences, 1);
        assert_eq!(class.all_interfaces().count(), 3);
    }

    #[test]
    fn test_direct_interfaces_exclude_inherited() {
        let i2 = TypeMeta::interface("I2").build();
        let i1 = TypeMeta::interface("I1").with_interface(&i2).build();
        let c = TypeMeta::class("C").with_interface(&i1).build();

        let class = class_of(&c);
        assert_eq!(class.interfaces().count(), 1);
        assert!(class.interfaces().any(|i| *i == i1));
        assert_eq!(class.all_interfaces().count(), 2);
    }

    #[test]
    fn test_ancestor_chain_order() {
        let grandparent = TypeMeta::class("Grandparent").build();
        let parent = TypeMeta::class("Parent").with_parent(&grandparent).build();
        let child = TypeMeta::class("Child").with_parent(&parent).build();

        let class = class_of(&child);
        assert_eq!(class.ancestors(), &[parent, grandparent]);
    }

    #[test]
    fn test_name_lookup_covers_closure_and_ancestors() {
        let i2 = TypeMeta::interface("I2").namespace("Demo").build();
        let i1 = TypeMeta::interface("I1")
            .namespace("Demo")
            .with_interface(&i2)
            .build();
        let b = TypeMeta::class("B").namespace("Demo").build();
        let c = TypeMeta::class("C")
            .namespace("Demo")
            .with_interface(&i1)
            .with_parent(&b)
            .build();

        let class = class_of(&c);
        for name in [
            "C",
            "Demo.C",
            "I1",
            "Demo.I1",
            "I2",
            "Demo.I2",
            "B",
            "Demo.B",
        ] {
            assert!(class.matches_name(name), "expected match for {name}");
        }
        assert!(!class.matches_name("Demo"));
        assert!(!class.matches_name("Other.C"));
    }

    #[test]
    fn test_plain_class_indexes_only_its_own_names() {
        let c = TypeMeta::class("Loner").namespace("Demo").build();

        let class = class_of(&c);
        assert_eq!(class.all_interfaces().count(), 0);
        assert!(class.ancestors().is_empty());
        assert!(class.matches_name("Loner"));
        assert!(class.matches_name("Demo.Loner"));
        assert_eq!(class.index().names.len(), 2);
    }

    #[test]
    fn test_create_instance_without_constructor_fails() {
        let c = TypeMeta::class("Loner").build();
        let class = class_of(&c);

        let err = class.create_instance(&[]).unwrap_err();
        assert!(err.to_string().contains("not instantiable"));
    }

    #[test]
    fn test_create_instance_as_checks_capability() {
        struct Codec;

        let codec = TypeMeta::interface("ICodec").build();
        let other = TypeMeta::interface("IOther").build();
        let ty = TypeMeta::class("ZipCodec").with_interface(&codec).build();
        let descriptor = Arc::new(ClassDescriptor::new(
            ty.clone(),
            Some(Arc::new(|_args: &[Value]| {
                Ok(Box::new(Codec) as Box<dyn std::any::Any + Send + Sync>)
            })),
        ));
        let class = ModuleClass::new(descriptor, ty, ModuleId::new(), "m".into());

        let instance = class.create_instance_as(&codec, &[]).unwrap();
        assert_eq!(instance.requested_capability(), Some(&codec));
        assert!(instance.downcast::<Codec>().is_ok());

        let err = class.create_instance_as(&other, &[]).unwrap_err();
        assert!(err.to_string().contains("does not satisfy"));
    }

    #[test]
    fn test_constructor_receives_arguments() {
        struct Labelled(String);

        let ty = TypeMeta::class("Labelled").build();
        let descriptor = Arc::new(ClassDescriptor::new(
            ty.clone(),
            Some(Arc::new(|args: &[Value]| {
                let label = args
                    .first()
                    .and_then(Value::as_str)
                    .ok_or(ConstructionError::ArityMismatch {
                        class: "Labelled".into(),
                        expected: 1,
                        got: 0,
                    })?;
                Ok(Box::new(Labelled(label.to_owned())) as Box<dyn std::any::Any + Send + Sync>)
            })),
        ));
        let class = ModuleClass::new(descriptor, ty, ModuleId::new(), "m".into());

        let instance = class.create_instance(&[json!("Test123")]).unwrap();
        let labelled = instance.downcast::<Labelled>().unwrap();
        assert_eq!(labelled.0, "Test123");

        let err = class.create_instance(&[]).unwrap_err();
        assert!(err.to_string().contains("expects 1 argument(s)"));
    }
}
