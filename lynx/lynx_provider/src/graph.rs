//! Interning name-based type declarations into the shared metadata graph.
//!
//! Manifest files describe types by name; the discovery engine wants an
//! `Arc`-based graph of resolved handles. `TypeGraph` bridges the two:
//! declarations go in, memoized resolution turns each into a
//! `CapabilityRef`, and an explicit in-progress marker catches inheritance
//! cycles that a name-based format can express but the `Arc` graph cannot.

use std::collections::HashMap;
use thiserror::Error;

use lynx_core::error::DescriptorError;
use lynx_core::types::{CapabilityRef, TypeKind, TypeMeta};

/// One name-based type declaration, before resolution.
#[derive(Debug, Clone)]
pub(crate) struct TypeEntry {
    pub kind: TypeKind,
    pub name: String,
    pub namespace: Option<String>,
    /// Referenced interface names: extended for interfaces, implemented for
    /// classes.
    pub interfaces: Vec<String>,
    /// Referenced parent class name, if any.
    pub parent: Option<String>,
}

impl TypeEntry {
    pub(crate) fn qualified(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

/// Defects in the declaration set as a whole.
#[derive(Debug, Error)]
pub(crate) enum GraphError {
    #[error("duplicate type definition \"{0}\"")]
    Duplicate(String),
}

#[derive(Debug, Clone)]
enum Slot {
    Empty,
    InProgress,
    Done(CapabilityRef),
}

/// A set of declarations with memoized name resolution.
pub(crate) struct TypeGraph {
    entries: Vec<TypeEntry>,
    by_qualified: HashMap<String, usize>,
    by_simple: HashMap<String, Vec<usize>>,
    slots: Vec<Slot>,
}

impl TypeGraph {
    /// Index the declarations. Fails on duplicate qualified names.
    pub(crate) fn new(entries: Vec<TypeEntry>) -> Result<Self, GraphError> {
        let mut by_qualified = HashMap::new();
        let mut by_simple: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            let qualified = entry.qualified();
            if by_qualified.insert(qualified.clone(), idx).is_some() {
                return Err(GraphError::Duplicate(qualified));
            }
            by_simple.entry(entry.name.clone()).or_default().push(idx);
        }
        let slots = vec![Slot::Empty; entries.len()];
        Ok(Self {
            entries,
            by_qualified,
            by_simple,
            slots,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// The memoized handle for an entry, if resolution has succeeded.
    pub(crate) fn resolved(&self, idx: usize) -> Option<&CapabilityRef> {
        match &self.slots[idx] {
            Slot::Done(resolved) => Some(resolved),
            _ => None,
        }
    }

    /// Resolve one declaration into a metadata handle, resolving everything
    /// it references first. Memoized; cycles and dangling references come
    /// back as `DescriptorError`s.
    pub(crate) fn resolve(&mut self, idx: usize) -> Result<CapabilityRef, DescriptorError> {
        match &self.slots[idx] {
            Slot::Done(resolved) => return Ok(resolved.clone()),
            Slot::InProgress => {
                let qualified = self.entries[idx].qualified();
                return Err(DescriptorError::InheritanceCycle {
                    class: qualified.clone(),
                    through: qualified,
                });
            }
            Slot::Empty => {}
        }

        self.slots[idx] = Slot::InProgress;
        match self.resolve_entry(idx) {
            Ok(resolved) => {
                self.slots[idx] = Slot::Done(resolved.clone());
                Ok(resolved)
            }
            Err(err) => {
                self.slots[idx] = Slot::Empty;
                Err(err)
            }
        }
    }

    fn resolve_entry(&mut self, idx: usize) -> Result<CapabilityRef, DescriptorError> {
        let entry = self.entries[idx].clone();
        let qualified = entry.qualified();

        let mut builder = match entry.kind {
            TypeKind::Interface => TypeMeta::interface(entry.name),
            TypeKind::Class => TypeMeta::class(entry.name),
        };
        if let Some(ns) = entry.namespace {
            builder = builder.namespace(ns);
        }
        for reference in &entry.interfaces {
            let target = self.lookup(&qualified, reference)?;
            let resolved = self.resolve(target)?;
            builder = builder.with_interface(&resolved);
        }
        if let Some(reference) = &entry.parent {
            let target = self.lookup(&qualified, reference)?;
            let resolved = self.resolve(target)?;
            builder = builder.with_parent(&resolved);
        }
        Ok(builder.build())
    }

    /// Find the entry a reference names: exact qualified match first, then a
    /// unique simple-name match.
    fn lookup(&self, class: &str, reference: &str) -> Result<usize, DescriptorError> {
        if let Some(&idx) = self.by_qualified.get(reference) {
            return Ok(idx);
        }
        match self.by_simple.get(reference).map(Vec::as_slice) {
            Some([idx]) => Ok(*idx),
            Some(_) => Err(DescriptorError::Metadata {
                class: class.to_owned(),
                reason: format!("ambiguous reference \"{reference}\""),
            }),
            None => Err(DescriptorError::UnresolvedReference {
                class: class.to_owned(),
                referenced: reference.to_owned(),
            }),
        }
    }
}
