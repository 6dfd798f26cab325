//! Error types for the Lynx discovery system.
//!
//! This module defines the error hierarchy used throughout the system. The
//! errors are organized by concern: loading a module, reading one class's
//! descriptor, constructing an instance, and process-wide configuration.
//!
//! The root error type, `Error`, can wrap any of the concern-specific errors,
//! allowing for uniform error handling at the top level. Each family has a
//! distinct blast radius: a `LoadError` is fatal to one load call, a
//! `DescriptorError` costs one class, a `ConstructionError` costs one
//! construction attempt. A capability or name lookup miss is never an error;
//! callers branch on `Option::None`.

use crate::config::NameMatching;
use thiserror::Error;

/// Root error type for the Lynx system.
#[derive(Debug, Error)]
pub enum Error {
    /// Module loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Per-class descriptor errors
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Instance construction errors
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// Process-wide configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias using the Lynx root error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading a module.
///
/// Fatal to the `Load` call that produced them; modules already loaded into a
/// repository are unaffected.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The load path was empty or whitespace-only.
    #[error("module path is empty")]
    EmptyPath,

    /// Reading the module source failed.
    #[error("failed to read module \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The module's metadata could not be parsed.
    #[error("malformed module manifest \"{path}\": {reason}")]
    Parse { path: String, reason: String },

    /// The provider failed for a reason of its own.
    #[error("provider failed to load \"{path}\": {reason}")]
    Provider { path: String, reason: String },

    /// No module is registered under the given path.
    #[error("no module registered for \"{0}\"")]
    UnknownModule(String),
}

/// Errors raised while reading one exposed class's metadata.
///
/// Non-fatal to the module load: the class is skipped and the rest of the
/// module loads normally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// The class references a type that is not defined anywhere.
    #[error("class {class}: unresolved reference to type \"{referenced}\"")]
    UnresolvedReference { class: String, referenced: String },

    /// The class's inheritance metadata contains a cycle.
    #[error("class {class}: inheritance cycle through \"{through}\"")]
    InheritanceCycle { class: String, through: String },

    /// The class names a constructor key with no registered constructor.
    #[error("class {class}: no constructor registered under key \"{key}\"")]
    UnknownConstructor { class: String, key: String },

    /// The class's relationship metadata could not be read.
    #[error("class {class}: {reason}")]
    Metadata { class: String, reason: String },
}

/// Errors raised while constructing an instance.
///
/// Surfaced directly to the caller; never retried.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The class exposes no construction entry point.
    #[error("class {0} is not instantiable")]
    NotInstantiable(String),

    /// The constructor expects a different number of arguments.
    #[error("class {class}: constructor expects {expected} argument(s), got {got}")]
    ArityMismatch {
        class: String,
        expected: usize,
        got: usize,
    },

    /// An argument had the wrong type or shape.
    #[error("class {class}: argument {index} is invalid: {reason}")]
    ArgumentMismatch {
        class: String,
        index: usize,
        reason: String,
    },

    /// The constructor itself failed.
    #[error("class {class}: constructor failed: {reason}")]
    Failed { class: String, reason: String },

    /// The class does not satisfy the capability it was requested under.
    #[error("class {class} does not satisfy capability {capability}")]
    MissingCapability { class: String, capability: String },

    /// The constructed instance could not be cast to the requested type.
    #[error("instance of {class} cannot be cast to {target}")]
    CastFailed { class: String, target: String },
}

/// Errors raised by process-wide configuration.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The name-matching mode was already pinned by first use.
    #[error("name matching is pinned to {active}; cannot switch to {requested}")]
    NameMatchingPinned {
        active: NameMatching,
        requested: NameMatching,
    },
}
