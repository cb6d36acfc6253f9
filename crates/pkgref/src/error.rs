//! Error types for package reference operations.

use thiserror::Error;

use crate::fields::Field;

/// Errors that can occur while building or converting package references.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefError {
    /// A field the target level needs was neither gathered nor overridden.
    #[error("missing required field `{field}` for {kind} reference")]
    MissingRequiredField { field: Field, kind: &'static str },

    /// The source and target levels are not related by descent.
    #[error("cannot convert {from} reference to {to}: only upgrades, downgrades and clones are allowed")]
    InvalidConversion { from: &'static str, to: &'static str },

    /// A field was supplied that the target level does not declare.
    #[error("field `{field}` is not part of a {kind} reference")]
    UnexpectedField { field: Field, kind: &'static str },

    /// The versioned level was requested but the crate was built without it.
    #[error("{kind} references are unavailable: built without the `{feature}` feature")]
    MissingDependency {
        kind: &'static str,
        feature: &'static str,
    },

    /// No reference level goes by this name.
    #[error("unknown reference kind: {0}")]
    UnknownKind(String),

    /// Version text could not be parsed.
    #[cfg(feature = "versioned")]
    #[error("invalid version: {0}")]
    InvalidVersion(#[from] pkgref_version::VersionError),

    /// A format postfix is malformed or names a component the version lacks.
    #[error("invalid version postfix {pattern:?}: {reason}")]
    InvalidPostfix { pattern: String, reason: String },

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

// `set_version` accepts an already-parsed `Version` through `TryInto`.
impl From<std::convert::Infallible> for RefError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Convenience type alias for reference operations.
pub type Result<T> = std::result::Result<T, RefError>;
