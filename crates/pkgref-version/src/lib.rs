//! Comparable package versions.
//!
//! A [`Version`] is parsed from free-form package version text such as
//! `3.29.0`, `1.0rc1` or `2:1.18-3`. The text is broken into an ordered
//! sequence of [`Component`]s which drives equality, hashing and ordering.
//! Callers that only need to render parts of a version (for example a short
//! `3.29` suffix) index into [`Version::components`].
//!
//! # Modules
//!
//! - [`error`] — Parse errors
//! - [`component`] — A single numeric or textual version component
//! - [`version`] — The [`Version`] value itself

pub mod component;
pub mod error;
pub mod version;

pub use component::Component;
pub use error::VersionError;
pub use version::Version;
