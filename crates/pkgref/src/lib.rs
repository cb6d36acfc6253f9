//! Package references at three levels of specificity.
//!
//! Package tooling needs to name packages with more or less detail depending
//! on the job. This crate provides those names as small value types:
//!
//! - [`BasePackageRef`] — name and architecture
//! - [`PackageRef`] — adds an optional group (section, category, repository)
//! - [`VersionedPackageRef`] — adds a version (needs the `versioned` feature)
//!
//! Every level implements [`Reference`]: identity tuple, equality and hashing
//! over that tuple, a display form, and a filesystem-safe path form. Values
//! move between levels with [`Reference::clone_as`] and
//! [`Downgrade::downgrade`]; shared fields carry over and fields the target
//! level lacks are dropped.
//!
//! # Quick Start
//!
//! ```rust
//! use pkgref::{BasePackageRef, Downgrade, FieldSet, PackageRef, Reference};
//!
//! let zlib = PackageRef::new("zlib").with_group("sys-libs");
//! assert_eq!(zlib.to_string(), "sys-libs@zlib:amd64");
//! assert_eq!(zlib.to_path(), "zlib_amd64_sys-libs");
//!
//! let base = zlib.downgrade().unwrap();
//! assert_eq!(base, BasePackageRef::new("zlib"));
//!
//! let regrouped: PackageRef = base
//!     .clone_as(FieldSet::new().with_group("sys-libs"))
//!     .unwrap();
//! assert_eq!(regrouped, zlib);
//! ```
//!
//! With the `versioned` feature:
//!
//! ```rust
//! # #[cfg(feature = "versioned")]
//! # fn main() {
//! use pkgref::{Downgrade, FieldSet, PackageRef, Reference, VersionedPackageRef};
//!
//! let sqlite = VersionedPackageRef::new("sqlite", "3.29.0")
//!     .unwrap()
//!     .with_version_postfix(2usize);
//! assert_eq!(sqlite.to_name(), "sqlite3.29");
//! assert_eq!(sqlite.to_path(), "sqlite_amd64_None_3.29.0");
//!
//! let grouped = sqlite.downgrade().unwrap();
//! assert_eq!(grouped, PackageRef::new("sqlite"));
//!
//! let upgraded: VersionedPackageRef = grouped
//!     .clone_as(FieldSet::new().with_version(sqlite.version().clone()))
//!     .unwrap();
//! assert_eq!(upgraded, sqlite);
//! # }
//! # #[cfg(not(feature = "versioned"))]
//! # fn main() {}
//! ```
//!
//! # Modules
//!
//! - [`error`] — Error types
//! - [`config`] — Rendering defaults
//! - [`kind`] — Level descriptors and the versioned capability query
//! - [`fields`] — Field descriptors and the conversion value bag
//! - [`postfix`] — Version postfix strategies
//! - [`key`] — Identity tuples
//! - [`reference`] — The shared protocol and conversion machinery
//! - [`any`] — Runtime-level references

pub mod any;
pub mod base;
pub mod config;
pub mod error;
pub mod fields;
pub mod grouped;
pub mod key;
pub mod kind;
pub mod postfix;
pub mod reference;
#[cfg(feature = "versioned")]
pub mod versioned;

pub use any::AnyPackageRef;
pub use base::BasePackageRef;
pub use config::{RefConfig, DEFAULT_ARCH};
pub use error::{RefError, Result};
pub use fields::{Field, FieldSet, FieldValue};
pub use grouped::PackageRef;
pub use key::{IdentityKey, KeyPart};
pub use kind::{versioned_available, RefKind, BASE, GROUPED};
pub use postfix::{PostfixStrategy, VersionPostfix};
pub use reference::{convert, Downgrade, FromFields, Reference};

#[cfg(feature = "versioned")]
pub use kind::VERSIONED;
#[cfg(feature = "versioned")]
pub use pkgref_version::{Component, Version, VersionError};
#[cfg(feature = "versioned")]
pub use versioned::VersionedPackageRef;
