//! A reference whose level is only known at runtime.
//!
//! Tooling that reads references from configuration or converts them by level
//! name works with [`AnyPackageRef`]. Values of different levels never compare
//! equal, even when their shared fields match.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::base::BasePackageRef;
use crate::error::{RefError, Result};
use crate::fields::FieldSet;
use crate::grouped::PackageRef;
use crate::kind::{RefKind, BASE, GROUPED};
use crate::reference::Reference;

#[cfg(feature = "versioned")]
use crate::kind::VERSIONED;
#[cfg(feature = "versioned")]
use crate::versioned::VersionedPackageRef;

/// A package reference at any built-in level.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyPackageRef {
    Base(BasePackageRef),
    Grouped(PackageRef),
    #[cfg(feature = "versioned")]
    Versioned(VersionedPackageRef),
}

impl AnyPackageRef {
    pub fn kind(&self) -> &'static RefKind {
        self.as_reference().kind()
    }

    /// Borrow the inner value through the shared protocol.
    pub fn as_reference(&self) -> &dyn Reference {
        match self {
            AnyPackageRef::Base(r) => r,
            AnyPackageRef::Grouped(r) => r,
            #[cfg(feature = "versioned")]
            AnyPackageRef::Versioned(r) => r,
        }
    }

    /// Convert to the level `kind`, applying `overrides`.
    ///
    /// ```
    /// use pkgref::{AnyPackageRef, BasePackageRef, FieldSet, RefKind};
    ///
    /// let r = AnyPackageRef::from(BasePackageRef::new("sqlite"));
    /// let grouped = RefKind::by_name("grouped").unwrap();
    /// let upgraded = r
    ///     .clone_to(grouped, FieldSet::new().with_group("dev-db"))
    ///     .unwrap();
    /// assert_eq!(upgraded.to_string(), "dev-db@sqlite:amd64");
    /// ```
    pub fn clone_to(&self, kind: &'static RefKind, overrides: FieldSet) -> Result<Self> {
        let source = self.as_reference();
        if kind == &BASE {
            return crate::reference::convert(source, overrides).map(AnyPackageRef::Base);
        }
        if kind == &GROUPED {
            return crate::reference::convert(source, overrides).map(AnyPackageRef::Grouped);
        }
        #[cfg(feature = "versioned")]
        if kind == &VERSIONED {
            return crate::reference::convert(source, overrides).map(AnyPackageRef::Versioned);
        }
        Err(RefError::InvalidConversion {
            from: self.kind().name(),
            to: kind.name(),
        })
    }

    /// One level down. Fails for base references.
    pub fn downgrade(&self) -> Result<Self> {
        let from = self.kind();
        match from.parent() {
            Some(parent) => self.clone_to(parent, FieldSet::new()),
            None => Err(RefError::InvalidConversion {
                from: from.name(),
                to: "<none>",
            }),
        }
    }

    pub fn to_name(&self) -> String {
        self.as_reference().to_name()
    }

    /// The name, failing where a versioned postfix cannot be rendered.
    pub fn try_to_name(&self) -> Result<String> {
        match self {
            #[cfg(feature = "versioned")]
            AnyPackageRef::Versioned(r) => r.try_to_name(),
            r => Ok(r.to_name()),
        }
    }

    pub fn to_path(&self) -> String {
        self.as_reference().to_path()
    }
}

impl PartialEq for AnyPackageRef {
    fn eq(&self, other: &Self) -> bool {
        self.as_reference().as_tuple() == other.as_reference().as_tuple()
    }
}

impl Eq for AnyPackageRef {}

impl Hash for AnyPackageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_reference().as_tuple().hash(state);
    }
}

impl fmt::Display for AnyPackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyPackageRef::Base(r) => fmt::Display::fmt(r, f),
            AnyPackageRef::Grouped(r) => fmt::Display::fmt(r, f),
            #[cfg(feature = "versioned")]
            AnyPackageRef::Versioned(r) => fmt::Display::fmt(r, f),
        }
    }
}

impl From<BasePackageRef> for AnyPackageRef {
    fn from(r: BasePackageRef) -> Self {
        AnyPackageRef::Base(r)
    }
}

impl From<PackageRef> for AnyPackageRef {
    fn from(r: PackageRef) -> Self {
        AnyPackageRef::Grouped(r)
    }
}

#[cfg(feature = "versioned")]
impl From<VersionedPackageRef> for AnyPackageRef {
    fn from(r: VersionedPackageRef) -> Self {
        AnyPackageRef::Versioned(r)
    }
}
