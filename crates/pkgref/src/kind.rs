//! Reference level descriptors.
//!
//! Every reference type reports a static [`RefKind`]. Kinds form a tree
//! through their `parent` links; the built-in levels are a single chain
//! `base <- grouped <- versioned`. The conversion protocol only moves a value
//! along one chain, and identity keys carry the kind so references of
//! different levels never compare equal.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{RefError, Result};
use crate::fields::Field;

/// Cargo feature that compiles the versioned level.
pub const VERSIONED_FEATURE: &str = "versioned";

/// Describes one level of the reference hierarchy.
pub struct RefKind {
    name: &'static str,
    parent: Option<&'static RefKind>,
    fields: &'static [Field],
}

impl RefKind {
    /// Declare a level. `fields` lists the level's constructor fields in
    /// declaration order; these are the fields gathered when a value is
    /// converted into or out of this level.
    pub const fn new(
        name: &'static str,
        parent: Option<&'static RefKind>,
        fields: &'static [Field],
    ) -> Self {
        Self {
            name,
            parent,
            fields,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The level immediately below this one, if any.
    pub fn parent(&self) -> Option<&'static RefKind> {
        self.parent
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Returns `true` if this level declares `field`.
    pub fn declares(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// Returns `true` if `self` is `ancestor` or sits above it in the chain.
    pub fn descends_from(&self, ancestor: &RefKind) -> bool {
        if self == ancestor {
            return true;
        }
        let mut current = self.parent;
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent;
        }
        false
    }

    /// Resolve a built-in level by name.
    ///
    /// Asking for `"versioned"` in a build without the `versioned` feature
    /// fails with [`RefError::MissingDependency`].
    pub fn by_name(name: &str) -> Result<&'static RefKind> {
        match name {
            "base" => Ok(&BASE),
            "grouped" => Ok(&GROUPED),
            #[cfg(feature = "versioned")]
            "versioned" => Ok(&VERSIONED),
            #[cfg(not(feature = "versioned"))]
            "versioned" => Err(RefError::MissingDependency {
                kind: "versioned",
                feature: VERSIONED_FEATURE,
            }),
            other => Err(RefError::UnknownKind(other.to_string())),
        }
    }
}

// Kinds are singletons; identity is the address of the static.
impl PartialEq for RefKind {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for RefKind {}

impl Hash for RefKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefKind({})", self.name)
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Name and architecture.
pub static BASE: RefKind = RefKind::new(
    "base",
    None,
    &[Field::Name, Field::Arch, Field::VersionPostfix],
);

/// Name, architecture and group.
pub static GROUPED: RefKind = RefKind::new(
    "grouped",
    Some(&BASE),
    &[Field::Name, Field::Arch, Field::Group, Field::VersionPostfix],
);

/// Name, architecture, group and version.
#[cfg(feature = "versioned")]
pub static VERSIONED: RefKind = RefKind::new(
    "versioned",
    Some(&GROUPED),
    &[
        Field::Name,
        Field::Arch,
        Field::Group,
        Field::Version,
        Field::VersionPostfix,
    ],
);

/// Returns `true` if this build can construct versioned references.
pub const fn versioned_available() -> bool {
    cfg!(feature = "versioned")
}
