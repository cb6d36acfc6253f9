//! The [`Reference`] protocol shared by every level, and the conversion
//! machinery that moves a value up or down the hierarchy.
//!
//! Conversion copies the fields the relevant level declares (see
//! [`RefKind::fields`]), lays caller overrides on top, and builds the target
//! through [`FromFields`]:
//!
//! - target at or above the source level: gather the source level's fields
//!   (upgrade or clone)
//! - target below the source level: gather the target level's fields
//!   (downgrade)
//! - anything else: [`RefError::InvalidConversion`]

use tracing::debug;

use crate::config::RefConfig;
use crate::error::{RefError, Result};
use crate::fields::{Field, FieldSet, FieldValue};
use crate::key::IdentityKey;
use crate::kind::RefKind;
use crate::postfix::VersionPostfix;

/// Read access shared by all reference levels.
pub trait Reference {
    /// The level this value belongs to.
    fn kind(&self) -> &'static RefKind;

    fn name(&self) -> &str;

    fn arch(&self) -> Option<&str>;

    fn version_postfix(&self) -> &VersionPostfix;

    /// The ordered identity fields, used for equality and hashing.
    fn as_tuple(&self) -> IdentityKey<'_>;

    /// Read one field by descriptor. `None` if this level lacks it.
    fn field(&self, field: Field) -> Option<FieldValue>;

    /// The package name as it should appear to a package manager.
    fn to_name(&self) -> String {
        self.name().to_string()
    }

    /// A filesystem-safe rendering of the identity key.
    fn to_path(&self) -> String {
        self.to_path_with(&RefConfig::default())
    }

    fn to_path_with(&self, config: &RefConfig) -> String {
        self.as_tuple().to_path(config)
    }

    /// Convert into `T`, applying `overrides` on top of the gathered fields.
    ///
    /// Passing `Self` as `T` with an empty [`FieldSet`] is a plain clone.
    fn clone_as<T: FromFields>(&self, overrides: FieldSet) -> Result<T>
    where
        Self: Sized,
    {
        convert(self, overrides)
    }
}

/// Construction from a [`FieldSet`].
pub trait FromFields: Reference + Sized {
    const KIND: &'static RefKind;

    /// Build from gathered fields. Implementations reject fields their level
    /// does not declare and report required fields that are missing.
    fn from_fields(fields: FieldSet) -> Result<Self>;
}

/// One step down the hierarchy.
pub trait Downgrade: Reference {
    /// The type of the level below. Levels at the bottom name themselves.
    type Lower: FromFields;

    /// Convert to the parent level. Fails at the hierarchy floor.
    fn downgrade(&self) -> Result<Self::Lower>
    where
        Self: Sized,
    {
        let kind = self.kind();
        match kind.parent() {
            Some(parent) if parent == <Self::Lower as FromFields>::KIND => {
                convert(self, FieldSet::new())
            }
            Some(parent) => Err(RefError::InvalidConversion {
                from: kind.name(),
                to: parent.name(),
            }),
            None => Err(RefError::InvalidConversion {
                from: kind.name(),
                to: "<none>",
            }),
        }
    }
}

/// Gather the fields `level` declares from `source`.
pub fn gather<R: Reference + ?Sized>(source: &R, level: &RefKind) -> FieldSet {
    let mut fields = FieldSet::new();
    for value in level.fields().iter().filter_map(|f| source.field(*f)) {
        fields.insert(value);
    }
    fields
}

/// Run the conversion protocol from `source` into `T`.
pub fn convert<T, R>(source: &R, overrides: FieldSet) -> Result<T>
where
    T: FromFields,
    R: Reference + ?Sized,
{
    let from = source.kind();
    let to = T::KIND;

    let gathered = if to.descends_from(from) {
        debug!(from = from.name(), to = to.name(), "upgrade or clone");
        gather(source, from)
    } else if from.descends_from(to) {
        debug!(from = from.name(), to = to.name(), "downgrade");
        gather(source, to)
    } else {
        return Err(RefError::InvalidConversion {
            from: from.name(),
            to: to.name(),
        });
    };

    T::from_fields(gathered.merge(overrides))
}
