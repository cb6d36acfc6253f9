//! Field descriptors and the value bag used by the conversion protocol.
//!
//! A [`FieldSet`] plays two roles: it collects the values read from a source
//! reference, and it carries caller overrides. The two are merged (overrides
//! win) and handed to the target level's constructor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RefError, Result};
use crate::kind::RefKind;
use crate::postfix::VersionPostfix;

#[cfg(feature = "versioned")]
use pkgref_version::Version;

/// Names a reference field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Arch,
    Group,
    Version,
    VersionPostfix,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Arch => "arch",
            Field::Group => "group",
            Field::Version => "version",
            Field::VersionPostfix => "version_postfix",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of one field, as read from a reference.
#[derive(Clone, Debug)]
pub enum FieldValue {
    Name(String),
    Arch(Option<String>),
    Group(Option<String>),
    #[cfg(feature = "versioned")]
    Version(Version),
    VersionPostfix(VersionPostfix),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Name(_) => Field::Name,
            FieldValue::Arch(_) => Field::Arch,
            FieldValue::Group(_) => Field::Group,
            #[cfg(feature = "versioned")]
            FieldValue::Version(_) => Field::Version,
            FieldValue::VersionPostfix(_) => Field::VersionPostfix,
        }
    }
}

/// Keyword-style field values. Unset slots are `None`.
///
/// `arch` and `group` are doubly optional: the outer `Option` says whether the
/// field was supplied at all, the inner one carries an explicitly absent value.
#[derive(Clone, Debug, Default)]
pub struct FieldSet {
    name: Option<String>,
    arch: Option<Option<String>>,
    group: Option<Option<String>>,
    #[cfg(feature = "versioned")]
    version: Option<Version>,
    version_postfix: Option<VersionPostfix>,
}

impl FieldSet {
    /// An empty set: a plain clone with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(Some(arch.into()));
        self
    }

    /// Override the architecture with an explicit "no architecture".
    pub fn without_arch(mut self) -> Self {
        self.arch = Some(None);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(Some(group.into()));
        self
    }

    pub fn without_group(mut self) -> Self {
        self.group = Some(None);
        self
    }

    #[cfg(feature = "versioned")]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Parse `text` and set it as the version.
    #[cfg(feature = "versioned")]
    pub fn with_version_str(self, text: &str) -> Result<Self> {
        Ok(self.with_version(Version::parse(text)?))
    }

    pub fn with_version_postfix(mut self, postfix: impl Into<VersionPostfix>) -> Self {
        self.version_postfix = Some(postfix.into());
        self
    }

    /// Store one field value, replacing whatever the slot held.
    pub fn insert(&mut self, value: FieldValue) {
        match value {
            FieldValue::Name(v) => self.name = Some(v),
            FieldValue::Arch(v) => self.arch = Some(v),
            FieldValue::Group(v) => self.group = Some(v),
            #[cfg(feature = "versioned")]
            FieldValue::Version(v) => self.version = Some(v),
            FieldValue::VersionPostfix(v) => self.version_postfix = Some(v),
        }
    }

    /// Lay `overrides` on top of `self`. Every slot set in `overrides` wins.
    pub fn merge(mut self, overrides: FieldSet) -> Self {
        if overrides.name.is_some() {
            self.name = overrides.name;
        }
        if overrides.arch.is_some() {
            self.arch = overrides.arch;
        }
        if overrides.group.is_some() {
            self.group = overrides.group;
        }
        #[cfg(feature = "versioned")]
        if overrides.version.is_some() {
            self.version = overrides.version;
        }
        if overrides.version_postfix.is_some() {
            self.version_postfix = overrides.version_postfix;
        }
        self
    }

    /// Returns `true` if the slot for `field` is set.
    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Name => self.name.is_some(),
            Field::Arch => self.arch.is_some(),
            Field::Group => self.group.is_some(),
            #[cfg(feature = "versioned")]
            Field::Version => self.version.is_some(),
            #[cfg(not(feature = "versioned"))]
            Field::Version => false,
            Field::VersionPostfix => self.version_postfix.is_some(),
        }
    }

    /// Fail if any set slot names a field `kind` does not declare.
    pub fn ensure_only(&self, kind: &RefKind) -> Result<()> {
        const ALL: [Field; 5] = [
            Field::Name,
            Field::Arch,
            Field::Group,
            Field::Version,
            Field::VersionPostfix,
        ];
        match ALL
            .into_iter()
            .find(|field| self.contains(*field) && !kind.declares(*field))
        {
            Some(field) => Err(RefError::UnexpectedField {
                field,
                kind: kind.name(),
            }),
            None => Ok(()),
        }
    }

    /// Remove the name, failing if it was never set.
    pub fn take_name(&mut self, kind: &RefKind) -> Result<String> {
        self.name.take().ok_or(RefError::MissingRequiredField {
            field: Field::Name,
            kind: kind.name(),
        })
    }

    /// Remove the architecture. Unset falls back to `default`.
    pub fn take_arch(&mut self, default: &str) -> Option<String> {
        self.arch.take().unwrap_or_else(|| Some(default.to_string()))
    }

    pub fn take_group(&mut self) -> Option<String> {
        self.group.take().flatten()
    }

    /// Remove the version, failing if it was never set.
    #[cfg(feature = "versioned")]
    pub fn take_version(&mut self, kind: &RefKind) -> Result<Version> {
        self.version.take().ok_or(RefError::MissingRequiredField {
            field: Field::Version,
            kind: kind.name(),
        })
    }

    pub fn take_version_postfix(&mut self) -> VersionPostfix {
        self.version_postfix.take().unwrap_or_default()
    }
}
