use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::base::{write_name_arch, BasePackageRef};
use crate::config::{RefConfig, DEFAULT_ARCH};
use crate::error::Result;
use crate::fields::{Field, FieldSet, FieldValue};
use crate::key::{IdentityKey, KeyPart};
use crate::kind::{RefKind, BASE, GROUPED};
use crate::postfix::VersionPostfix;
use crate::reference::{Downgrade, FromFields, Reference};

/// A reference to a package as a system package manager knows it: name,
/// architecture and an optional group (a section, category or repository).
/// It carries no version.
#[derive(Clone, Serialize, Deserialize)]
pub struct PackageRef {
    pub name: String,
    pub arch: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub version_postfix: VersionPostfix,
}

impl PackageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: Some(DEFAULT_ARCH.to_string()),
            group: None,
            version_postfix: VersionPostfix::None,
        }
    }

    pub fn new_with(name: impl Into<String>, config: &RefConfig) -> Self {
        Self::new(name).with_arch(config.default_arch.clone())
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn without_arch(mut self) -> Self {
        self.arch = None;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_version_postfix(mut self, postfix: impl Into<VersionPostfix>) -> Self {
        self.version_postfix = postfix.into();
        self
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

/// Grouped identity: the base key extended with the group.
pub(crate) fn grouped_key<'a>(
    name: &'a str,
    arch: Option<&'a str>,
    group: Option<&'a str>,
) -> IdentityKey<'a> {
    IdentityKey::new(&BASE, vec![KeyPart::Text(Some(name)), KeyPart::Text(arch)])
        .extend(&GROUPED, [KeyPart::Text(group)])
}

/// `group@` prefix (when set) followed by the base rendering.
pub(crate) fn write_grouped(
    f: &mut fmt::Formatter<'_>,
    group: Option<&str>,
    name: &str,
    arch: Option<&str>,
) -> fmt::Result {
    if let Some(group) = group {
        write!(f, "{group}@")?;
    }
    write_name_arch(f, name, arch)
}

impl Reference for PackageRef {
    fn kind(&self) -> &'static RefKind {
        &GROUPED
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    fn version_postfix(&self) -> &VersionPostfix {
        &self.version_postfix
    }

    fn as_tuple(&self) -> IdentityKey<'_> {
        grouped_key(&self.name, self.arch(), self.group())
    }

    fn field(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Name => Some(FieldValue::Name(self.name.clone())),
            Field::Arch => Some(FieldValue::Arch(self.arch.clone())),
            Field::Group => Some(FieldValue::Group(self.group.clone())),
            Field::VersionPostfix => {
                Some(FieldValue::VersionPostfix(self.version_postfix.clone()))
            }
            Field::Version => None,
        }
    }
}

impl FromFields for PackageRef {
    const KIND: &'static RefKind = &GROUPED;

    fn from_fields(mut fields: FieldSet) -> Result<Self> {
        fields.ensure_only(Self::KIND)?;
        Ok(Self {
            name: fields.take_name(Self::KIND)?,
            arch: fields.take_arch(DEFAULT_ARCH),
            group: fields.take_group(),
            version_postfix: fields.take_version_postfix(),
        })
    }
}

impl Downgrade for PackageRef {
    type Lower = BasePackageRef;
}

impl PartialEq for PackageRef {
    fn eq(&self, other: &Self) -> bool {
        self.as_tuple() == other.as_tuple()
    }
}

impl Eq for PackageRef {}

impl Hash for PackageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_tuple().hash(state);
    }
}

impl fmt::Debug for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageRef")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("arch", &self.arch)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grouped(f, self.group(), &self.to_name(), self.arch())
    }
}

/// Drops the group, like [`Downgrade::downgrade`] without the round trip
/// through a [`FieldSet`].
impl From<PackageRef> for BasePackageRef {
    fn from(r: PackageRef) -> Self {
        BasePackageRef {
            name: r.name,
            arch: r.arch,
            version_postfix: r.version_postfix,
        }
    }
}
