use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::{RefConfig, DEFAULT_ARCH};
use crate::error::Result;
use crate::fields::{Field, FieldSet, FieldValue};
use crate::key::{IdentityKey, KeyPart};
use crate::kind::{RefKind, BASE};
use crate::postfix::VersionPostfix;
use crate::reference::{Downgrade, FromFields, Reference};

/// A package identified by name and architecture only.
#[derive(Clone, Serialize, Deserialize)]
pub struct BasePackageRef {
    pub name: String,
    pub arch: Option<String>,
    #[serde(default)]
    pub version_postfix: VersionPostfix,
}

impl BasePackageRef {
    /// A reference on the default architecture.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: Some(DEFAULT_ARCH.to_string()),
            version_postfix: VersionPostfix::None,
        }
    }

    /// A reference on the architecture `config` names as default.
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

    pub fn with_version_postfix(mut self, postfix: impl Into<VersionPostfix>) -> Self {
        self.version_postfix = postfix.into();
        self
    }
}

impl Reference for BasePackageRef {
    fn kind(&self) -> &'static RefKind {
        &BASE
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
        IdentityKey::new(
            &BASE,
            vec![KeyPart::Text(Some(self.name.as_str())), KeyPart::Text(self.arch())],
        )
    }

    fn field(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Name => Some(FieldValue::Name(self.name.clone())),
            Field::Arch => Some(FieldValue::Arch(self.arch.clone())),
            Field::VersionPostfix => {
                Some(FieldValue::VersionPostfix(self.version_postfix.clone()))
            }
            Field::Group | Field::Version => None,
        }
    }
}

impl FromFields for BasePackageRef {
    const KIND: &'static RefKind = &BASE;

    fn from_fields(mut fields: FieldSet) -> Result<Self> {
        fields.ensure_only(Self::KIND)?;
        Ok(Self {
            name: fields.take_name(Self::KIND)?,
            arch: fields.take_arch(DEFAULT_ARCH),
            version_postfix: fields.take_version_postfix(),
        })
    }
}

impl Downgrade for BasePackageRef {
    type Lower = BasePackageRef;
}

impl PartialEq for BasePackageRef {
    fn eq(&self, other: &Self) -> bool {
        self.as_tuple() == other.as_tuple()
    }
}

impl Eq for BasePackageRef {}

impl Hash for BasePackageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_tuple().hash(state);
    }
}

impl fmt::Debug for BasePackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasePackageRef")
            .field("name", &self.name)
            .field("arch", &self.arch)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for BasePackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_name_arch(f, &self.to_name(), self.arch())
    }
}

/// `name` followed by `:arch` when an architecture is set.
pub(crate) fn write_name_arch(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    arch: Option<&str>,
) -> fmt::Result {
    f.write_str(name)?;
    if let Some(arch) = arch {
        write!(f, ":{arch}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefError;
    use std::collections::HashMap;

    #[test]
    fn defaults_to_amd64() {
        let r = BasePackageRef::new("sqlite");
        assert_eq!(r.arch(), Some("amd64"));
        assert!(!r.version_postfix.is_active());
    }

    #[test]
    fn config_supplies_default_arch() {
        let config = RefConfig {
            default_arch: "arm64".into(),
            ..RefConfig::default()
        };
        assert_eq!(BasePackageRef::new_with("zlib", &config).arch(), Some("arm64"));
    }

    #[test]
    fn equality_uses_name_and_arch() {
        let a = BasePackageRef::new("sqlite");
        assert_eq!(a, BasePackageRef::new("sqlite"));
        assert_ne!(a, BasePackageRef::new("sqlite3"));
        assert_ne!(a, BasePackageRef::new("sqlite").with_arch("i386"));
    }

    #[test]
    fn postfix_is_not_part_of_identity() {
        let a = BasePackageRef::new("sqlite");
        let b = BasePackageRef::new("sqlite").with_version_postfix(2usize);
        assert_eq!(a, b);
        let mut map = HashMap::new();
        map.insert(a, 1);
        assert_eq!(map.get(&b), Some(&1));
    }

    #[test]
    fn display_appends_arch() {
        assert_eq!(BasePackageRef::new("sqlite").to_string(), "sqlite:amd64");
        assert_eq!(
            BasePackageRef::new("sqlite").without_arch().to_string(),
            "sqlite"
        );
    }

    #[test]
    fn to_path_scrubs_separators() {
        let r = BasePackageRef::new("dev-db/sqlite").with_arch("x86\\64");
        assert_eq!(r.to_path(), "dev-db_sqlite_x86_64");
    }

    #[test]
    fn to_name_is_plain_name() {
        let r = BasePackageRef::new("sqlite").with_version_postfix(2usize);
        assert_eq!(r.to_name(), "sqlite");
    }

    #[test]
    fn plain_clone_preserves_identity() {
        let r = BasePackageRef::new("sqlite").with_arch("arm64");
        let cloned: BasePackageRef = r.clone_as(FieldSet::new()).unwrap();
        assert_eq!(cloned, r);
    }

    #[test]
    fn clone_applies_overrides() {
        let r = BasePackageRef::new("sqlite");
        let cloned: BasePackageRef = r.clone_as(FieldSet::new().with_arch("armhf")).unwrap();
        assert_eq!(cloned, BasePackageRef::new("sqlite").with_arch("armhf"));
        assert_eq!(r.arch(), Some("amd64"));
    }

    #[test]
    fn downgrade_at_floor_fails() {
        let err = BasePackageRef::new("sqlite").downgrade().unwrap_err();
        assert!(matches!(err, RefError::InvalidConversion { from: "base", .. }));
    }

    #[test]
    fn debug_lists_identity_fields() {
        let rendered = format!("{:?}", BasePackageRef::new("sqlite"));
        assert_eq!(
            rendered,
            r#"BasePackageRef { name: "sqlite", arch: Some("amd64"), .. }"#
        );
    }

    #[test]
    fn serde_roundtrip() {
        let r = BasePackageRef::new("sqlite").with_version_postfix(1usize);
        let json = serde_json::to_string(&r).unwrap();
        let parsed: BasePackageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, r);
        assert!(matches!(parsed.version_postfix, VersionPostfix::Dot(1)));
    }
}
