use std::fmt;
use std::hash::{Hash, Hasher};

use pkgref_version::Version;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::base::BasePackageRef;
use crate::config::DEFAULT_ARCH;
use crate::error::{RefError, Result};
use crate::fields::{Field, FieldSet, FieldValue};
use crate::grouped::{grouped_key, write_grouped, PackageRef};
use crate::key::{IdentityKey, KeyPart};
use crate::kind::{RefKind, VERSIONED};
use crate::postfix::VersionPostfix;
use crate::reference::{Downgrade, FromFields, Reference};

/// A package pinned to a version. Identifies a package globally, not just
/// within one system's package manager.
///
/// The version is always present; build one with [`new`](Self::new) or by
/// upgrading a [`PackageRef`] with a version override.
#[derive(Clone, Serialize, Deserialize)]
pub struct VersionedPackageRef {
    pub name: String,
    pub arch: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    version: Version,
    #[serde(default)]
    pub version_postfix: VersionPostfix,
}

impl VersionedPackageRef {
    /// Build a reference on the default architecture.
    ///
    /// `version` may be text (parsed) or an already parsed [`Version`].
    ///
    /// ```
    /// use pkgref::{Reference, VersionedPackageRef};
    ///
    /// let r = VersionedPackageRef::new("sqlite", "3.29.0")
    ///     .unwrap()
    ///     .with_version_postfix(1usize);
    /// assert_eq!(r.to_name(), "sqlite3");
    /// assert_eq!(r.to_string(), "sqlite3:amd64 3.29.0");
    /// ```
    pub fn new<V>(name: impl Into<String>, version: V) -> Result<Self>
    where
        V: TryInto<Version>,
        RefError: From<V::Error>,
    {
        Ok(Self {
            name: name.into(),
            arch: Some(DEFAULT_ARCH.to_string()),
            group: None,
            version: version.try_into()?,
            version_postfix: VersionPostfix::None,
        })
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

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Replace the version. Text is parsed; a [`Version`] is stored as is.
    /// On a parse failure the current version is kept.
    pub fn set_version<V>(&mut self, version: V) -> Result<()>
    where
        V: TryInto<Version>,
        RefError: From<V::Error>,
    {
        let version = version.try_into()?;
        debug!(name = %self.name, from = %self.version, to = %version, "version replaced");
        self.version = version;
        Ok(())
    }

    /// The version components rendered as text, as postfix strategies see them.
    pub fn version_components(&self) -> Vec<String> {
        self.version.iter().map(ToString::to_string).collect()
    }

    /// The name with the rendered postfix appended directly.
    ///
    /// Fails when a format postfix is malformed or refers to a component this
    /// version does not have.
    ///
    /// ```
    /// use pkgref::VersionedPackageRef;
    ///
    /// let r = VersionedPackageRef::new("lib3ds", "1.3").unwrap();
    /// let padded = r.clone().with_version_postfix("-{0:02}");
    /// assert_eq!(padded.try_to_name().unwrap(), "lib3ds-01");
    /// let too_long = r.with_version_postfix("-{0}-{1}-{2}");
    /// assert!(too_long.try_to_name().is_err());
    /// ```
    pub fn try_to_name(&self) -> Result<String> {
        if !self.version_postfix.is_active() {
            return Ok(self.name.clone());
        }
        let postfix = self.version_postfix.render(&self.version_components())?;
        Ok(format!("{}{postfix}", self.name))
    }
}

impl Reference for VersionedPackageRef {
    fn kind(&self) -> &'static RefKind {
        &VERSIONED
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
            .extend(&VERSIONED, [KeyPart::Version(&self.version)])
    }

    fn field(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Name => Some(FieldValue::Name(self.name.clone())),
            Field::Arch => Some(FieldValue::Arch(self.arch.clone())),
            Field::Group => Some(FieldValue::Group(self.group.clone())),
            Field::Version => Some(FieldValue::Version(self.version.clone())),
            Field::VersionPostfix => {
                Some(FieldValue::VersionPostfix(self.version_postfix.clone()))
            }
        }
    }

    /// Like [`try_to_name`](VersionedPackageRef::try_to_name), but a postfix
    /// that cannot be rendered yields the bare name and a warning.
    fn to_name(&self) -> String {
        self.try_to_name().unwrap_or_else(|err| {
            warn!(
                name = %self.name,
                version = %self.version,
                error = %err,
                "version postfix not applied"
            );
            self.name.clone()
        })
    }
}

impl FromFields for VersionedPackageRef {
    const KIND: &'static RefKind = &VERSIONED;

    fn from_fields(mut fields: FieldSet) -> Result<Self> {
        fields.ensure_only(Self::KIND)?;
        Ok(Self {
            name: fields.take_name(Self::KIND)?,
            arch: fields.take_arch(DEFAULT_ARCH),
            group: fields.take_group(),
            version: fields.take_version(Self::KIND)?,
            version_postfix: fields.take_version_postfix(),
        })
    }
}

impl Downgrade for VersionedPackageRef {
    type Lower = PackageRef;
}

impl PartialEq for VersionedPackageRef {
    fn eq(&self, other: &Self) -> bool {
        self.as_tuple() == other.as_tuple()
    }
}

impl Eq for VersionedPackageRef {}

impl Hash for VersionedPackageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_tuple().hash(state);
    }
}

impl fmt::Debug for VersionedPackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedPackageRef")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("arch", &self.arch)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for VersionedPackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grouped(f, self.group(), &self.to_name(), self.arch())?;
        write!(f, " {}", self.version)
    }
}

impl From<VersionedPackageRef> for PackageRef {
    fn from(r: VersionedPackageRef) -> Self {
        PackageRef {
            name: r.name,
            arch: r.arch,
            group: r.group,
            version_postfix: r.version_postfix,
        }
    }
}

impl From<VersionedPackageRef> for BasePackageRef {
    fn from(r: VersionedPackageRef) -> Self {
        PackageRef::from(r).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::postfix::PostfixStrategy;

    fn sqlite() -> VersionedPackageRef {
        VersionedPackageRef::new("sqlite", "3.29.0").unwrap()
    }

    #[test]
    fn dot_postfix_follows_count_changes() {
        let mut r = sqlite().with_version_postfix(1usize);
        assert_eq!(r.to_name(), "sqlite3");
        if let VersionPostfix::Dot(count) = &mut r.version_postfix {
            *count = 2;
        }
        assert_eq!(r.to_name(), "sqlite3.29");
    }

    #[test]
    fn format_postfix_substitutes_components() {
        let r = VersionedPackageRef::new("lib3ds", "1.3.0")
            .unwrap()
            .with_version_postfix("-{0}-{1}");
        assert_eq!(r.to_name(), "lib3ds-1-3");
        let full = r.with_version_postfix("-{0}-{1}-{2}");
        assert_eq!(full.to_name(), "lib3ds-1-3-0");
    }

    #[test]
    fn format_postfix_zero_pads() {
        let r = VersionedPackageRef::new("lib3ds", "1.3.0")
            .unwrap()
            .with_version_postfix("-{0:02}");
        assert_eq!(r.try_to_name().unwrap(), "lib3ds-01");
        assert_eq!(r.to_name(), "lib3ds-01");
    }

    #[test]
    fn format_postfix_past_last_component_fails() {
        let r = VersionedPackageRef::new("lib3ds", "1.3")
            .unwrap()
            .with_version_postfix("-{0}-{1}-{2}");
        assert!(matches!(
            r.try_to_name(),
            Err(RefError::InvalidPostfix { .. })
        ));
        assert_eq!(r.to_name(), "lib3ds");
    }

    #[test]
    fn malformed_format_postfix_fails() {
        let r = sqlite().with_version_postfix("-{0");
        assert!(matches!(
            r.try_to_name(),
            Err(RefError::InvalidPostfix { .. })
        ));
    }

    #[test]
    fn inactive_postfix_leaves_name_alone() {
        assert_eq!(sqlite().to_name(), "sqlite");
        assert_eq!(sqlite().with_version_postfix(0usize).to_name(), "sqlite");
    }

    #[test]
    fn custom_postfix_strategy() {
        #[derive(Debug)]
        struct Slot;
        impl PostfixStrategy for Slot {
            fn render(&self, components: &[String]) -> String {
                format!(":{}", components.len())
            }
        }
        let strategy: Arc<dyn PostfixStrategy> = Arc::new(Slot);
        let r = sqlite().with_version_postfix(strategy);
        assert_eq!(r.to_name(), "sqlite:3");
    }

    #[test]
    fn display_appends_version() {
        let r = sqlite().with_group("dev-db").with_version_postfix(2usize);
        assert_eq!(r.to_string(), "dev-db@sqlite3.29:amd64 3.29.0");
    }

    #[test]
    fn to_path_includes_version() {
        let r = sqlite().with_group("dev-db");
        assert_eq!(r.to_path(), "sqlite_amd64_dev-db_3.29.0");
    }

    #[test]
    fn to_path_names_absent_group() {
        assert_eq!(sqlite().to_path(), "sqlite_amd64_None_3.29.0");
    }

    #[test]
    fn version_is_part_of_identity() {
        let other = VersionedPackageRef::new("sqlite", "3.30.0").unwrap();
        assert_ne!(sqlite(), other);
    }

    #[test]
    fn clone_is_equal_and_hashable() {
        let v1 = sqlite();
        let v2: VersionedPackageRef = v1.clone_as(FieldSet::new()).unwrap();
        assert_eq!(v1, v2);
        let mut map = HashMap::new();
        map.insert(v1, 1);
        assert_eq!(map[&v2], 1);
    }

    #[test]
    fn invalid_version_text_fails() {
        let err = VersionedPackageRef::new("sqlite", "").unwrap_err();
        assert!(matches!(err, RefError::InvalidVersion(_)));
    }

    #[test]
    fn set_version_parses_text() {
        let mut r = sqlite();
        r.set_version("3.30.1").unwrap();
        assert_eq!(r.version(), &Version::parse("3.30.1").unwrap());
    }

    #[test]
    fn set_version_stores_parsed_version() {
        let mut r = sqlite();
        let v = Version::parse("4.0").unwrap();
        r.set_version(v.clone()).unwrap();
        assert_eq!(r.version(), &v);
    }

    #[test]
    fn failed_set_version_keeps_old_value() {
        let mut r = sqlite();
        assert!(r.set_version("not a version").is_err());
        assert_eq!(r.version().to_string(), "3.29.0");
    }

    #[test]
    fn upgrade_from_grouped_with_version() {
        let grouped = PackageRef::new("sqlite");
        let upgraded: VersionedPackageRef = grouped
            .clone_as(FieldSet::new().with_version(sqlite().version().clone()))
            .unwrap();
        assert_eq!(upgraded, sqlite());
    }

    #[test]
    fn upgrade_without_version_is_missing_field() {
        let err = PackageRef::new("sqlite")
            .clone_as::<VersionedPackageRef>(FieldSet::new())
            .unwrap_err();
        assert_eq!(
            err,
            RefError::MissingRequiredField {
                field: Field::Version,
                kind: "versioned"
            }
        );
    }

    #[test]
    fn downgrade_clone_to_grouped() {
        let down: PackageRef = sqlite().clone_as(FieldSet::new()).unwrap();
        assert_eq!(down, PackageRef::new("sqlite"));
    }

    #[test]
    fn downgrade_chain_reaches_base() {
        let r = sqlite().with_group("dev-db");
        let grouped = r.downgrade().unwrap();
        assert_eq!(grouped, PackageRef::new("sqlite").with_group("dev-db"));
        assert_eq!(grouped.downgrade().unwrap(), BasePackageRef::new("sqlite"));
    }

    #[test]
    fn downgrade_to_base_directly() {
        let base: BasePackageRef = sqlite().clone_as(FieldSet::new()).unwrap();
        assert_eq!(base, BasePackageRef::new("sqlite"));
    }

    #[test]
    fn from_impls_match_downgrade() {
        let r = sqlite().with_group("dev-db");
        assert_eq!(PackageRef::from(r.clone()), r.downgrade().unwrap());
        assert_eq!(BasePackageRef::from(r), BasePackageRef::new("sqlite"));
    }

    #[test]
    fn serde_roundtrip() {
        let r = sqlite().with_group("dev-db").with_version_postfix("-{0}");
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains(r#""version":"3.29.0""#));
        let parsed: VersionedPackageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, r);
        assert_eq!(parsed.to_name(), "sqlite-3");
    }

    #[test]
    fn deserialize_requires_version() {
        let json = r#"{"name":"sqlite","arch":"amd64"}"#;
        assert!(serde_json::from_str::<VersionedPackageRef>(json).is_err());
    }
}
