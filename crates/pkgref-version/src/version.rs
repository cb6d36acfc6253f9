use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::VersionError;

/// Characters that split a version into components.
const SEPARATORS: &[char] = &['.', '-', '_', '+', '~', ':'];

/// A parsed package version.
///
/// Equality, hashing and ordering are defined over the component sequence.
/// [`Display`](fmt::Display) reproduces the text the version was parsed from,
/// so `3-29-0` and `3.29.0` are equal but render differently.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    text: String,
    components: Vec<Component>,
}

impl Version {
    /// Parse version text into its components.
    ///
    /// # Examples
    ///
    /// ```
    /// use pkgref_version::{Component, Version};
    ///
    /// let v = Version::parse("3.29.0").unwrap();
    /// assert_eq!(v.len(), 3);
    /// assert_eq!(v.get(1), Some(&Component::Number(29)));
    ///
    /// let rc = Version::parse("1.0rc1").unwrap();
    /// assert_eq!(rc.components()[2], Component::Text("rc".into()));
    /// assert!(rc < Version::parse("1.0").unwrap());
    /// ```
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        if text.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut components = Vec::new();
        let mut run = String::new();
        let mut run_is_digit = false;

        for (position, ch) in text.char_indices() {
            if SEPARATORS.contains(&ch) {
                flush_run(text, &mut run, run_is_digit, &mut components)?;
                continue;
            }
            if !ch.is_ascii_alphanumeric() {
                return Err(VersionError::InvalidCharacter {
                    text: text.to_string(),
                    ch,
                    position,
                });
            }

            let is_digit = ch.is_ascii_digit();
            if !run.is_empty() && is_digit != run_is_digit {
                flush_run(text, &mut run, run_is_digit, &mut components)?;
            }
            run_is_digit = is_digit;
            run.push(ch);
        }
        flush_run(text, &mut run, run_is_digit, &mut components)?;

        if components.is_empty() {
            return Err(VersionError::NoComponents(text.to_string()));
        }

        Ok(Self {
            text: text.to_string(),
            components,
        })
    }

    /// The ordered component sequence.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The component at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always `false` for a successfully parsed version.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over the components in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    /// The text this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn flush_run(
    text: &str,
    run: &mut String,
    is_digit: bool,
    components: &mut Vec<Component>,
) -> Result<(), VersionError> {
    if run.is_empty() {
        return Ok(());
    }
    let value = std::mem::take(run);
    if is_digit {
        let n = value.parse::<u64>().map_err(|_| VersionError::NumberTooLarge {
            text: text.to_string(),
            component: value.clone(),
        })?;
        components.push(Component::Number(n));
    } else {
        components.push(Component::Text(value));
    }
    Ok(())
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let longest = self.len().max(other.len());
        for i in 0..longest {
            let ord = match (self.get(i), other.get(i)) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(a), None) => a.cmp_missing(),
                (None, Some(b)) => b.cmp_missing().reverse(),
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        // Keeps `cmp` consistent with `eq`: 1.0 < 1.0.0.
        self.len().cmp(&other.len())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.text)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Version {
    type Error = VersionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.text
    }
}

impl<'a> IntoIterator for &'a Version {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[test]
    fn parses_dotted_numbers() {
        let version = v("3.29.0");
        assert_eq!(
            version.components(),
            &[
                Component::Number(3),
                Component::Number(29),
                Component::Number(0)
            ]
        );
    }

    #[test]
    fn splits_at_digit_letter_boundaries() {
        let version = v("1.0rc1");
        assert_eq!(
            version.components(),
            &[
                Component::Number(1),
                Component::Number(0),
                Component::Text("rc".into()),
                Component::Number(1),
            ]
        );
    }

    #[test]
    fn accepts_epoch_and_revision_separators() {
        assert_eq!(v("2:1.18-3ubuntu1").len(), 6);
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!(Version::parse(""), Err(VersionError::Empty));
    }

    #[test]
    fn rejects_separator_only_text() {
        assert!(matches!(
            Version::parse("..-"),
            Err(VersionError::NoComponents(_))
        ));
    }

    #[test]
    fn rejects_foreign_characters() {
        let err = Version::parse("1.0 beta").unwrap_err();
        assert!(matches!(
            err,
            VersionError::InvalidCharacter { ch: ' ', position: 3, .. }
        ));
    }

    #[test]
    fn rejects_oversized_numbers() {
        assert!(matches!(
            Version::parse("1.99999999999999999999999"),
            Err(VersionError::NumberTooLarge { .. })
        ));
    }

    #[test]
    fn display_preserves_source_text() {
        assert_eq!(v("3-29-0").to_string(), "3-29-0");
        assert_eq!(v("3-29-0"), v("3.29.0"));
    }

    #[test]
    fn equal_versions_hash_equally() {
        let mut set = HashSet::new();
        set.insert(v("3.29.0"));
        assert!(set.contains(&v("3_29_0")));
    }

    #[test]
    fn ordering_follows_components() {
        assert!(v("1.2") < v("1.10"));
        assert!(v("1.0rc1") < v("1.0"));
        assert!(v("1.0") < v("1.0.1"));
        assert!(v("1.0") < v("1.0.0"));
        assert!(v("1.0a") < v("1.0b"));
    }

    #[test]
    fn serde_roundtrip_uses_text() {
        let version = v("3.29.0");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"3.29.0\"");
        let parsed: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, version);
    }

    #[test]
    fn serde_rejects_invalid_text() {
        assert!(serde_json::from_str::<Version>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn ordering_is_consistent_with_equality(
            a in proptest::collection::vec(0u64..20, 1..5),
            b in proptest::collection::vec(0u64..20, 1..5),
        ) {
            let render = |parts: &[u64]| {
                parts.iter().map(u64::to_string).collect::<Vec<_>>().join(".")
            };
            let va = v(&render(&a));
            let vb = v(&render(&b));
            prop_assert_eq!(va == vb, va.cmp(&vb) == Ordering::Equal);
            prop_assert_eq!(va.cmp(&vb), vb.cmp(&va).reverse());
        }
    }
}
