use std::fmt;

use crate::config::RefConfig;
use crate::kind::RefKind;

#[cfg(feature = "versioned")]
use pkgref_version::Version;

/// One element of an identity key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPart<'a> {
    Text(Option<&'a str>),
    #[cfg(feature = "versioned")]
    Version(&'a Version),
}

impl KeyPart<'_> {
    fn render(&self, config: &RefConfig) -> String {
        match self {
            KeyPart::Text(None) => config.absent_placeholder.clone(),
            part => part.to_string(),
        }
    }
}

impl fmt::Display for KeyPart<'_> {
    /// Absent text renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Text(Some(text)) => f.write_str(text),
            KeyPart::Text(None) => Ok(()),
            #[cfg(feature = "versioned")]
            KeyPart::Version(version) => write!(f, "{version}"),
        }
    }
}

/// The identity tuple of a reference, tagged with its level.
///
/// Two references are equal exactly when their keys are equal, which requires
/// the same [`RefKind`]. The postfix is never part of the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityKey<'a> {
    kind: &'static RefKind,
    parts: Vec<KeyPart<'a>>,
}

impl<'a> IdentityKey<'a> {
    pub fn new(kind: &'static RefKind, parts: Vec<KeyPart<'a>>) -> Self {
        Self { kind, parts }
    }

    /// Extend a lower level's key with the parts this level introduces.
    pub fn extend(
        mut self,
        kind: &'static RefKind,
        parts: impl IntoIterator<Item = KeyPart<'a>>,
    ) -> Self {
        self.kind = kind;
        self.parts.extend(parts);
        self
    }

    pub fn kind(&self) -> &'static RefKind {
        self.kind
    }

    pub fn parts(&self) -> &[KeyPart<'a>] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Join the parts with the configured separator and scrub path-unsafe
    /// characters. Absent parts render as the configured placeholder.
    pub fn to_path(&self, config: &RefConfig) -> String {
        let joined = self
            .parts
            .iter()
            .map(|part| part.render(config))
            .collect::<Vec<_>>()
            .join(&config.path_separator);
        config.sanitize_path(&joined)
    }
}
