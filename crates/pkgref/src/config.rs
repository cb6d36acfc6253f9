use serde::{Deserialize, Serialize};

use crate::error::{RefError, Result};

/// Architecture assumed when a reference is built without one.
pub const DEFAULT_ARCH: &str = "amd64";

/// Rendering defaults for package references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefConfig {
    /// Architecture given to references constructed without one.
    pub default_arch: String,
    /// Joins identity key parts in [`to_path`](crate::Reference::to_path).
    pub path_separator: String,
    /// Characters replaced by `path_separator` in path renderings.
    pub path_unsafe_chars: Vec<char>,
    /// Stands in for an absent arch or group in path renderings.
    pub absent_placeholder: String,
}

impl Default for RefConfig {
    fn default() -> Self {
        Self {
            default_arch: DEFAULT_ARCH.to_string(),
            path_separator: "_".to_string(),
            path_unsafe_chars: vec!['/', '\\'],
            absent_placeholder: "None".to_string(),
        }
    }
}

impl RefConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    ///
    /// ```
    /// use pkgref::RefConfig;
    ///
    /// let config = RefConfig::from_toml_str("default_arch = \"arm64\"").unwrap();
    /// assert_eq!(config.default_arch, "arm64");
    /// assert_eq!(config.path_separator, "_");
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RefError::Config(e.to_string()))
    }

    /// Make `raw` safe for use as a file name component.
    pub fn sanitize_path(&self, raw: &str) -> String {
        raw.chars()
            .fold(String::with_capacity(raw.len()), |mut out, ch| {
                if self.path_unsafe_chars.contains(&ch) {
                    out.push_str(&self.path_separator);
                } else {
                    out.push(ch);
                }
                out
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RefConfig::default();
        assert_eq!(config.default_arch, "amd64");
        assert_eq!(config.path_separator, "_");
        assert_eq!(config.path_unsafe_chars, vec!['/', '\\']);
        assert_eq!(config.absent_placeholder, "None");
    }

    #[test]
    fn toml_can_blank_the_absent_placeholder() {
        let config = RefConfig::from_toml_str("absent_placeholder = \"\"").unwrap();
        assert_eq!(config.absent_placeholder, "");
    }

    #[test]
    fn toml_overrides_selected_keys() {
        let config = RefConfig::from_toml_str(
            "path_separator = \"-\"\npath_unsafe_chars = [\"/\", \":\"]",
        )
        .unwrap();
        assert_eq!(config.default_arch, "amd64");
        assert_eq!(config.path_separator, "-");
        assert_eq!(config.path_unsafe_chars, vec!['/', ':']);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = RefConfig::from_toml_str("default_arch = 5").unwrap_err();
        assert!(matches!(err, RefError::Config(_)));
    }

    #[test]
    fn sanitize_replaces_unsafe_chars() {
        let config = RefConfig::default();
        assert_eq!(config.sanitize_path("a/b\\c"), "a_b_c");
    }
}
