//! Version postfixes appended to package names.
//!
//! Distributions often ship several versions of a library side by side under
//! names like `sqlite3` or `lib3ds-1-3`. A [`VersionPostfix`] renders that
//! suffix from the components of a version. It lives on every reference level
//! but is only applied by versioned references.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RefError, Result};

/// A caller-supplied postfix rule.
///
/// Receives the version components already rendered as text.
pub trait PostfixStrategy: fmt::Debug + Send + Sync {
    fn render(&self, components: &[String]) -> String;
}

/// How a version turns into a name suffix.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionPostfix {
    /// Append nothing.
    #[default]
    None,
    /// The first `n` components joined by `.` (`3.29.0`, 2 -> `3.29`).
    Dot(usize),
    /// Components substituted into a pattern (`-{0}-{1}`, `1.3.0` -> `-1-3`).
    Format(String),
    /// A custom rule. Not serializable.
    #[serde(skip)]
    Custom(Arc<dyn PostfixStrategy>),
}

impl VersionPostfix {
    /// A format postfix whose pattern has been checked for syntax errors.
    ///
    /// ```
    /// use pkgref::VersionPostfix;
    ///
    /// assert!(VersionPostfix::format("-{0}-{1}").is_ok());
    /// assert!(VersionPostfix::format("-{0").is_err());
    /// ```
    pub fn format(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        parse_pattern(&pattern)?;
        Ok(VersionPostfix::Format(pattern))
    }

    /// Returns `false` when rendering would contribute nothing.
    pub fn is_active(&self) -> bool {
        match self {
            VersionPostfix::None => false,
            VersionPostfix::Dot(count) => *count > 0,
            VersionPostfix::Format(pattern) => !pattern.is_empty(),
            VersionPostfix::Custom(_) => true,
        }
    }

    /// Render the suffix for the given version components.
    ///
    /// Fails when a format pattern is malformed or refers to a component the
    /// version does not have.
    ///
    /// ```
    /// use pkgref::VersionPostfix;
    ///
    /// let parts = ["3".to_string(), "29".to_string(), "0".to_string()];
    /// assert_eq!(VersionPostfix::Dot(2).render(&parts).unwrap(), "3.29");
    /// assert_eq!(VersionPostfix::from("-{0}-{1}").render(&parts).unwrap(), "-3-29");
    /// assert!(VersionPostfix::from("-{3}").render(&parts).is_err());
    /// ```
    pub fn render(&self, components: &[String]) -> Result<String> {
        match self {
            VersionPostfix::None => Ok(String::new()),
            VersionPostfix::Dot(count) => {
                let take = (*count).min(components.len());
                Ok(components[..take].join("."))
            }
            VersionPostfix::Format(pattern) => format_positional(pattern, components),
            VersionPostfix::Custom(strategy) => {
                debug!(strategy = ?strategy, "rendering custom version postfix");
                Ok(strategy.render(components))
            }
        }
    }
}

impl From<usize> for VersionPostfix {
    fn from(count: usize) -> Self {
        VersionPostfix::Dot(count)
    }
}

impl From<&str> for VersionPostfix {
    fn from(pattern: &str) -> Self {
        VersionPostfix::Format(pattern.to_string())
    }
}

impl From<String> for VersionPostfix {
    fn from(pattern: String) -> Self {
        VersionPostfix::Format(pattern)
    }
}

impl From<Arc<dyn PostfixStrategy>> for VersionPostfix {
    fn from(strategy: Arc<dyn PostfixStrategy>) -> Self {
        VersionPostfix::Custom(strategy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            _ => None,
        }
    }
}

/// The part of a placeholder after `:`: `[[fill]align][0][width]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Padding {
    fill: Option<char>,
    align: Option<Align>,
    zero: bool,
    width: usize,
}

impl Padding {
    fn parse(text: &str) -> Option<Self> {
        let chars: Vec<char> = text.chars().collect();
        let mut padding = Padding::default();
        let mut rest = &chars[..];
        if let [fill, align, tail @ ..] = rest {
            if let Some(align) = Align::from_char(*align) {
                padding.fill = Some(*fill);
                padding.align = Some(align);
                rest = tail;
            }
        }
        if padding.align.is_none() {
            if let [align, tail @ ..] = rest {
                if let Some(align) = Align::from_char(*align) {
                    padding.align = Some(align);
                    rest = tail;
                }
            }
        }
        if let ['0', tail @ ..] = rest {
            padding.zero = true;
            rest = tail;
        }
        if !rest.iter().all(char::is_ascii_digit) {
            return None;
        }
        if !rest.is_empty() {
            padding.width = rest.iter().collect::<String>().parse().ok()?;
        }
        Some(padding)
    }

    /// Numeric arguments align right and text aligns left unless told
    /// otherwise. A leading `0` without an explicit fill pads numbers with
    /// zeros.
    fn apply(&self, arg: &str, out: &mut String) {
        let len = arg.chars().count();
        if len >= self.width {
            out.push_str(arg);
            return;
        }
        let numeric = !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit());
        let (fill, align) = match (self.fill, self.align) {
            (Some(fill), Some(align)) => (fill, align),
            (None, Some(align)) => (if self.zero { '0' } else { ' ' }, align),
            (_, None) if self.zero => ('0', Align::Right),
            (_, None) if numeric => (' ', Align::Right),
            (_, None) => (' ', Align::Left),
        };
        let pad = self.width - len;
        let (before, after) = match align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };
        out.extend(std::iter::repeat(fill).take(before));
        out.push_str(arg);
        out.extend(std::iter::repeat(fill).take(after));
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(char),
    Text(&'a str),
    Arg { index: usize, padding: Padding },
}

fn invalid(pattern: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidPostfix {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

/// Split a pattern into literal text and placeholders. `{{` and `}}` are
/// literal braces; `{}` numbers itself and cannot be mixed with `{N}`.
fn parse_pattern(pattern: &str) -> Result<Vec<Piece<'_>>> {
    let mut pieces = Vec::new();
    let mut next_auto = 0usize;
    let mut numbering: Option<bool> = None;
    let mut rest = pattern;

    while !rest.is_empty() {
        let Some(at) = rest.find(['{', '}']) else {
            pieces.push(Piece::Text(rest));
            break;
        };
        if at > 0 {
            pieces.push(Piece::Text(&rest[..at]));
        }
        let brace = &rest[at..];
        if brace.starts_with("{{") {
            pieces.push(Piece::Literal('{'));
            rest = &brace[2..];
            continue;
        }
        if brace.starts_with("}}") {
            pieces.push(Piece::Literal('}'));
            rest = &brace[2..];
            continue;
        }
        if brace.starts_with('}') {
            return Err(invalid(pattern, "single '}' encountered"));
        }
        let Some(close) = brace.find('}') else {
            return Err(invalid(pattern, "unterminated placeholder"));
        };
        let placeholder = &brace[1..close];
        if placeholder.contains('{') {
            return Err(invalid(pattern, "unexpected '{' in placeholder"));
        }
        let (field, format) = match placeholder.split_once(':') {
            Some((field, format)) => (field, Some(format)),
            None => (placeholder, None),
        };
        let automatic = field.is_empty();
        if numbering.is_some_and(|previous| previous != automatic) {
            return Err(invalid(
                pattern,
                "cannot switch between automatic and manual placeholder numbering",
            ));
        }
        numbering = Some(automatic);
        let index = if automatic {
            next_auto += 1;
            next_auto - 1
        } else {
            field.parse::<usize>().map_err(|_| {
                invalid(
                    pattern,
                    format!("placeholder {{{placeholder}}} is not a component index"),
                )
            })?
        };
        let padding = match format {
            Some(format) => Padding::parse(format).ok_or_else(|| {
                invalid(pattern, format!("unsupported format spec {format:?}"))
            })?,
            None => Padding::default(),
        };
        pieces.push(Piece::Arg { index, padding });
        rest = &brace[close + 1..];
    }
    Ok(pieces)
}

/// Substitute the components into `pattern`.
fn format_positional(pattern: &str, args: &[String]) -> Result<String> {
    let mut out = String::with_capacity(pattern.len());
    for piece in parse_pattern(pattern)? {
        match piece {
            Piece::Literal(ch) => out.push(ch),
            Piece::Text(text) => out.push_str(text),
            Piece::Arg { index, padding } => {
                let arg = args.get(index).ok_or_else(|| {
                    invalid(
                        pattern,
                        format!("placeholder {index} is past the last of {} components", args.len()),
                    )
                })?;
                padding.apply(arg, &mut out);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[derive(Debug)]
    struct MajorOnly;

    impl PostfixStrategy for MajorOnly {
        fn render(&self, components: &[String]) -> String {
            components.first().cloned().unwrap_or_default()
        }
    }

    fn render(postfix: impl Into<VersionPostfix>, v: &[String]) -> String {
        let postfix: VersionPostfix = postfix.into();
        postfix.render(v).unwrap()
    }

    #[test]
    fn dot_truncates_components() {
        let v = parts(&["3", "29", "0"]);
        assert_eq!(render(1usize, &v), "3");
        assert_eq!(render(2usize, &v), "3.29");
        assert_eq!(render(3usize, &v), "3.29.0");
    }

    #[test]
    fn dot_past_end_renders_everything() {
        assert_eq!(render(9usize, &parts(&["1", "2"])), "1.2");
    }

    #[test]
    fn format_substitutes_positionally() {
        let v = parts(&["1", "3", "0"]);
        assert_eq!(render("-{0}-{1}", &v), "-1-3");
        assert_eq!(render("-{0}-{1}-{2}", &v), "-1-3-0");
        assert_eq!(render("{1}{0}", &v), "31");
    }

    #[test]
    fn format_auto_numbers_empty_placeholders() {
        let v = parts(&["1", "3", "0"]);
        assert_eq!(render("{}.{}", &v), "1.3");
    }

    #[test]
    fn format_handles_escapes() {
        let v = parts(&["2"]);
        assert_eq!(render("{{{0}}}", &v), "{2}");
    }

    #[test]
    fn format_pads_components() {
        let v = parts(&["1", "3", "0"]);
        assert_eq!(render("-{0:02}", &v), "-01");
        assert_eq!(render("{0:3}|{1:<3}|", &v), "  1|3  |");
        assert_eq!(render("{0:*^5}", &v), "**1**");
        assert_eq!(render("{0:02}", &parts(&["123"])), "123");
        assert_eq!(render("{0:4}|", &parts(&["rc"])), "rc  |");
    }

    #[test]
    fn format_index_past_end_is_an_error() {
        let err = VersionPostfix::from("-{0}-{1}-{2}")
            .render(&parts(&["1", "3"]))
            .unwrap_err();
        assert!(matches!(
            err,
            RefError::InvalidPostfix { ref pattern, .. } if pattern == "-{0}-{1}-{2}"
        ));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        for pattern in ["-{0", "-{x}", "-}", "{}{1}", "{0:abc}", "{0{1}}"] {
            assert!(
                VersionPostfix::format(pattern).is_err(),
                "{pattern} should be rejected"
            );
            assert!(VersionPostfix::from(pattern).render(&parts(&["1", "2"])).is_err());
        }
    }

    #[test]
    fn checked_constructor_keeps_pattern() {
        let postfix = VersionPostfix::format("-{0:02}").unwrap();
        assert!(matches!(postfix, VersionPostfix::Format(ref p) if p == "-{0:02}"));
    }

    #[test]
    fn coercions_pick_variants() {
        assert!(matches!(VersionPostfix::from(2usize), VersionPostfix::Dot(2)));
        assert!(matches!(
            VersionPostfix::from("-{0}"),
            VersionPostfix::Format(p) if p == "-{0}"
        ));
        let custom: Arc<dyn PostfixStrategy> = Arc::new(MajorOnly);
        assert!(matches!(
            VersionPostfix::from(custom),
            VersionPostfix::Custom(_)
        ));
    }

    #[test]
    fn activity_follows_content() {
        assert!(!VersionPostfix::None.is_active());
        assert!(!VersionPostfix::Dot(0).is_active());
        assert!(!VersionPostfix::from("").is_active());
        assert!(VersionPostfix::Dot(1).is_active());
        assert!(VersionPostfix::Custom(Arc::new(MajorOnly)).is_active());
    }

    #[test]
    fn custom_strategy_is_invoked() {
        let postfix = VersionPostfix::Custom(Arc::new(MajorOnly));
        assert_eq!(postfix.render(&parts(&["7", "1"])).unwrap(), "7");
    }

    #[test]
    fn serde_roundtrip_of_builtin_variants() {
        let json = serde_json::to_string(&VersionPostfix::Dot(2)).unwrap();
        assert_eq!(json, r#"{"dot":2}"#);
        let parsed: VersionPostfix = serde_json::from_str(r#"{"format":"-{0}"}"#).unwrap();
        assert!(matches!(parsed, VersionPostfix::Format(p) if p == "-{0}"));
    }

    #[test]
    fn custom_variant_does_not_serialize() {
        let postfix = VersionPostfix::Custom(Arc::new(MajorOnly));
        assert!(serde_json::to_string(&postfix).is_err());
    }
}
