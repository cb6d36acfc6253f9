use thiserror::Error;

/// Errors produced while parsing version text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("version text is empty")]
    Empty,

    #[error("version text has no components: {0:?}")]
    NoComponents(String),

    #[error("invalid character {ch:?} at byte {position} in version {text:?}")]
    InvalidCharacter {
        text: String,
        ch: char,
        position: usize,
    },

    #[error("numeric component {component:?} is too large in version {text:?}")]
    NumberTooLarge { text: String, component: String },
}
