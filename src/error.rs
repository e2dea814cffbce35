//! Crate error types and the validity-reporting trait.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort construction, loading or writing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a robot supports at most 6 external axes, got {0}")]
    TooManyExternalAxes(usize),

    #[error("a robot supports at most one linear external axis, got {0}")]
    MultipleLinearAxes(usize),

    #[error("unknown external axis alias: {0:?}")]
    UnknownAxisAlias(String),

    #[error("unsupported action document version {found} (newest supported is {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    #[error("invalid action document: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("invalid generator configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure to read a RAPID data literal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("invalid number: {0:?}")]
    Number(String),

    #[error("invalid boolean: {0:?}")]
    Boolean(String),

    #[error("unbalanced brackets")]
    Brackets,

    #[error("expected {0} declaration")]
    Declaration(&'static str),
}

/// Non-fatal validity reporting.
///
/// Invalid values are still accepted by the generator; callers check before generating.
pub trait Validate {
    /// Human-readable reason, or `None` when the value is valid.
    fn invalid_reason(&self) -> Option<String>;

    fn is_valid(&self) -> bool {
        self.invalid_reason().is_none()
    }
}
