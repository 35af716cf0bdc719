//! Error taxonomy for parsing, include resolution, and merge/substitution.

use thiserror::Error;

/// Everything that can go wrong while turning bytes into a resolved [`crate::value::Value`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected token at offset {offset}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        offset: usize,
        expected: &'static str,
        found: Option<char>,
    },

    #[error("invalid escape sequence at offset {offset}: {reason}")]
    InvalidEscape { offset: usize, reason: String },

    #[error("maximum nesting depth ({limit}) exceeded")]
    DepthExceeded { limit: usize },

    #[error("invalid number literal {literal:?}")]
    InvalidNumber { literal: String },

    #[error("required include {path:?} could not be found")]
    IncludeNotFound { path: String },

    #[error("include cycle detected: {0}")]
    IncludeCycle(String),

    #[error("cannot concatenate {ty1} and {ty2} at `{path}`")]
    ConcatenateDifferentType {
        path: String,
        ty1: &'static str,
        ty2: &'static str,
    },

    #[error("substitution `{path}` could not be resolved")]
    SubstitutionNotFound { path: String },

    #[error("substitution cycle: {} -> {current} (cycle closed)", .backtrace.join(" -> "))]
    SubstitutionCycle {
        current: String,
        backtrace: Vec<String>,
    },

    #[error("substitution depth exceeded the limit of {limit} levels")]
    SubstitutionDepthExceeded { limit: usize },

    #[error("empty path expression")]
    EmptyPath,

    #[error("unexpected end of input")]
    Eof,

    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON include: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "url_includes")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
