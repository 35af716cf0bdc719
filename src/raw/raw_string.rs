//! String variants: quoted, unquoted, triple-quoted multiline, and
//! path-expression (a dotted sequence of segments used as a compound key).

use crate::path::{Key, Path};
use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};

pub const RAW_QUOTED_STRING_TYPE: &str = "quoted_string";
pub const RAW_UNQUOTED_STRING_TYPE: &str = "unquoted_string";
pub const RAW_MULTILINE_STRING_TYPE: &str = "multiline_string";
pub const RAW_PATH_EXPRESSION_TYPE: &str = "path_expression";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawString {
    QuotedString(String),
    UnquotedString(String),
    MultilineString(String),
    /// A multi-segment key, e.g. `a.b.c`. A single-segment key is represented
    /// directly as one of the other variants, never wrapped here.
    PathExpression(Vec<RawString>),
}

impl RawString {
    pub fn ty(&self) -> &'static str {
        match self {
            RawString::QuotedString(_) => RAW_QUOTED_STRING_TYPE,
            RawString::UnquotedString(_) => RAW_UNQUOTED_STRING_TYPE,
            RawString::MultilineString(_) => RAW_MULTILINE_STRING_TYPE,
            RawString::PathExpression(_) => RAW_PATH_EXPRESSION_TYPE,
        }
    }

    pub fn quoted(s: impl Into<String>) -> Self {
        RawString::QuotedString(s.into())
    }

    pub fn unquoted(s: impl Into<String>) -> Self {
        RawString::UnquotedString(s.into())
    }

    pub fn multiline(s: impl Into<String>) -> Self {
        RawString::MultilineString(s.into())
    }

    pub fn path_expression(segments: Vec<RawString>) -> Self {
        debug_assert!(segments.len() > 1, "single-segment keys must not be wrapped");
        RawString::PathExpression(segments)
    }

    /// Renders the literal value, irrespective of how it was spelled.
    pub fn value(&self) -> String {
        match self {
            RawString::QuotedString(s)
            | RawString::UnquotedString(s)
            | RawString::MultilineString(s) => s.clone(),
            RawString::PathExpression(segments) => segments.iter().map(|s| s.value()).join("."),
        }
    }

    /// Flattens this key into its dotted string segments, in order.
    pub fn as_path_segments(&self) -> Vec<String> {
        match self {
            RawString::QuotedString(s)
            | RawString::UnquotedString(s)
            | RawString::MultilineString(s) => vec![s.clone()],
            RawString::PathExpression(segments) => {
                segments.iter().flat_map(|s| s.as_path_segments()).collect()
            }
        }
    }

    pub fn as_path(&self) -> crate::Result<Path> {
        Path::from_segments(self.as_path_segments())
    }
}

impl From<&str> for RawString {
    fn from(value: &str) -> Self {
        RawString::quoted(value)
    }
}

impl From<String> for RawString {
    fn from(value: String) -> Self {
        RawString::quoted(value)
    }
}

impl From<Key> for RawString {
    fn from(value: Key) -> Self {
        RawString::quoted(value.to_string())
    }
}

impl Display for RawString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RawString::QuotedString(s) => write!(f, "{s}"),
            RawString::UnquotedString(s) => write!(f, "{s}"),
            RawString::MultilineString(s) => write!(f, "{s}"),
            RawString::PathExpression(segments) => write!(f, "{}", segments.iter().join(".")),
        }
    }
}
