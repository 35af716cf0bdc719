use crate::raw::raw_string::RawString;
use std::fmt::{Display, Formatter};

/// `${path}` or, when `optional` is set, `${?path}`. Whitespace around a
/// substitution inside a concat is tracked by the enclosing `Concat`, not
/// by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Substitution {
    pub path: RawString,
    pub optional: bool,
}

impl Substitution {
    pub fn new(path: RawString, optional: bool) -> Self {
        Substitution { path, optional }
    }
}

impl Display for Substitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${{")?;
        if self.optional {
            write!(f, "?")?;
        }
        write!(f, "{}", self.path)?;
        write!(f, "}}")
    }
}
