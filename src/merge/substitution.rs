use crate::path::Path;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Substitution {
    pub(crate) path: Path,
    pub(crate) optional: bool,
}

impl Substitution {
    pub(crate) fn new(path: Path, optional: bool) -> Self {
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

impl TryFrom<crate::raw::substitution::Substitution> for Substitution {
    type Error = crate::error::Error;

    fn try_from(value: crate::raw::substitution::Substitution) -> Result<Self, Self::Error> {
        Ok(Substitution::new(value.path.as_path()?, value.optional))
    }
}
