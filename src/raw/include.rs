//! `include` directive: a path, a `required` flag, an optional location
//! tag, and -- once the loader has run -- the loaded fragment.

use crate::raw::raw_object::RawObject;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    File,
    Classpath,
    Url,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::File => write!(f, "file"),
            Location::Classpath => write!(f, "classpath"),
            Location::Url => write!(f, "url"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inclusion {
    pub path: String,
    pub required: bool,
    pub location: Option<Location>,
    /// Populated by the include loader; `None` means a non-required
    /// inclusion whose candidates were all missing.
    pub val: Option<RawObject>,
}

impl Inclusion {
    pub fn new(path: impl Into<String>, required: bool, location: Option<Location>) -> Self {
        Inclusion {
            path: path.into(),
            required,
            location,
            val: None,
        }
    }

    pub fn with_loaded(mut self, obj: RawObject) -> Self {
        self.val = Some(obj);
        self
    }
}
