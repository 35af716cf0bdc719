//! A HOCON (Human-Optimized Config Object Notation) parser and resolver.
//!
//! ```
//! use hocon::{ConfigOptions, document};
//!
//! let doc = document::parse_string("a = 1\nb = ${a}", ConfigOptions::default()).unwrap();
//! let value = document::resolve(doc).unwrap();
//! assert_eq!(value.as_object().unwrap().get("b").unwrap().as_i64(), Some(1));
//! ```

pub mod document;
pub mod error;
pub mod options;
pub mod value;

pub(crate) mod lex;
pub(crate) mod merge;
pub(crate) mod parser;
pub(crate) mod path;
pub(crate) mod raw;
pub(crate) mod reader;
pub(crate) mod resolve;

#[cfg(feature = "url_includes")]
pub use document::parse_url;
pub use document::{Document, load, parse_file, parse_reader, parse_string, resolve};
pub use options::ConfigOptions;
pub use value::Value;

pub type Result<T> = std::result::Result<T, error::Error>;
