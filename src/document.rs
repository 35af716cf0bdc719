//! Entry points: turn source text, a file, a reader, or a URL into an
//! unresolved [`Document`], then [`resolve`] it into a [`Value`] tree.
//!
//! Per §5, every operation here is a synchronous, single-threaded call
//! tree; the only suspension points are the blocking reads inside include
//! resolution, which never interleave with anything else.

use std::io::Read;
use std::path::Path;

use crate::options::ConfigOptions;
use crate::parser;
use crate::raw::raw_object::RawObject;
use crate::value::{self, Value};

/// A parsed-but-unresolved document: a raw tree whose `include` directives
/// have already been loaded, but whose substitutions, concatenations, and
/// add-assigns have not yet been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    raw: RawObject,
    options: ConfigOptions,
}

impl Document {
    pub(crate) fn new(raw: RawObject, options: ConfigOptions) -> Self {
        Document { raw, options }
    }
}

/// Parses `text` as a standalone document: includes resolve relative to
/// the current working directory, since there is no enclosing file.
pub fn parse_string(text: &str, options: ConfigOptions) -> crate::Result<Document> {
    let base_dir = std::env::current_dir().unwrap_or_default();
    let raw = parser::parse_and_resolve_includes(text, &options, &base_dir)?;
    Ok(Document::new(raw, options))
}

/// Parses the file at `path`; includes with a relative `file(...)` or
/// bare path resolve against `path`'s parent directory first.
pub fn parse_file(path: impl AsRef<Path>, options: ConfigOptions) -> crate::Result<Document> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let base_dir = path.parent().map(|p| p.to_path_buf()).unwrap_or_default();
    let raw = parser::parse_and_resolve_includes(&text, &options, &base_dir)?;
    Ok(Document::new(raw, options))
}

/// Parses an arbitrary `Read` stream into a document, reading it fully
/// into memory first (the parser operates on a byte slice, not a stream).
pub fn parse_reader(mut reader: impl Read, options: ConfigOptions) -> crate::Result<Document> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_string(&text, options)
}

#[cfg(feature = "url_includes")]
/// Fetches and parses the document at `url`. Includes resolve relative to
/// the current working directory; the fetched document's own relative
/// includes are resolved the same way a `url(...)` inclusion would be.
pub fn parse_url(url: &str, options: ConfigOptions) -> crate::Result<Document> {
    let parsed = url::Url::parse(url)?;
    let response = reqwest::blocking::get(parsed)?;
    let text = response.text()?;
    parse_string(&text, options)
}

/// Runs the merge/substitution pipeline on a parsed document, producing a
/// fully resolved host value tree.
pub fn resolve(document: Document) -> crate::Result<Value> {
    let object = crate::resolve::resolve(document.raw, &document.options)?;
    Ok(value::export_root(object))
}

/// Convenience: `parse_file` followed by `resolve`.
pub fn load(path: impl AsRef<Path>, options: ConfigOptions) -> crate::Result<Value> {
    resolve(parse_file(path, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_resolves_to_empty_object() {
        let doc = parse_string("", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 0);
    }

    #[test]
    fn append_assign_creates_array() {
        let doc = parse_string("a += 1\na += 2", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        let arr = value.as_object().unwrap().get("a").unwrap().as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0].as_i64(), Some(1));
        assert_eq!(arr[1].as_i64(), Some(2));
    }

    #[test]
    fn substitution_resolves_to_referenced_value() {
        let doc = parse_string("x = 1\ny = ${x}", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("y").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn optional_substitution_elides_missing_key() {
        let doc = parse_string("y = ${?missing}", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    #[test]
    fn substitution_cycle_is_detected() {
        let doc = parse_string("a = ${b}\nb = ${a}", ConfigOptions::default()).unwrap();
        let err = resolve(doc).unwrap_err();
        assert!(matches!(err, crate::error::Error::SubstitutionCycle { .. }));
    }

    #[test]
    fn string_concatenation_joins_with_space() {
        let doc = parse_string("a = hello world", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        assert_eq!(value.as_object().unwrap().get("a").unwrap().as_str(), Some("hello world"));
    }

    #[test]
    fn later_object_assignment_replaces_nested_merge() {
        let doc = parse_string("a.b = 1\na.c = 2\na = { d = 3 }", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        let a = value.as_object().unwrap().get("a").unwrap().as_object().unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a.get("d").unwrap().as_i64(), Some(3));
    }

    #[test]
    fn nested_key_after_object_assignment_merges_in() {
        let doc = parse_string("a = { d = 3 }\na.b = 1", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        let a = value.as_object().unwrap().get("a").unwrap().as_object().unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.get("d").unwrap().as_i64(), Some(3));
        assert_eq!(a.get("b").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn duplicate_key_takes_last_assignment() {
        let doc = parse_string("a = 1\na = 2", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        assert_eq!(value.as_object().unwrap().get("a").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn null_concatenates_with_a_following_string_token() {
        let doc = parse_string("a = null foo", ConfigOptions::default()).unwrap();
        let value = resolve(doc).unwrap();
        assert_eq!(value.as_object().unwrap().get("a").unwrap().as_str(), Some("null foo"));
    }
}
