//! Turns source text into a [`RawObject`](crate::raw::RawObject): the
//! character-level grammar lives in [`parser`], include resolution (which
//! needs filesystem/network access and therefore recurses back into the
//! parser for each fragment) lives in [`loader`].

mod frame;
pub(crate) mod loader;
pub(crate) mod parser;

use crate::options::ConfigOptions;
use crate::raw::raw_object::RawObject;
use std::path::Path;

/// Parses `text` and resolves every `include` directive it contains,
/// relative to `base_dir`. Returns a raw tree with no unresolved
/// inclusions left (dropped ones simply have no `Inclusion::val`).
pub(crate) fn parse_and_resolve_includes(
    text: &str,
    opts: &ConfigOptions,
    base_dir: &Path,
) -> crate::Result<RawObject> {
    let mut obj = parser::parse(text, opts)?;
    let mut chain = Vec::new();
    loader::resolve_includes(&mut obj, opts, base_dir, &mut chain)?;
    Ok(obj)
}
