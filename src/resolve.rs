//! Drives the merge/substitution pipeline that turns a parsed document
//! into a fully resolved tree.

use crate::merge::memo::Memo;
use crate::merge::object::Object;
use crate::options::ConfigOptions;
use crate::raw::raw_object::RawObject;

/// Bounds the substitution recursion; independent of the parser's
/// `max_depth`, which bounds structural nesting instead.
const MAX_SUBSTITUTION_DEPTH: usize = 32;

/// Lifts a raw parse tree into a merge tree and resolves it: deep-merges
/// duplicate keys, then walks the result substituting every reference and
/// collapsing every concatenation, until no transient node remains.
pub(crate) fn resolve(document: RawObject, opts: &ConfigOptions) -> crate::Result<Object> {
    let mut working = Object::new(document)?;
    let root = working.clone();
    let mut memo = Memo::new(MAX_SUBSTITUTION_DEPTH);
    working.substitute_in_place(&root, &mut memo, None, opts)?;
    working.resolve_add_assign_sweep();
    working.try_become_merged();
    Ok(working)
}
