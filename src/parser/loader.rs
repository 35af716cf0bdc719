//! Resolves `include` directives: given a raw [`Inclusion`], finds the
//! target file (or URL), parses it, and recursively resolves any includes
//! it in turn contains.
//!
//! Candidate generation and the classpath/file/url search order follow
//! §4.4 of the format: extension-based syntax dispatch, duplicate
//! (resolved-path, syntax) pairs collapsed, `not-found` swallowed per
//! candidate, any other error short-circuiting the whole inclusion.

use std::path::{Path as StdPath, PathBuf};

use crate::error::Error;
use crate::options::ConfigOptions;
use crate::raw::field::ObjectField;
use crate::raw::include::{Inclusion, Location};
use crate::raw::number::Number;
use crate::raw::raw_array::RawArray;
use crate::raw::raw_object::RawObject;
use crate::raw::raw_string::RawString;
use crate::raw::raw_value::RawValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateSyntax {
    Hocon,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Fs(PathBuf),
    Url(String),
}

struct Candidate {
    target: Target,
    syntax: CandidateSyntax,
}

/// Walks `obj`'s fields (recursing into nested object/array/concat/add-assign
/// values) loading every `Inclusion` it finds. `base_dir` is the directory
/// the current document was loaded from; `chain` is the stack of
/// already-opened inclusion identities used for cycle detection.
pub(crate) fn resolve_includes(
    obj: &mut RawObject,
    opts: &ConfigOptions,
    base_dir: &StdPath,
    chain: &mut Vec<String>,
) -> crate::Result<()> {
    for field in obj.iter_mut() {
        match field {
            ObjectField::Inclusion(inclusion) => {
                if let Some(loaded) = load_inclusion(inclusion, opts, base_dir, chain)? {
                    inclusion.val = Some(loaded);
                }
            }
            ObjectField::KeyValue { value, .. } => {
                resolve_includes_in_value(value, opts, base_dir, chain)?;
            }
            ObjectField::NewlineComment(_) => {}
        }
    }
    Ok(())
}

fn resolve_includes_in_value(
    value: &mut RawValue,
    opts: &ConfigOptions,
    base_dir: &StdPath,
    chain: &mut Vec<String>,
) -> crate::Result<()> {
    match value {
        RawValue::Object(obj) => resolve_includes(obj, opts, base_dir, chain),
        RawValue::Array(arr) => {
            for item in arr.iter_mut() {
                resolve_includes_in_value(item, opts, base_dir, chain)?;
            }
            Ok(())
        }
        RawValue::Concat(concat) => {
            for item in concat.values_mut() {
                resolve_includes_in_value(item, opts, base_dir, chain)?;
            }
            Ok(())
        }
        RawValue::AddAssign(add_assign) => {
            resolve_includes_in_value(add_assign.value_mut(), opts, base_dir, chain)
        }
        _ => Ok(()),
    }
}

/// Loads and fully resolves one inclusion. Returns `Ok(None)` when a
/// non-required inclusion's candidates were all missing.
fn load_inclusion(
    inclusion: &Inclusion,
    opts: &ConfigOptions,
    base_dir: &StdPath,
    chain: &mut Vec<String>,
) -> crate::Result<Option<RawObject>> {
    if chain.len() >= opts.max_include_depth {
        return Err(Error::DepthExceeded {
            limit: opts.max_include_depth,
        });
    }
    let candidates = candidates_for(inclusion, opts, base_dir);
    let mut seen: Vec<(Target, CandidateSyntax)> = Vec::new();
    for candidate in candidates {
        let key = (candidate.target.clone(), candidate.syntax);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        match try_candidate(&candidate, opts, chain) {
            Ok(obj) => return Ok(Some(obj)),
            Err(CandidateError::NotFound) => continue,
            Err(CandidateError::Fatal(e)) => return Err(e),
        }
    }
    if inclusion.required {
        Err(Error::IncludeNotFound {
            path: inclusion.path.clone(),
        })
    } else {
        Ok(None)
    }
}

enum CandidateError {
    NotFound,
    Fatal(Error),
}

impl From<Error> for CandidateError {
    fn from(e: Error) -> Self {
        CandidateError::Fatal(e)
    }
}

fn try_candidate(
    candidate: &Candidate,
    opts: &ConfigOptions,
    chain: &mut Vec<String>,
) -> Result<RawObject, CandidateError> {
    match &candidate.target {
        Target::Fs(path) => try_fs_candidate(path, candidate.syntax, opts, chain),
        Target::Url(url) => try_url_candidate(url, candidate.syntax, opts, chain),
    }
}

fn try_fs_candidate(
    path: &StdPath,
    syntax: CandidateSyntax,
    opts: &ConfigOptions,
    chain: &mut Vec<String>,
) -> Result<RawObject, CandidateError> {
    let metadata = std::fs::metadata(path);
    if metadata.is_err() {
        return Err(CandidateError::NotFound);
    }
    let canonical = std::fs::canonicalize(path).map_err(Error::Io)?;
    let identity = canonical.to_string_lossy().into_owned();
    if chain.contains(&identity) {
        return Err(CandidateError::Fatal(Error::IncludeCycle(identity)));
    }
    let text = std::fs::read_to_string(&canonical).map_err(Error::Io)?;
    let obj = parse_candidate_text(&text, syntax, opts)?;
    let parent = canonical.parent().map(|p| p.to_path_buf()).unwrap_or_default();
    chain.push(identity);
    let result = resolve_nested(obj, opts, &parent, chain);
    chain.pop();
    result.map_err(CandidateError::Fatal)
}

fn try_url_candidate(
    url: &str,
    syntax: CandidateSyntax,
    opts: &ConfigOptions,
    chain: &mut Vec<String>,
) -> Result<RawObject, CandidateError> {
    if chain.contains(&url.to_string()) {
        return Err(CandidateError::Fatal(Error::IncludeCycle(url.to_string())));
    }
    #[cfg(feature = "url_includes")]
    {
        let parsed = url::Url::parse(url).map_err(Error::Url)?;
        let response = reqwest::blocking::get(parsed).map_err(Error::Http)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CandidateError::NotFound);
        }
        let text = response.text().map_err(Error::Http)?;
        let obj = parse_candidate_text(&text, syntax, opts)?;
        chain.push(url.to_string());
        let cwd = std::env::current_dir().unwrap_or_default();
        let result = resolve_nested(obj, opts, &cwd, chain);
        chain.pop();
        result.map_err(CandidateError::Fatal)
    }
    #[cfg(not(feature = "url_includes"))]
    {
        let _ = (syntax, opts);
        Err(CandidateError::NotFound)
    }
}

fn resolve_nested(
    mut obj: RawObject,
    opts: &ConfigOptions,
    base_dir: &StdPath,
    chain: &mut Vec<String>,
) -> crate::Result<RawObject> {
    resolve_includes(&mut obj, opts, base_dir, chain)?;
    Ok(obj)
}

fn parse_candidate_text(
    text: &str,
    syntax: CandidateSyntax,
    opts: &ConfigOptions,
) -> Result<RawObject, CandidateError> {
    match syntax {
        CandidateSyntax::Hocon => {
            crate::parser::parser::parse(text, opts).map_err(CandidateError::Fatal)
        }
        CandidateSyntax::Json => {
            let value: serde_json::Value =
                serde_json::from_str(text).map_err(|e| CandidateError::Fatal(Error::Json(e)))?;
            json_to_raw_object(value).map_err(CandidateError::Fatal)
        }
    }
}

/// Extension-based candidate dispatch, per §4.4: `.conf`/`.hocon` is HOCON
/// only, `.json` is JSON only, any other extension stays HOCON, and an
/// extensionless path tries itself as HOCON, then with `.conf`, then with
/// `.json`.
fn extension_candidates(path: &str) -> Vec<(String, CandidateSyntax)> {
    let ext = StdPath::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("conf") | Some("hocon") => vec![(path.to_string(), CandidateSyntax::Hocon)],
        Some("json") => vec![(path.to_string(), CandidateSyntax::Json)],
        Some(_) => vec![(path.to_string(), CandidateSyntax::Hocon)],
        None => vec![
            (path.to_string(), CandidateSyntax::Hocon),
            (format!("{path}.conf"), CandidateSyntax::Hocon),
            (format!("{path}.json"), CandidateSyntax::Json),
        ],
    }
}

fn candidates_for(inclusion: &Inclusion, opts: &ConfigOptions, base_dir: &StdPath) -> Vec<Candidate> {
    let extension_candidates = extension_candidates(&inclusion.path);
    let mut out = Vec::new();
    match inclusion.location {
        Some(Location::Classpath) => {
            if !StdPath::new(&inclusion.path).is_absolute() {
                for dir in &opts.classpath {
                    for (candidate_path, syntax) in &extension_candidates {
                        out.push(Candidate {
                            target: Target::Fs(dir.join(candidate_path)),
                            syntax: *syntax,
                        });
                    }
                }
            }
        }
        Some(Location::Url) => {
            for (candidate_path, syntax) in &extension_candidates {
                out.push(Candidate {
                    target: Target::Url(candidate_path.clone()),
                    syntax: *syntax,
                });
            }
        }
        Some(Location::File) | None => {
            for (candidate_path, syntax) in &extension_candidates {
                let p = StdPath::new(candidate_path);
                if p.is_absolute() {
                    out.push(Candidate {
                        target: Target::Fs(p.to_path_buf()),
                        syntax: *syntax,
                    });
                } else {
                    out.push(Candidate {
                        target: Target::Fs(base_dir.join(p)),
                        syntax: *syntax,
                    });
                    if let Ok(cwd) = std::env::current_dir() {
                        out.push(Candidate {
                            target: Target::Fs(cwd.join(p)),
                            syntax: *syntax,
                        });
                    }
                }
            }
        }
    }
    out
}

/// Lifts a JSON document's root object into a `RawObject`: integers split
/// into `PosInt`/`NegInt` by sign, fractional numbers become `Float`,
/// arrays and scalars map directly, and object keys are sorted.
fn json_to_raw_object(value: serde_json::Value) -> crate::Result<RawObject> {
    use serde::de::Error as _;
    match json_to_raw_value(value) {
        RawValue::Object(obj) => Ok(obj),
        other => Err(Error::Json(serde_json::Error::custom(format!(
            "JSON include must have an object at its root, found {}",
            other.ty()
        )))),
    }
}

fn json_to_raw_value(value: serde_json::Value) -> RawValue {
    match value {
        serde_json::Value::Null => RawValue::Null,
        serde_json::Value::Bool(b) => RawValue::Boolean(b),
        serde_json::Value::Number(n) => RawValue::Number(Number::from(&n)),
        serde_json::Value::String(s) => RawValue::String(RawString::quoted(s)),
        serde_json::Value::Array(items) => {
            RawValue::Array(RawArray::new(items.into_iter().map(json_to_raw_value).collect()))
        }
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(String, serde_json::Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let fields = entries
                .into_iter()
                .map(|(k, v)| ObjectField::key_value(RawString::quoted(k), json_to_raw_value(v)))
                .collect();
            RawValue::Object(RawObject::new(fields))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensionless_path_tries_hocon_then_conf_then_json() {
        let candidates = extension_candidates("a");
        assert_eq!(
            candidates,
            vec![
                ("a".to_string(), CandidateSyntax::Hocon),
                ("a.conf".to_string(), CandidateSyntax::Hocon),
                ("a.json".to_string(), CandidateSyntax::Json),
            ]
        );
    }

    #[test]
    fn json_extension_is_json_only() {
        assert_eq!(
            extension_candidates("a.json"),
            vec![("a.json".to_string(), CandidateSyntax::Json)]
        );
    }

    #[test]
    fn json_object_keys_sort() {
        let value: serde_json::Value = serde_json::json!({"b": 1, "a": 2});
        let obj = json_to_raw_object(value).unwrap();
        let keys: Vec<&str> = obj
            .fields()
            .iter()
            .map(|f| match f {
                ObjectField::KeyValue { key, .. } => match key {
                    RawString::QuotedString(s) => s.as_str(),
                    _ => unreachable!(),
                },
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
