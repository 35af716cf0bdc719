use tracing::trace;

use crate::error::Error;
use crate::merge::{
    add_assign::AddAssign, array::Array, concat::Concat, delay_replacement::DelayReplacement,
    memo::Memo, object::Object, substitution::Substitution,
};
use crate::path::Path;
use crate::raw::number::Number;
use crate::options::ConfigOptions;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum Value {
    Object(Object),
    Array(Array),
    Boolean(bool),
    #[default]
    Null,
    /// Placeholder for "no value here yet", distinct from an explicit `null`.
    None,
    String(String),
    Number(Number),
    Substitution(Substitution),
    Concat(Concat),
    AddAssign(AddAssign),
    DelayReplacement(DelayReplacement),
}

impl Value {
    pub(crate) fn object(o: impl Into<Object>) -> Value {
        Value::Object(o.into())
    }

    pub(crate) fn array(a: impl Into<Array>) -> Value {
        Value::Array(a.into())
    }

    pub(crate) fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub(crate) fn delay_replacement<I>(values: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        Value::DelayReplacement(DelayReplacement::from_iter(values).flatten())
    }

    pub(crate) fn ty(&self) -> &'static str {
        match self {
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Boolean(_) => "boolean",
            Value::Null => "null",
            Value::None => "none",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Substitution(_) => "substitution",
            Value::Concat(_) => "concat",
            Value::AddAssign(_) => "add_assign",
            Value::DelayReplacement(_) => "delay_replacement",
        }
    }

    pub(crate) fn is_merged(&self) -> bool {
        match self {
            Value::Object(object) => object.is_merged(),
            Value::Array(array) => array.is_merged(),
            Value::Boolean(_) | Value::Null | Value::None | Value::String(_) | Value::Number(_) => {
                true
            }
            Value::Substitution(_)
            | Value::Concat(_)
            | Value::AddAssign(_)
            | Value::DelayReplacement(_) => false,
        }
    }

    pub(crate) fn try_become_merged(&mut self) -> bool {
        match self {
            Value::Object(object) => object.try_become_merged(),
            Value::Array(array) => array.try_become_merged(),
            Value::Boolean(_) | Value::Null | Value::None | Value::String(_) | Value::Number(_) => {
                true
            }
            Value::Substitution(_)
            | Value::Concat(_)
            | Value::AddAssign(_)
            | Value::DelayReplacement(_) => false,
        }
    }

    /// Converts a lingering `AddAssign` leaf into a one-element array; run
    /// after every field installation, per the Merge algorithm.
    pub(crate) fn resolve_add_assign(self) -> Value {
        match self {
            Value::AddAssign(add_assign) => {
                let inner = add_assign.into_inner();
                Value::Array(Array::new(vec![std::cell::RefCell::new(inner)]))
            }
            other => other,
        }
    }

    /// Computes the effective value when `right` is assigned at `path`,
    /// which already holds `left`.
    pub(crate) fn replace(path: &Path, left: Value, right: Value) -> crate::Result<Value> {
        trace!("replace at {path}: {left} <- {right}");
        let result = match left {
            Value::Object(mut left_obj) => match right {
                Value::Object(right_obj) => {
                    left_obj.merge(right_obj, Some(path))?;
                    Value::object(left_obj)
                }
                Value::Array(_) | Value::Boolean(_) | Value::Null | Value::None
                | Value::String(_) | Value::Number(_) => right,
                Value::Substitution(_) | Value::DelayReplacement(_) => {
                    Value::delay_replacement(vec![Value::object(left_obj), right])
                }
                Value::Concat(concat) => {
                    let resolved = concat.try_resolve(path)?;
                    match resolved {
                        Value::Object(right_obj) => {
                            left_obj.merge(right_obj, Some(path))?;
                            Value::object(left_obj)
                        }
                        Value::Concat(mut still) => {
                            still.push_front(Value::object(left_obj), None);
                            Value::Concat(still)
                        }
                        other => other,
                    }
                }
                Value::AddAssign(_) => {
                    return Err(Error::ConcatenateDifferentType {
                        path: path.to_string(),
                        ty1: "object",
                        ty2: "add_assign",
                    });
                }
            },
            Value::Array(mut left_array) => match right {
                Value::AddAssign(add_assign) => {
                    let appended = add_assign.into_inner();
                    let appended_merged = appended.is_merged();
                    left_array.push(std::cell::RefCell::new(appended));
                    if !appended_merged {
                        left_array.as_unmerged();
                    }
                    Value::array(left_array)
                }
                Value::Substitution(_) | Value::DelayReplacement(_) => {
                    Value::delay_replacement(vec![Value::array(left_array), right])
                }
                Value::Concat(concat) => {
                    let resolved = concat.try_resolve(path)?;
                    match resolved {
                        Value::Array(right_array) => {
                            Value::concatenate(path, Value::array(left_array), None, Value::array(right_array))?
                        }
                        Value::Concat(still) => {
                            Value::delay_replacement(vec![Value::array(left_array), Value::Concat(still)])
                        }
                        other => other,
                    }
                }
                other => other,
            },
            Value::Null => match right {
                Value::AddAssign(_) => {
                    return Err(Error::ConcatenateDifferentType {
                        path: path.to_string(),
                        ty1: "null",
                        ty2: "add_assign",
                    });
                }
                other => other,
            },
            Value::None => match right {
                Value::AddAssign(add_assign) => {
                    let inner = add_assign.into_inner();
                    Value::array(Array::new(vec![std::cell::RefCell::new(inner)]))
                }
                other => other,
            },
            Value::Boolean(_) | Value::String(_) | Value::Number(_) => match right {
                Value::Substitution(_) => Value::delay_replacement(vec![left, right]),
                Value::Concat(concat) => {
                    let resolved = concat.try_resolve(path)?;
                    if resolved.is_merged() {
                        resolved
                    } else {
                        Value::delay_replacement(vec![left, resolved])
                    }
                }
                Value::AddAssign(_) => {
                    return Err(Error::ConcatenateDifferentType {
                        path: path.to_string(),
                        ty1: left.ty(),
                        ty2: "add_assign",
                    });
                }
                other => other,
            },
            Value::Substitution(_) | Value::Concat(_) | Value::DelayReplacement(_) => {
                Value::delay_replacement(vec![left, right])
            }
            Value::AddAssign(_) => right,
        };
        trace!("replace result: {result}");
        Ok(result)
    }

    /// Value-juxtaposition inside a Concat.
    pub(crate) fn concatenate(
        path: &Path,
        left: Value,
        space: Option<String>,
        right: Value,
    ) -> crate::Result<Value> {
        trace!("concatenate at {path}: {left} <{space:?}> {right}");
        let result = match left {
            Value::Object(mut left_obj) => match right {
                Value::None => Value::object(left_obj),
                Value::Object(right_obj) => {
                    left_obj.merge(right_obj, Some(path))?;
                    Value::object(left_obj)
                }
                Value::Array(_) | Value::Boolean(_) | Value::Null | Value::String(_)
                | Value::Number(_) | Value::AddAssign(_) => {
                    return Err(Error::ConcatenateDifferentType {
                        path: path.to_string(),
                        ty1: "object",
                        ty2: right.ty(),
                    });
                }
                Value::Substitution(_) | Value::DelayReplacement(_) => {
                    Value::Concat(Concat::pair(Value::object(left_obj), space, right))
                }
                Value::Concat(mut concat) => {
                    concat.push_front(Value::object(left_obj), space);
                    Value::Concat(concat)
                }
            },
            Value::Array(mut left_array) => match right {
                Value::Array(right_array) => {
                    let merged = left_array.is_merged() && right_array.is_merged();
                    left_array.extend(right_array.into_inner());
                    if !merged {
                        left_array.as_unmerged();
                    }
                    Value::array(left_array)
                }
                other => {
                    return Err(Error::ConcatenateDifferentType {
                        path: path.to_string(),
                        ty1: "array",
                        ty2: other.ty(),
                    });
                }
            },
            Value::None => match right {
                Value::Boolean(_) | Value::Null | Value::String(_) | Value::Number(_) => {
                    let prefix = space.unwrap_or_default();
                    Value::string(format!("{prefix}{right}"))
                }
                Value::None => Value::None,
                Value::Substitution(_) => Value::Concat(Concat::pair(Value::None, space, right)),
                other => other,
            },
            Value::Boolean(_) | Value::Null | Value::String(_) | Value::Number(_) => match right {
                Value::Boolean(_) | Value::Null | Value::String(_) | Value::Number(_) => {
                    let sep = space.unwrap_or_default();
                    Value::string(format!("{left}{sep}{right}"))
                }
                Value::None => {
                    let suffix = space.unwrap_or_default();
                    Value::string(format!("{left}{suffix}"))
                }
                Value::Substitution(_) => Value::Concat(Concat::pair(left, space, right)),
                other => {
                    return Err(Error::ConcatenateDifferentType {
                        path: path.to_string(),
                        ty1: left.ty(),
                        ty2: other.ty(),
                    });
                }
            },
            Value::Substitution(_) | Value::DelayReplacement(_) => {
                Value::Concat(Concat::pair(left, space, right))
            }
            Value::Concat(mut concat) => {
                concat.push_back(right, space);
                Value::Concat(concat)
            }
            Value::AddAssign(_) => {
                return Err(Error::ConcatenateDifferentType {
                    path: path.to_string(),
                    ty1: left.ty(),
                    ty2: right.ty(),
                });
            }
        };
        trace!("concatenate result: {result}");
        Ok(result)
    }

    /// Post-order substitution. Returns the resolved value; containers
    /// recurse into their children first.
    pub(crate) fn substitute(
        self,
        root: &Object,
        memo: &mut Memo,
        path: &Path,
        opts: &ConfigOptions,
    ) -> crate::Result<Value> {
        let resolved = match self {
            Value::Object(mut object) => {
                object.substitute_in_place(root, memo, Some(path), opts)?;
                object.try_become_merged();
                Value::Object(object)
            }
            Value::Array(mut array) => {
                for (i, cell) in array.iter_mut().enumerate() {
                    let index_path = path.clone().with_pushed(i);
                    let val = std::mem::take(&mut *cell.borrow_mut());
                    *cell.borrow_mut() = val.substitute(root, memo, &index_path, opts)?;
                }
                array.try_become_merged();
                Value::Array(array)
            }
            Value::Boolean(_) | Value::Null | Value::None | Value::String(_) | Value::Number(_) => {
                self
            }
            Value::Substitution(substitution) => {
                Self::substitute_reference(substitution, root, memo, path, opts)?
            }
            Value::Concat(mut concat) => {
                for cell in concat.iter_mut() {
                    let val = std::mem::take(&mut *cell.borrow_mut());
                    *cell.borrow_mut() = val.substitute(root, memo, path, opts)?;
                }
                concat.try_resolve(path)?
            }
            Value::AddAssign(mut add_assign) => {
                let inner = std::mem::take(add_assign.inner_mut());
                let resolved = inner.substitute(root, memo, path, opts)?;
                Value::AddAssign(AddAssign::new(resolved))
            }
            Value::DelayReplacement(mut delay) => {
                for cell in delay.iter_mut() {
                    let val = std::mem::take(&mut *cell.borrow_mut());
                    *cell.borrow_mut() = val.substitute(root, memo, path, opts)?;
                }
                delay.resolve(path)?
            }
        };
        Ok(resolved)
    }

    fn substitute_reference(
        substitution: Substitution,
        root: &Object,
        memo: &mut Memo,
        path: &Path,
        opts: &ConfigOptions,
    ) -> crate::Result<Value> {
        memo.enter(path)?;
        let result = Self::resolve_substitution(&substitution, root, memo, opts);
        memo.exit();
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                if substitution.optional && matches!(err, Error::SubstitutionNotFound { .. }) {
                    Ok(Value::None)
                } else {
                    Err(err)
                }
            }
        }
    }

    fn resolve_substitution(
        substitution: &Substitution,
        root: &Object,
        memo: &mut Memo,
        opts: &ConfigOptions,
    ) -> crate::Result<Value> {
        if let Some(found) = root.get_by_path(&substitution.path) {
            if let Value::Substitution(inner) = &found
                && inner.path == substitution.path
            {
                return if substitution.optional {
                    Ok(Value::None)
                } else {
                    Err(Error::SubstitutionCycle {
                        current: substitution.path.to_string(),
                        backtrace: vec![substitution.path.to_string()],
                    })
                };
            }
            return found.substitute(root, memo, &substitution.path, opts);
        }
        if opts.use_system_environment
            && let Ok(value) = std::env::var(substitution.path.to_string())
        {
            return Ok(Value::string(value));
        }
        if substitution.optional {
            Ok(Value::None)
        } else {
            Err(Error::SubstitutionNotFound {
                path: substitution.path.to_string(),
            })
        }
    }
}

impl TryFrom<crate::raw::raw_value::RawValue> for Value {
    type Error = Error;

    fn try_from(value: crate::raw::raw_value::RawValue) -> Result<Self, Self::Error> {
        use crate::raw::raw_value::RawValue;
        let value = match value {
            RawValue::Object(raw_object) => Value::object(Object::new(raw_object)?),
            RawValue::Array(raw_array) => Value::array(Array::try_from(raw_array)?),
            RawValue::Boolean(b) => Value::Boolean(b),
            RawValue::Null => Value::Null,
            RawValue::String(raw_string) => Value::string(raw_string.value()),
            RawValue::Number(number) => Value::Number(number),
            RawValue::Substitution(substitution) => {
                Value::Substitution(substitution.try_into()?)
            }
            RawValue::Concat(concat) => Value::Concat(concat.try_into()?),
            RawValue::AddAssign(add_assign) => Value::AddAssign(add_assign.try_into()?),
        };
        Ok(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Object(object) => write!(f, "{object}"),
            Value::Array(array) => write!(f, "{array}"),
            Value::Boolean(boolean) => write!(f, "{boolean}"),
            Value::Null => write!(f, "null"),
            Value::None => write!(f, ""),
            Value::String(string) => write!(f, "{string}"),
            Value::Number(number) => write!(f, "{number}"),
            Value::Substitution(substitution) => write!(f, "{substitution}"),
            Value::Concat(concat) => write!(f, "{concat}"),
            Value::AddAssign(add_assign) => write!(f, "{add_assign}"),
            Value::DelayReplacement(delay) => write!(f, "{delay}"),
        }
    }
}
