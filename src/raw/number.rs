//! Numeric literal variants. The lexical form that produced a literal
//! determines its representation: a non-negative integer becomes `PosInt`
//! (so literals that overflow `i64` but fit `u64` are preserved exactly),
//! a negative integer becomes `NegInt`, and anything with a `.`, `e`, or
//! `E` becomes `Float`.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn ty(&self) -> &'static str {
        "number"
    }
}

impl Eq for Number {}

impl std::hash::Hash for Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Number::PosInt(n) => n.hash(state),
            Number::NegInt(n) => n.hash(state),
            Number::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::PosInt(n) => write!(f, "{n}"),
            Number::NegInt(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<Number> for serde_json::Number {
    fn from(value: Number) -> Self {
        match value {
            Number::PosInt(n) => serde_json::Number::from(n),
            Number::NegInt(n) => serde_json::Number::from(n),
            Number::Float(n) => {
                serde_json::Number::from_f64(n).unwrap_or_else(|| serde_json::Number::from(0))
            }
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(value: &serde_json::Number) -> Self {
        if let Some(n) = value.as_u64() {
            Number::PosInt(n)
        } else if let Some(n) = value.as_i64() {
            Number::NegInt(n)
        } else {
            Number::Float(value.as_f64().unwrap_or(0.0))
        }
    }
}
