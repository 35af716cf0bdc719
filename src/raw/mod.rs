//! The parser's output algebra: values exactly as the source text
//! expressed them, concatenation and whitespace intact.

pub mod add_assign;
pub mod comment;
pub mod concat;
pub mod field;
pub mod include;
pub mod number;
pub mod raw_array;
pub mod raw_object;
pub mod raw_string;
pub mod raw_value;
pub mod substitution;

pub use add_assign::AddAssign;
pub use concat::Concat;
pub use field::ObjectField;
pub use include::{Inclusion, Location};
pub use number::Number;
pub use raw_array::RawArray;
pub use raw_object::RawObject;
pub use raw_string::RawString;
pub use raw_value::RawValue;
pub use substitution::Substitution;
