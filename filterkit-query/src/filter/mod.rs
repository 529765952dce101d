//! Filter declarations: value types, operator variants and templates.

pub mod map;
pub mod template;
pub mod types;
pub mod value;

pub use map::{DeclareOptions, Declaration, FilterMap, FilterMapBuilder};
pub use template::{BindKind, Operator, PredicateTemplate, ValueTransform, placeholder};
pub use types::{FilterType, VariantSpec};
pub use value::FilterValue;
