//! Dynamic query filters
//!
//! List endpoints accept repeated `filter` parameters holding JSON objects,
//! a `cond` parameter choosing how they combine, and an optional `distinct`
//! field. [`FilterResolver`] validates them against a [`FilterConfig`] and
//! applies the result to any [`Collection`](crate::core::store::Collection).

pub mod condition;
pub mod constraint;
pub mod expression;
pub mod lookup;
pub mod resolver;

pub use crate::core::error::FilterError;
pub use condition::Condition;
pub use constraint::Constraint;
pub use expression::FilterExpression;
pub use lookup::{FieldLookup, Lookup};
pub use resolver::{FilterConfig, FilterResolver, resolve};
