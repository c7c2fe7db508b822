//! Collection trait for filtering

use crate::filters::Constraint;

/// A queryable view over stored records
///
/// Implementations never mutate `self`: `filter` and `distinct` return a new
/// view, leaving the original usable. Errors cover constraints the backing
/// store cannot evaluate (unknown fields, operand type mismatches).
pub trait Collection: Clone + Send + Sync {
    /// Error raised when a constraint cannot be evaluated
    type Error: std::error::Error + Send + Sync + 'static;

    /// Restrict the view to records matching `constraint`
    fn filter(&self, constraint: &Constraint) -> Result<Self, Self::Error>;

    /// Keep one record per distinct value of `field`
    fn distinct(&self, field: &str) -> Result<Self, Self::Error>;
}
