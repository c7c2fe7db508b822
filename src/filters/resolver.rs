//! Dynamic filter resolution
//!
//! Turns the `filter`, `cond` and `distinct` query parameters of a list
//! request into a filtered view of a [`Collection`].

use super::condition::Condition;
use super::constraint::Constraint;
use super::expression::FilterExpression;
use crate::core::error::FilterError;
use crate::core::query::FilterParams;
use crate::core::store::Collection;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Per-endpoint filter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Fields that must appear in at least one expression
    #[serde(default)]
    pub required_filter_fields: Vec<String>,

    /// Public key -> real field name
    #[serde(default)]
    pub filter_aliases: HashMap<String, String>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_filter_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, field: impl Into<String>) -> Self {
        self.filter_aliases.insert(alias.into(), field.into());
        self
    }
}

/// Resolves filter parameters against collections using a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct FilterResolver {
    config: FilterConfig,
}

impl FilterResolver {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Apply `params` to `collection`
    pub fn resolve<C: Collection>(
        &self,
        params: &FilterParams,
        collection: &C,
    ) -> Result<C, FilterError> {
        resolve(
            &params.filter,
            params.cond.as_deref(),
            &self.config.required_filter_fields,
            &self.config.filter_aliases,
            params.distinct.as_deref(),
            collection,
        )
    }
}

/// Filter `collection` with raw `filter` expressions
///
/// 1. `condition` defaults to AND when absent; unknown values are rejected.
/// 2. Every expression must decode to a JSON object.
/// 3. Keys are rewritten through `aliases`.
/// 4. Every `required_fields` entry must appear in some expression.
/// 5. With no expressions the collection is returned as-is.
/// 6. Expressions are combined with `condition` and applied.
/// 7. A non-empty `distinct_field` collapses duplicates.
pub fn resolve<C, S>(
    raw_expressions: &[S],
    condition: Option<&str>,
    required_fields: &[String],
    aliases: &HashMap<String, String>,
    distinct_field: Option<&str>,
    collection: &C,
) -> Result<C, FilterError>
where
    C: Collection,
    S: AsRef<str>,
{
    let condition = Condition::parse(condition)?;

    let expressions = raw_expressions
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            FilterExpression::parse(index, raw.as_ref()).map(|expr| expr.with_aliases(aliases))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !required_fields.is_empty() {
        check_required_fields(&expressions, required_fields)?;
    }

    tracing::debug!(
        expressions = expressions.len(),
        condition = %condition,
        distinct = distinct_field.unwrap_or_default(),
        "resolving filters"
    );

    let Some(constraint) = Constraint::combine(condition, expressions) else {
        return Ok(collection.clone());
    };

    let filtered = collection
        .filter(&constraint)
        .map_err(FilterError::evaluation)?;

    match distinct_field.filter(|field| !field.is_empty()) {
        Some(field) => filtered.distinct(field).map_err(FilterError::evaluation),
        None => Ok(filtered),
    }
}

fn check_required_fields(
    expressions: &[FilterExpression],
    required_fields: &[String],
) -> Result<(), FilterError> {
    let supplied: HashSet<&str> = expressions.iter().flat_map(|e| e.fields()).collect();

    let mut seen = HashSet::new();
    let missing: Vec<String> = required_fields
        .iter()
        .filter(|field| !supplied.contains(field.as_str()))
        .filter(|field| seen.insert(field.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::warn!(missing = ?missing, "filter request is missing required fields");
        Err(FilterError::MissingRequiredField { missing })
    }
}
