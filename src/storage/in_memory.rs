//! In-memory collection of JSON records
//!
//! Useful for tests, fixtures and small data sets served straight from memory.

use crate::core::store::Collection;
use crate::filters::expression::json_kind;
use crate::filters::{Constraint, FieldLookup, FilterExpression, Lookup};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while evaluating a constraint against JSON records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Cannot resolve keyword '{field}' into field. Choices are: {choices}")]
    UnknownField { field: String, choices: String },

    #[error("Field '{field}' lookup '{lookup}' expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        lookup: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Immutable view over a shared vector of JSON records
///
/// Cloning is cheap; filtering produces a new view and leaves the source
/// untouched. With a schema, keys naming unknown top-level fields are
/// rejected instead of silently matching nothing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollection {
    records: Arc<Vec<Value>>,
    schema: Option<Arc<BTreeSet<String>>>,
}

impl InMemoryCollection {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(records),
            schema: None,
        }
    }

    /// Serialize typed items into a collection
    pub fn from_items<T: Serialize>(items: &[T]) -> serde_json::Result<Self> {
        let records = items
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self::new(records))
    }

    /// Restrict filterable fields to `fields`
    pub fn with_schema<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema = Some(Arc::new(fields.into_iter().map(Into::into).collect()));
        self
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.records.to_vec()
    }

    /// Deserialize records back into typed items
    pub fn items<T: DeserializeOwned>(&self) -> serde_json::Result<Vec<T>> {
        self.records
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn with_records(&self, records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(records),
            schema: self.schema.clone(),
        }
    }

    fn check_field(&self, field: &str) -> Result<(), QueryError> {
        match &self.schema {
            Some(schema) if !schema.contains(field) => Err(QueryError::UnknownField {
                field: field.to_string(),
                choices: schema.iter().cloned().collect::<Vec<_>>().join(", "),
            }),
            _ => Ok(()),
        }
    }

    fn compile<'a>(&self, constraint: &'a Constraint) -> Result<Predicate<'a>, QueryError> {
        match constraint {
            Constraint::Match(expr) => self.compile_match(expr),
            Constraint::And(children) => Ok(Predicate::All(
                children
                    .iter()
                    .map(|c| self.compile(c))
                    .collect::<Result<_, _>>()?,
            )),
            Constraint::Or(children) => Ok(Predicate::Any(
                children
                    .iter()
                    .map(|c| self.compile(c))
                    .collect::<Result<_, _>>()?,
            )),
        }
    }

    fn compile_match<'a>(&self, expr: &'a FilterExpression) -> Result<Predicate<'a>, QueryError> {
        let mut terms = Vec::with_capacity(expr.len());
        for (key, operand) in expr.iter() {
            let field = FieldLookup::parse(key);
            self.check_field(field.root())?;
            check_operand(key, field.lookup, operand)?;
            terms.push(Term {
                key,
                field,
                operand,
            });
        }
        Ok(Predicate::Terms(terms))
    }
}

impl Collection for InMemoryCollection {
    type Error = QueryError;

    fn filter(&self, constraint: &Constraint) -> Result<Self, Self::Error> {
        let predicate = self.compile(constraint)?;

        let mut kept = Vec::new();
        for record in self.records.iter() {
            if predicate.matches(record)? {
                kept.push(record.clone());
            }
        }

        tracing::trace!(before = self.len(), after = kept.len(), "filtered collection");
        Ok(self.with_records(kept))
    }

    fn distinct(&self, field: &str) -> Result<Self, Self::Error> {
        let path = FieldLookup::parse(field);
        self.check_field(path.root())?;

        let mut seen = HashSet::new();
        let kept = self
            .records
            .iter()
            .filter(|record| {
                seen.insert(distinct_key(resolve_path(record, &path.path)))
            })
            .cloned()
            .collect();

        Ok(self.with_records(kept))
    }
}

enum Predicate<'a> {
    Terms(Vec<Term<'a>>),
    All(Vec<Predicate<'a>>),
    Any(Vec<Predicate<'a>>),
}

impl Predicate<'_> {
    fn matches(&self, record: &Value) -> Result<bool, QueryError> {
        match self {
            Predicate::Terms(terms) => all_of(terms.iter().map(|t| t.matches(record))),
            Predicate::All(children) => all_of(children.iter().map(|c| c.matches(record))),
            Predicate::Any(children) => any_of(children.iter().map(|c| c.matches(record))),
        }
    }
}

/// Every outcome is evaluated, so a failing term is reported no matter where
/// it sits in the tree.
fn all_of(outcomes: impl Iterator<Item = Result<bool, QueryError>>) -> Result<bool, QueryError> {
    let outcomes = outcomes.collect::<Result<Vec<_>, _>>()?;
    Ok(outcomes.into_iter().all(|matched| matched))
}

fn any_of(outcomes: impl Iterator<Item = Result<bool, QueryError>>) -> Result<bool, QueryError> {
    let outcomes = outcomes.collect::<Result<Vec<_>, _>>()?;
    Ok(outcomes.into_iter().any(|matched| matched))
}

struct Term<'a> {
    key: &'a str,
    field: FieldLookup<'a>,
    operand: &'a Value,
}

impl Term<'_> {
    fn matches(&self, record: &Value) -> Result<bool, QueryError> {
        let actual = resolve_path(record, &self.field.path).filter(|v| !v.is_null());
        let lookup = self.field.lookup;

        let Some(actual) = actual else {
            return Ok(match lookup {
                Lookup::IsNull => self.operand.as_bool() == Some(true),
                Lookup::Exact => self.operand.is_null(),
                _ => false,
            });
        };

        let matched = match lookup {
            Lookup::Exact => values_equal(actual, self.operand),
            Lookup::In => self
                .operand
                .as_array()
                .is_some_and(|choices| choices.iter().any(|c| values_equal(actual, c))),
            Lookup::Gt => self.compare(actual, self.operand)? == Some(Ordering::Greater),
            Lookup::Gte => matches!(
                self.compare(actual, self.operand)?,
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Lookup::Lt => self.compare(actual, self.operand)? == Some(Ordering::Less),
            Lookup::Lte => matches!(
                self.compare(actual, self.operand)?,
                Some(Ordering::Less | Ordering::Equal)
            ),
            Lookup::Range => match self.operand.as_array().map(Vec::as_slice) {
                Some([low, high]) => {
                    let from_low = self.compare(actual, low)?;
                    let from_high = self.compare(actual, high)?;
                    matches!(from_low, Some(Ordering::Greater | Ordering::Equal))
                        && matches!(from_high, Some(Ordering::Less | Ordering::Equal))
                }
                _ => false,
            },
            Lookup::Contains | Lookup::IContains => match actual {
                Value::Array(items) => items.iter().any(|item| self.element_match(item)),
                other => self.text_match(other),
            },
            Lookup::IExact
            | Lookup::StartsWith
            | Lookup::IStartsWith
            | Lookup::EndsWith
            | Lookup::IEndsWith => self.text_match(actual),
            Lookup::IsNull => self.operand.as_bool() == Some(false),
        };

        Ok(matched)
    }

    fn element_match(&self, item: &Value) -> bool {
        match (item.as_str(), self.operand.as_str()) {
            (Some(item), Some(expected)) if self.field.lookup.is_case_insensitive() => {
                item.to_lowercase() == expected.to_lowercase()
            }
            _ => values_equal(item, self.operand),
        }
    }

    fn text_match(&self, actual: &Value) -> bool {
        let (Some(actual), Some(expected)) = (actual.as_str(), self.operand.as_str()) else {
            return false;
        };

        let lookup = self.field.lookup;
        let (actual, expected) = if lookup.is_case_insensitive() {
            (actual.to_lowercase(), expected.to_lowercase())
        } else {
            (actual.to_string(), expected.to_string())
        };

        match lookup {
            Lookup::IExact => actual == expected,
            Lookup::Contains | Lookup::IContains => actual.contains(&expected),
            Lookup::StartsWith | Lookup::IStartsWith => actual.starts_with(&expected),
            Lookup::EndsWith | Lookup::IEndsWith => actual.ends_with(&expected),
            _ => false,
        }
    }

    fn compare(&self, actual: &Value, operand: &Value) -> Result<Option<Ordering>, QueryError> {
        match (actual, operand) {
            (Value::Number(a), Value::Number(b)) => Ok(a
                .as_f64()
                .zip(b.as_f64())
                .and_then(|(a, b)| a.partial_cmp(&b))),
            (Value::String(a), Value::String(b)) => Ok(Some(a.as_str().cmp(b.as_str()))),
            _ => Err(QueryError::TypeMismatch {
                field: self.key.to_string(),
                lookup: self.field.lookup.name(),
                expected: json_kind(operand),
                found: json_kind(actual),
            }),
        }
    }
}

fn check_operand(key: &str, lookup: Lookup, operand: &Value) -> Result<(), QueryError> {
    let expected = match lookup {
        Lookup::Exact => return Ok(()),
        Lookup::In if operand.is_array() => return Ok(()),
        Lookup::In => "an array",
        Lookup::IsNull if operand.is_boolean() => return Ok(()),
        Lookup::IsNull => "a boolean",
        Lookup::Range => match operand.as_array().map(Vec::as_slice) {
            Some([low, high]) if is_comparable(low) && is_comparable(high) => return Ok(()),
            _ => "a two-element array of numbers or strings",
        },
        Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte if is_comparable(operand) => {
            return Ok(());
        }
        Lookup::Gt | Lookup::Gte | Lookup::Lt | Lookup::Lte => "a number or a string",
        _ if operand.is_string() => return Ok(()),
        _ => "a string",
    };

    Err(QueryError::TypeMismatch {
        field: key.to_string(),
        lookup: lookup.name(),
        expected,
        found: json_kind(operand),
    })
}

fn is_comparable(value: &Value) -> bool {
    value.is_number() || value.is_string()
}

fn resolve_path<'v>(record: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter()
        .try_fold(record, |current, segment| current.as_object()?.get(*segment))
}

/// Bucket key for `distinct`, agreeing with [`values_equal`] on numbers
fn distinct_key(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => Value::from(f).to_string(),
            None => n.to_string(),
        },
        Some(other) => other.to_string(),
        None => Value::Null.to_string(),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn books() -> InMemoryCollection {
        InMemoryCollection::new(vec![
            json!({"id": 1, "title": "Dune", "year": 1965, "tags": ["scifi", "classic"], "author": {"name": "Frank Herbert"}}),
            json!({"id": 2, "title": "Neuromancer", "year": 1984, "tags": ["scifi", "cyberpunk"], "author": {"name": "William Gibson"}}),
            json!({"id": 3, "title": "Emma", "year": 1815, "tags": ["classic"], "author": {"name": "Jane Austen"}, "subtitle": null}),
            json!({"id": 4, "title": "Untitled", "year": 2001.0, "tags": []}),
        ])
    }

    fn filter(collection: &InMemoryCollection, expr: Value) -> Result<Vec<i64>, QueryError> {
        let expr = FilterExpression::from(expr.as_object().cloned().unwrap());
        let result = collection.filter(&Constraint::Match(expr))?;
        Ok(result
            .records()
            .iter()
            .filter_map(|r| r["id"].as_i64())
            .collect())
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(filter(&books(), json!({"title": "Dune"})).unwrap(), vec![1]);
        assert_eq!(
            filter(&books(), json!({"title__exact": "Emma"})).unwrap(),
            vec![3]
        );
    }

    #[test]
    fn test_exact_number_ignores_representation() {
        assert_eq!(filter(&books(), json!({"year": 2001})).unwrap(), vec![4]);
    }

    #[test]
    fn test_keys_in_one_expression_are_anded() {
        assert_eq!(
            filter(&books(), json!({"tags__contains": "scifi", "year__gt": 1970})).unwrap(),
            vec![2]
        );
    }

    #[test]
    fn test_nested_path() {
        assert_eq!(
            filter(&books(), json!({"author__name__istartswith": "jane"})).unwrap(),
            vec![3]
        );
    }

    #[test]
    fn test_comparisons_and_range() {
        assert_eq!(
            filter(&books(), json!({"year__lte": 1965})).unwrap(),
            vec![1, 3]
        );
        assert_eq!(
            filter(&books(), json!({"year__range": [1900, 1990]})).unwrap(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_string_lookups() {
        assert_eq!(
            filter(&books(), json!({"title__icontains": "MANCER"})).unwrap(),
            vec![2]
        );
        assert_eq!(
            filter(&books(), json!({"title__endswith": "ne"})).unwrap(),
            vec![1]
        );
        assert_eq!(
            filter(&books(), json!({"title__iexact": "emma"})).unwrap(),
            vec![3]
        );
    }

    #[test]
    fn test_in_lookup() {
        assert_eq!(
            filter(&books(), json!({"id__in": [2, 4, 9]})).unwrap(),
            vec![2, 4]
        );
    }

    #[test]
    fn test_isnull_treats_missing_and_null_alike() {
        assert_eq!(
            filter(&books(), json!({"subtitle__isnull": true})).unwrap(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(
            filter(&books(), json!({"author__isnull": true})).unwrap(),
            vec![4]
        );
        assert_eq!(
            filter(&books(), json!({"subtitle": null})).unwrap(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_operand_type_checked_even_without_records() {
        let empty = InMemoryCollection::default();
        let err = filter(&empty, json!({"id__in": 3})).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { lookup: "in", .. }));

        let err = filter(&empty, json!({"year__gt": true})).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { lookup: "gt", .. }));
    }

    #[test]
    fn test_comparing_mismatched_kinds_fails() {
        let err = filter(&books(), json!({"title__gt": 10})).unwrap_err();
        match err {
            QueryError::TypeMismatch {
                field,
                expected,
                found,
                ..
            } => {
                assert_eq!(field, "title__gt");
                assert_eq!(expected, "a number");
                assert_eq!(found, "a string");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatch_fails_under_and_and_or() {
        let collection = InMemoryCollection::new(vec![json!({"status": "active", "title": "a"})]);
        let children = || {
            vec![
                Constraint::Match(FilterExpression::new().with("status", "archived")),
                Constraint::Match(FilterExpression::new().with("title__gt", 10)),
            ]
        };

        let and = collection.filter(&Constraint::And(children())).unwrap_err();
        let or = collection.filter(&Constraint::Or(children())).unwrap_err();
        assert!(matches!(and, QueryError::TypeMismatch { .. }));
        assert!(matches!(or, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_mismatch_after_failed_key_still_reported() {
        let err = filter(&books(), json!({"id": 99, "title__gt": 10})).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_range_checks_both_bounds() {
        let err = filter(&books(), json!({"year__range": [3000, "x"]})).unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_schema_rejects_unknown_field() {
        let collection = books().with_schema(["id", "title", "year"]);
        let err = filter(&collection, json!({"author__name": "x"})).unwrap_err();
        match err {
            QueryError::UnknownField { field, choices } => {
                assert_eq!(field, "author");
                assert_eq!(choices, "id, title, year");
            }
            other => panic!("Expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn test_without_schema_unknown_field_matches_nothing() {
        assert!(filter(&books(), json!({"colour": "red"})).unwrap().is_empty());
    }

    #[test]
    fn test_or_and_nested_constraints() {
        let collection = books();
        let constraint = Constraint::Or(vec![
            Constraint::Match(FilterExpression::new().with("id", 1)),
            Constraint::And(vec![
                Constraint::Match(FilterExpression::new().with("tags__contains", "classic")),
                Constraint::Match(FilterExpression::new().with("year__lt", 1900)),
            ]),
        ]);
        let result = collection.filter(&constraint).unwrap();
        let ids: Vec<i64> = result
            .records()
            .iter()
            .filter_map(|r| r["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_filter_leaves_source_untouched() {
        let collection = books();
        let filtered = collection
            .filter(&Constraint::Match(FilterExpression::new().with("id", 1)))
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(collection.len(), 4);
    }

    #[test]
    fn test_distinct_keeps_first_occurrence() {
        let collection = InMemoryCollection::new(vec![
            json!({"id": 1, "category": "a"}),
            json!({"id": 2, "category": "b"}),
            json!({"id": 3, "category": "a"}),
            json!({"id": 4}),
            json!({"id": 5, "category": null}),
        ]);
        let result = collection.distinct("category").unwrap();
        let ids: Vec<i64> = result
            .records()
            .iter()
            .filter_map(|r| r["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_distinct_treats_integer_and_float_as_equal() {
        let collection = InMemoryCollection::new(vec![
            json!({"id": 1, "n": 1}),
            json!({"id": 2, "n": 1.0}),
            json!({"id": 3, "n": 2}),
        ]);
        let result = collection.distinct("n").unwrap();
        let ids: Vec<i64> = result
            .records()
            .iter()
            .filter_map(|r| r["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_distinct_checks_schema() {
        let collection = books().with_schema(["id"]);
        assert!(matches!(
            collection.distinct("title"),
            Err(QueryError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_typed_roundtrip() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Item {
            id: u32,
            name: String,
        }

        let items = vec![
            Item {
                id: 1,
                name: "a".to_string(),
            },
            Item {
                id: 2,
                name: "b".to_string(),
            },
        ];
        let collection = InMemoryCollection::from_items(&items).unwrap();
        let filtered = collection
            .filter(&Constraint::Match(FilterExpression::new().with("name", "b")))
            .unwrap();
        let back: Vec<Item> = filtered.items().unwrap();
        assert_eq!(back, vec![Item { id: 2, name: "b".to_string() }]);
    }
}
