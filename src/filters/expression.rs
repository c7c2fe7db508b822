//! Filter expressions decoded from `filter` query parameters

use super::lookup::split_key;
use crate::core::error::FilterError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One key/value constraint set, e.g. `{"status": "active", "price__gte": 10}`
///
/// All keys of a single expression must match together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterExpression(Map<String, Value>);

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the raw text of the `index`-th `filter` parameter
    ///
    /// The text must be a JSON object; anything else is a
    /// [`FilterError::MalformedExpression`].
    pub fn parse(index: usize, raw: &str) -> Result<Self, FilterError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| FilterError::MalformedExpression {
                index,
                message: e.to_string(),
            })?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FilterError::MalformedExpression {
                index,
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Rewrite keys through an alias table
    ///
    /// A key matching an alias is replaced entirely. Otherwise the field part
    /// of a lookup key is looked up, so `alias__gte` becomes `real__gte`.
    pub fn with_aliases(self, aliases: &HashMap<String, String>) -> Self {
        if aliases.is_empty() {
            return self;
        }

        let map = self
            .0
            .into_iter()
            .map(|(key, value)| (alias_key(&key, aliases), value))
            .collect();
        Self(map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Field names referenced by this expression, lookups stripped
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.keys().map(|key| split_key(key).0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for FilterExpression {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn alias_key(key: &str, aliases: &HashMap<String, String>) -> String {
    if let Some(real) = aliases.get(key) {
        return real.clone();
    }

    match split_key(key) {
        (field, Some(lookup)) => match aliases.get(field) {
            Some(real) => format!("{}__{}", real, lookup.name()),
            None => key.to_string(),
        },
        (_, None) => key.to_string(),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
