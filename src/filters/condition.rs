//! `cond` query parameter

use crate::core::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How multiple filter expressions are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Every expression must match (intersection)
    #[default]
    And,
    /// At least one expression must match (union)
    Or,
}

impl Condition {
    /// Parse an optional raw `cond` value
    ///
    /// Absent or blank values fall back to [`Condition::And`]; anything other
    /// than `and`/`or` (case-insensitive) is rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Condition::default()),
            Some(value) => value.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::And => "and",
            Condition::Or => "or",
        }
    }
}

impl FromStr for Condition {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Condition::And),
            "or" => Ok(Condition::Or),
            _ => Err(FilterError::InvalidCondition {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
