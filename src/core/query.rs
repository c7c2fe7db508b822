//! Query parameters for list endpoints

use serde::Deserialize;

/// Filter parameters of a list request
///
/// # Format
/// - `filter`: repeated, each a JSON object (`{"status": "active"}`)
/// - `cond`: `and` (default) or `or`
/// - `distinct`: field to deduplicate on
///
/// # Example
/// ```text
/// GET /items?filter={"status": "active"}&filter={"price__gte": 10}&cond=or
/// GET /items?filter={"category": "home"}&distinct=category
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Raw filter expressions, in request order
    pub filter: Vec<String>,

    /// Combination condition
    pub cond: Option<String>,

    /// Field to collapse duplicates on
    pub distinct: Option<String>,
}

impl FilterParams {
    pub fn with_filter(mut self, raw: impl Into<String>) -> Self {
        self.filter.push(raw.into());
        self
    }

    pub fn with_condition(mut self, cond: impl Into<String>) -> Self {
        self.cond = Some(cond.into());
        self
    }

    pub fn with_distinct(mut self, field: impl Into<String>) -> Self {
        self.distinct = Some(field.into());
        self
    }

    /// Whether the request carries no filter expressions
    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }
}

/// Pagination parameters
///
/// Page-number pagination reads `page` (and `limit` as a page size when
/// the paginator allows it); limit/offset pagination reads `limit` and
/// `offset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageParams {
    /// Page number as sent by the client (starts at 1, or `last`)
    pub page: Option<String>,

    /// Number of items per page
    pub limit: Option<usize>,

    /// Number of items to skip
    pub offset: Option<usize>,
}

/// Response-shaping parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    /// Comma separated list of fields to keep
    pub fields: Option<String>,

    /// Comma separated list of language codes to include
    pub translations: Option<String>,
}

impl ShapeParams {
    /// Parsed `fields` list, `None` when absent or blank
    pub fn field_list(&self) -> Option<Vec<String>> {
        split_csv(self.fields.as_deref())
    }

    /// Parsed `translations` list, `None` when absent or blank
    pub fn language_list(&self) -> Option<Vec<String>> {
        split_csv(self.translations.as_deref())
    }
}

fn split_csv(raw: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if items.is_empty() { None } else { Some(items) }
}
