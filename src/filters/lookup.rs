//! Field lookups encoded in filter keys
//!
//! Keys follow the `field__subfield__lookup` convention: the last `__`
//! segment names a [`Lookup`] when it is one, every other segment walks
//! into nested objects. A key without a recognised lookup suffix is an
//! exact match.

/// Comparison applied between a record value and the filter operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    IsNull,
    Range,
}

impl Lookup {
    pub fn from_name(name: &str) -> Option<Self> {
        let lookup = match name {
            "exact" => Lookup::Exact,
            "iexact" => Lookup::IExact,
            "contains" => Lookup::Contains,
            "icontains" => Lookup::IContains,
            "in" => Lookup::In,
            "gt" => Lookup::Gt,
            "gte" => Lookup::Gte,
            "lt" => Lookup::Lt,
            "lte" => Lookup::Lte,
            "startswith" => Lookup::StartsWith,
            "istartswith" => Lookup::IStartsWith,
            "endswith" => Lookup::EndsWith,
            "iendswith" => Lookup::IEndsWith,
            "isnull" => Lookup::IsNull,
            "range" => Lookup::Range,
            _ => return None,
        };
        Some(lookup)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Lookup::Exact => "exact",
            Lookup::IExact => "iexact",
            Lookup::Contains => "contains",
            Lookup::IContains => "icontains",
            Lookup::In => "in",
            Lookup::Gt => "gt",
            Lookup::Gte => "gte",
            Lookup::Lt => "lt",
            Lookup::Lte => "lte",
            Lookup::StartsWith => "startswith",
            Lookup::IStartsWith => "istartswith",
            Lookup::EndsWith => "endswith",
            Lookup::IEndsWith => "iendswith",
            Lookup::IsNull => "isnull",
            Lookup::Range => "range",
        }
    }

    /// Whether string operands are compared case-insensitively
    pub fn is_case_insensitive(&self) -> bool {
        matches!(
            self,
            Lookup::IExact | Lookup::IContains | Lookup::IStartsWith | Lookup::IEndsWith
        )
    }
}

/// Split a key into its field path and explicit lookup, if any
///
/// `"price__gte"` → `("price", Some(Gte))`, `"owner__name"` → `("owner__name", None)`.
pub fn split_key(key: &str) -> (&str, Option<Lookup>) {
    match key.rsplit_once("__") {
        Some((field, suffix)) if !field.is_empty() => match Lookup::from_name(suffix) {
            Some(lookup) => (field, Some(lookup)),
            None => (key, None),
        },
        _ => (key, None),
    }
}

/// A parsed filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLookup<'a> {
    /// Path segments, outermost first
    pub path: Vec<&'a str>,
    pub lookup: Lookup,
}

impl<'a> FieldLookup<'a> {
    pub fn parse(key: &'a str) -> Self {
        let (field, lookup) = split_key(key);
        Self {
            path: field.split("__").collect(),
            lookup: lookup.unwrap_or(Lookup::Exact),
        }
    }

    /// First path segment (the top-level field name)
    pub fn root(&self) -> &'a str {
        self.path.first().copied().unwrap_or_default()
    }
}
