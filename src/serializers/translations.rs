//! Per-language translated fields
//!
//! Translations are stored as one record per language:
//!
//! ```json
//! [{"language_code": "en", "title": "Chair"}, {"language_code": "fr", "title": "Chaise"}]
//! ```
//!
//! and represented to clients keyed by language:
//!
//! ```json
//! {"en": {"title": "Chair"}, "fr": {"title": "Chaise"}}
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::core::error::{FieldValidationError, ValidationError};

/// Key holding the language of a stored translation record
pub const LANGUAGE_CODE: &str = "language_code";

/// Translated field values keyed by language code, in input order
pub type Translations = IndexMap<String, Map<String, Value>>;

/// A set of fields stored per language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedFields {
    fields: Vec<String>,
    allow_empty: bool,
}

impl TranslatedFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            allow_empty: false,
        }
    }

    /// Accept `{}` as input
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn is_translated(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f == key)
    }

    /// Build the client representation of stored translation records
    ///
    /// When `languages` is given, other languages are left out. Records
    /// without a string `language_code` are skipped.
    pub fn to_representation(
        &self,
        records: &[Value],
        languages: Option<&[String]>,
    ) -> Translations {
        let mut result = Translations::new();

        for record in records {
            let Some(lang) = record.get(LANGUAGE_CODE).and_then(Value::as_str) else {
                continue;
            };
            if languages.is_some_and(|ls| !ls.iter().any(|l| l == lang)) {
                continue;
            }

            let values = self
                .fields
                .iter()
                .filter_map(|f| record.get(f).map(|v| (f.clone(), v.clone())))
                .collect();
            result.insert(lang.to_string(), values);
        }

        result
    }

    /// Validate client input for the field called `field`
    ///
    /// Every language entry is checked; all problems are reported together.
    pub fn to_internal_value(
        &self,
        field: &str,
        data: &Value,
    ) -> Result<Translations, ValidationError> {
        let object = match data {
            Value::Null => return Ok(Translations::new()),
            Value::Object(object) => object,
            _ => {
                return Err(ValidationError::NotAnObject {
                    field: field.to_string(),
                });
            }
        };

        if object.is_empty() && !self.allow_empty {
            return Err(ValidationError::Empty {
                field: field.to_string(),
            });
        }

        let mut result = Translations::new();
        let mut errors = Vec::new();

        for (lang, entry) in object {
            let Value::Object(values) = entry else {
                errors.push(FieldValidationError::new(
                    format!("{}.{}", field, lang),
                    "Input is not a valid dict.",
                ));
                continue;
            };

            let unknown: Vec<&String> = values.keys().filter(|k| !self.is_translated(k)).collect();
            if unknown.is_empty() {
                result.insert(lang.clone(), values.clone());
            } else {
                errors.extend(unknown.into_iter().map(|key| {
                    FieldValidationError::new(
                        format!("{}.{}.{}", field, lang, key),
                        "Unknown field.",
                    )
                }));
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::FieldErrors(errors));
        }
        Ok(result)
    }

    /// Turn validated input back into storable records, one per language
    pub fn to_records(&self, translations: &Translations) -> Vec<Value> {
        translations
            .iter()
            .map(|(lang, values)| {
                let mut record = values.clone();
                record.insert(LANGUAGE_CODE.to_string(), Value::String(lang.clone()));
                Value::Object(record)
            })
            .collect()
    }
}
