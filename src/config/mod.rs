//! Endpoint configuration loading and management

use crate::core::auth::{AllowAny, AnyOf, Permission, parse_permission};
use crate::core::error::ConfigError;
use crate::filters::{FilterConfig, FilterResolver};
use crate::serializers::TranslatedFields;
use crate::storage::InMemoryCollection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Page size used when neither the endpoint nor the API sets one
pub const DEFAULT_PAGE_SIZE: usize = 30;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Configuration for one list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint name (usually the router basename, e.g. "product")
    pub name: String,

    /// Required filter fields and filter aliases
    #[serde(flatten)]
    pub filters: FilterConfig,

    /// Fields that may be filtered on; unrestricted when absent
    #[serde(default)]
    pub filterable_fields: Option<Vec<String>>,

    /// Overrides the API-wide page size
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Fields stored per language
    #[serde(default)]
    pub translated_fields: Vec<String>,

    /// Permission names, combined with "any of"
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build the filter resolver for this endpoint
    pub fn resolver(&self) -> FilterResolver {
        FilterResolver::new(self.filters.clone())
    }

    /// Wrap `records` in a collection restricted to `filterable_fields`
    pub fn collection(&self, records: Vec<Value>) -> InMemoryCollection {
        let collection = InMemoryCollection::new(records);
        match &self.filterable_fields {
            Some(fields) => collection.with_schema(fields.iter().cloned()),
            None => collection,
        }
    }

    /// Build the translated-fields codec for this endpoint
    pub fn translations(&self) -> TranslatedFields {
        TranslatedFields::new(self.translated_fields.iter().cloned())
    }

    /// Build the permission for this endpoint
    ///
    /// No configured permission means everyone is allowed.
    pub fn permission(&self) -> Box<dyn Permission> {
        if self.permissions.is_empty() {
            return Box::new(AllowAny);
        }
        Box::new(AnyOf(
            self.permissions.iter().map(|p| parse_permission(p)).collect(),
        ))
    }
}

/// Complete configuration for an API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Default page size for endpoints without their own
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Endpoint configurations
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            endpoints: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::info!(path, endpoints = config.endpoints.len(), "loaded API config");
        Ok(config)
    }

    /// Load and validate configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check endpoint names, page sizes and alias tables
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_size".to_string(),
                value: "0".to_string(),
                message: "page size must be at least 1".to_string(),
            });
        }

        let mut names = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "name".to_string(),
                    value: endpoint.name.clone(),
                    message: "endpoint name may not be empty".to_string(),
                });
            }

            if !names.insert(endpoint.name.as_str()) {
                return Err(ConfigError::DuplicateEndpoint {
                    name: endpoint.name.clone(),
                });
            }

            if endpoint.page_size == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.page_size", endpoint.name),
                    value: "0".to_string(),
                    message: "page size must be at least 1".to_string(),
                });
            }

            let aliases = &endpoint.filters.filter_aliases;
            if let Some((alias, target)) = aliases.iter().find(|(_, t)| aliases.contains_key(*t)) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.filter_aliases.{}", endpoint.name, alias),
                    value: target.clone(),
                    message: "alias target is itself an alias".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Find an endpoint by name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Effective page size for an endpoint
    pub fn page_size_for(&self, name: &str) -> usize {
        self.endpoint(name)
            .and_then(|e| e.page_size)
            .unwrap_or(self.page_size)
    }

    /// Merge several configurations
    ///
    /// Later endpoints with the same name replace earlier ones; the last
    /// non-default page size wins.
    pub fn merge(configs: Vec<ApiConfig>) -> Self {
        let mut merged = ApiConfig::default();

        for config in configs {
            if config.page_size != DEFAULT_PAGE_SIZE {
                merged.page_size = config.page_size;
            }
            for endpoint in config.endpoints {
                match merged.endpoints.iter_mut().find(|e| e.name == endpoint.name) {
                    Some(existing) => *existing = endpoint,
                    None => merged.endpoints.push(endpoint),
                }
            }
        }

        merged
    }
}
