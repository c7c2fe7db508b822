//! Serializer selection per view action or HTTP method

use axum::http::Method;
use std::collections::HashMap;

/// Serializers for the standard view actions
///
/// `create` falls back to `detail` when unset, as do `update` and
/// `partial_update`.
#[derive(Debug, Clone, Default)]
pub struct SerializerSet<S> {
    pub list: Option<S>,
    pub detail: Option<S>,
    pub create: Option<S>,
    pub update: Option<S>,
}

impl<S> SerializerSet<S> {
    pub fn new() -> Self {
        Self {
            list: None,
            detail: None,
            create: None,
            update: None,
        }
    }

    pub fn list(mut self, serializer: S) -> Self {
        self.list = Some(serializer);
        self
    }

    pub fn detail(mut self, serializer: S) -> Self {
        self.detail = Some(serializer);
        self
    }

    pub fn create(mut self, serializer: S) -> Self {
        self.create = Some(serializer);
        self
    }

    pub fn update(mut self, serializer: S) -> Self {
        self.update = Some(serializer);
        self
    }

    /// Serializer for `action`, `None` for actions without one
    pub fn for_action(&self, action: &str) -> Option<&S> {
        match action {
            "list" => self.list.as_ref(),
            "retrieve" => self.detail.as_ref(),
            "create" => self.create.as_ref().or(self.detail.as_ref()),
            "update" | "partial_update" => self.update.as_ref().or(self.detail.as_ref()),
            _ => None,
        }
    }
}

/// Serializers keyed by HTTP method
#[derive(Debug, Clone)]
pub struct MethodSerializers<S> {
    by_method: HashMap<Method, S>,
}

impl<S> Default for MethodSerializers<S> {
    fn default() -> Self {
        Self {
            by_method: HashMap::new(),
        }
    }
}

impl<S> MethodSerializers<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, method: Method, serializer: S) -> Self {
        self.by_method.insert(method, serializer);
        self
    }

    pub fn for_method(&self, method: &Method) -> Option<&S> {
        self.by_method.get(method)
    }
}
