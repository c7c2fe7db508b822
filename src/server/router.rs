//! Resource routes with optional trailing slashes
//!
//! Each registered resource gets four kinds of routes, matched in order:
//!
//! - `{prefix}/`: GET `list`, POST `create`; named `{basename}-list`
//! - `{prefix}/{action}/`: list-level extra actions; named `{basename}-{action}`
//! - `{prefix}/{lookup}/`: GET `retrieve`, PUT `update`, PATCH
//!   `partial_update`, DELETE `destroy`; named `{basename}-detail`
//! - `{prefix}/{lookup}/{action}/`: detail-level extra actions
//!
//! Extra action route names use hyphens (`mark_read` becomes
//! `{basename}-mark-read`). The trailing slash is always optional.

use axum::http::Method;
use regex::Regex;

use crate::core::error::{ExtraError, ExtraResult, RequestError};

const LOOKUP_PATTERN: &str = "[^/.]+";

/// Whether an extra action works on the collection or on one object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionScope {
    List,
    Detail,
}

/// A custom action next to the standard ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraAction {
    pub name: String,
    pub scope: ActionScope,
    pub methods: Vec<Method>,
}

impl ExtraAction {
    /// List-level action answering GET
    pub fn list(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: ActionScope::List,
            methods: vec![Method::GET],
        }
    }

    /// Detail-level action answering GET
    pub fn detail(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: ActionScope::Detail,
            methods: vec![Method::GET],
        }
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    fn route_suffix(&self) -> String {
        self.name.replace('_', "-")
    }
}

/// A compiled route
#[derive(Debug, Clone)]
pub struct Route {
    pattern: Regex,
    name: String,
    mapping: Vec<(Method, String)>,
    template: String,
}

impl Route {
    fn new(
        pattern: &str,
        template: String,
        name: String,
        mapping: Vec<(Method, String)>,
    ) -> ExtraResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            ExtraError::Internal(format!("invalid route pattern '{}': {}", pattern, e))
        })?;
        Ok(Self {
            pattern,
            name,
            mapping,
            template,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Methods this route answers, in registration order
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.mapping.iter().map(|(m, _)| m)
    }

    fn action_for(&self, method: &Method) -> Option<&str> {
        self.mapping
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, action)| action.as_str())
    }
}

/// Result of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Route name, e.g. `product-detail`
    pub name: String,
    /// View action, e.g. `retrieve`
    pub action: String,
    /// Captured object lookup for detail routes
    pub lookup: Option<String>,
}

/// Router for REST resources
#[derive(Debug, Clone, Default)]
pub struct RestRouter {
    routes: Vec<Route>,
}

impl RestRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under `prefix`
    pub fn register(
        mut self,
        prefix: &str,
        basename: &str,
        extra_actions: &[ExtraAction],
    ) -> ExtraResult<Self> {
        let prefix = prefix.trim_matches('/');
        let escaped = regex::escape(prefix);
        let lookup = format!("(?P<lookup>{})", LOOKUP_PATTERN);

        self.routes.push(Route::new(
            &format!("^{}/?$", escaped),
            format!("/{}/", prefix),
            format!("{}-list", basename),
            vec![
                (Method::GET, "list".to_string()),
                (Method::POST, "create".to_string()),
            ],
        )?);

        for action in extra_actions.iter().filter(|a| a.scope == ActionScope::List) {
            self.routes.push(Route::new(
                &format!("^{}/{}/?$", escaped, regex::escape(&action.name)),
                format!("/{}/{}/", prefix, action.name),
                format!("{}-{}", basename, action.route_suffix()),
                action.methods.iter().map(|m| (m.clone(), action.name.clone())).collect(),
            )?);
        }

        self.routes.push(Route::new(
            &format!("^{}/{}/?$", escaped, lookup),
            format!("/{}/{{lookup}}/", prefix),
            format!("{}-detail", basename),
            vec![
                (Method::GET, "retrieve".to_string()),
                (Method::PUT, "update".to_string()),
                (Method::PATCH, "partial_update".to_string()),
                (Method::DELETE, "destroy".to_string()),
            ],
        )?);

        for action in extra_actions.iter().filter(|a| a.scope == ActionScope::Detail) {
            self.routes.push(Route::new(
                &format!("^{}/{}/{}/?$", escaped, lookup, regex::escape(&action.name)),
                format!("/{}/{{lookup}}/{}/", prefix, action.name),
                format!("{}-{}", basename, action.route_suffix()),
                action.methods.iter().map(|m| (m.clone(), action.name.clone())).collect(),
            )?);
        }

        tracing::debug!(prefix, basename, routes = self.routes.len(), "registered resource");
        Ok(self)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the route and action for a request
    ///
    /// The first route whose pattern matches the path decides; if it does
    /// not answer `method`, the result is `MethodNotAllowed`.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<RouteMatch, RequestError> {
        let trimmed = path.trim_start_matches('/');

        for route in &self.routes {
            let Some(captures) = route.pattern.captures(trimmed) else {
                continue;
            };

            let action = route
                .action_for(method)
                .ok_or_else(|| RequestError::MethodNotAllowed {
                    method: method.to_string(),
                    path: path.to_string(),
                })?;

            return Ok(RouteMatch {
                name: route.name.clone(),
                action: action.to_string(),
                lookup: captures.name("lookup").map(|m| m.as_str().to_string()),
            });
        }

        Err(RequestError::RouteNotFound {
            path: path.to_string(),
        })
    }

    /// Build the path of a named route
    ///
    /// Detail routes need `lookup`; list routes ignore it.
    pub fn reverse(&self, name: &str, lookup: Option<&str>) -> Option<String> {
        let route = self.routes.iter().find(|r| r.name == name)?;
        if route.template.contains("{lookup}") {
            Some(route.template.replace("{lookup}", lookup?))
        } else {
            Some(route.template.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> RestRouter {
        RestRouter::new()
            .register(
                "products",
                "product",
                &[
                    ExtraAction::list("recent"),
                    ExtraAction::detail("mark_sold").methods([Method::POST]),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_list_routes() {
        let router = router();
        let m = router.resolve(&Method::GET, "/products").unwrap();
        assert_eq!(m.name, "product-list");
        assert_eq!(m.action, "list");
        assert_eq!(m.lookup, None);

        let m = router.resolve(&Method::POST, "/products/").unwrap();
        assert_eq!(m.action, "create");
    }

    #[test]
    fn test_detail_routes() {
        let router = router();
        let cases = [
            (Method::GET, "retrieve"),
            (Method::PUT, "update"),
            (Method::PATCH, "partial_update"),
            (Method::DELETE, "destroy"),
        ];
        for (method, action) in cases {
            let m = router.resolve(&method, "/products/42/").unwrap();
            assert_eq!(m.name, "product-detail");
            assert_eq!(m.action, action);
            assert_eq!(m.lookup.as_deref(), Some("42"));
        }
    }

    #[test]
    fn test_extra_actions() {
        let router = router();
        let m = router.resolve(&Method::GET, "/products/recent").unwrap();
        assert_eq!(m.name, "product-recent");
        assert_eq!(m.action, "recent");
        assert_eq!(m.lookup, None);

        let m = router.resolve(&Method::POST, "/products/7/mark_sold/").unwrap();
        assert_eq!(m.name, "product-mark-sold");
        assert_eq!(m.action, "mark_sold");
        assert_eq!(m.lookup.as_deref(), Some("7"));
    }

    #[test]
    fn test_method_not_allowed() {
        let err = router().resolve(&Method::DELETE, "/products").unwrap_err();
        assert!(matches!(err, RequestError::MethodNotAllowed { .. }));

        let err = router().resolve(&Method::GET, "/products/7/mark_sold").unwrap_err();
        assert!(matches!(err, RequestError::MethodNotAllowed { .. }));
    }

    #[test]
    fn test_route_not_found() {
        let err = router().resolve(&Method::GET, "/orders/1").unwrap_err();
        assert_eq!(
            err,
            RequestError::RouteNotFound {
                path: "/orders/1".to_string()
            }
        );
        assert!(router().resolve(&Method::GET, "/products/1/2/3").is_err());
        assert!(router().resolve(&Method::GET, "/products/a.json").is_err());
    }

    #[test]
    fn test_multiple_resources() {
        let router = router().register("api/tags", "tag", &[]).unwrap();
        let m = router.resolve(&Method::GET, "/api/tags/rust").unwrap();
        assert_eq!(m.name, "tag-detail");
        assert_eq!(m.lookup.as_deref(), Some("rust"));
        assert_eq!(router.routes().len(), 6);
    }

    #[test]
    fn test_reverse() {
        let router = router();
        assert_eq!(router.reverse("product-list", None).as_deref(), Some("/products/"));
        assert_eq!(
            router.reverse("product-detail", Some("9")).as_deref(),
            Some("/products/9/")
        );
        assert_eq!(
            router.reverse("product-mark-sold", Some("9")).as_deref(),
            Some("/products/9/mark_sold/")
        );
        assert_eq!(router.reverse("product-detail", None), None);
        assert_eq!(router.reverse("nope", None), None);
    }
}
