//! Permission checks for view actions
//!
//! A [`Permission`] answers two questions for an [`AuthContext`]: may the
//! caller run this action at all, and may it touch this particular object.
//! [`AnyOf`] grants access when any member does, [`AllOf`] when every
//! member does.

use crate::core::error::{ExtraError, RequestError};
use serde_json::Value;
use uuid::Uuid;

/// Authorization context extracted from a request
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Authenticated user
    User { user_id: Uuid, roles: Vec<String> },

    /// Service-to-service communication
    Service { service_name: String },

    /// System administrator
    Admin { admin_id: Uuid },

    /// No authentication (public access)
    Anonymous,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthContext::Anonymous)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin { .. })
    }

    /// Get the acting principal's id if available
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id, .. } => Some(*user_id),
            AuthContext::Admin { admin_id } => Some(*admin_id),
            _ => None,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        match self {
            AuthContext::User { roles, .. } => roles.iter().any(|r| r == role),
            _ => false,
        }
    }
}

/// Actions that never modify state
pub const SAFE_ACTIONS: &[&str] = &["list", "retrieve"];

/// A permission check
pub trait Permission: Send + Sync {
    /// View-level check, run before any object is loaded
    fn has_permission(&self, ctx: &AuthContext, action: &str) -> bool;

    /// Object-level check; grants by default
    fn has_object_permission(&self, _ctx: &AuthContext, _action: &str, _obj: &Value) -> bool {
        true
    }
}

/// Everyone, including anonymous callers
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAny;

impl Permission for AllowAny {
    fn has_permission(&self, _: &AuthContext, _: &str) -> bool {
        true
    }
}

/// Any authenticated caller
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAuthenticated;

impl Permission for IsAuthenticated {
    fn has_permission(&self, ctx: &AuthContext, _: &str) -> bool {
        ctx.is_authenticated()
    }
}

/// Administrators only
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAdmin;

impl Permission for IsAdmin {
    fn has_permission(&self, ctx: &AuthContext, _: &str) -> bool {
        ctx.is_admin()
    }
}

/// Users holding at least one of the roles
#[derive(Debug, Clone, Default)]
pub struct HasRole(pub Vec<String>);

impl Permission for HasRole {
    fn has_permission(&self, ctx: &AuthContext, _: &str) -> bool {
        self.0.iter().any(|role| ctx.has_role(role))
    }
}

/// Safe actions only (`list`, `retrieve`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

impl Permission for ReadOnly {
    fn has_permission(&self, _: &AuthContext, action: &str) -> bool {
        SAFE_ACTIONS.contains(&action)
    }
}

/// The caller's id equals the object's `owner_field`
#[derive(Debug, Clone)]
pub struct IsOwner {
    pub owner_field: String,
}

impl IsOwner {
    pub fn new(owner_field: impl Into<String>) -> Self {
        Self {
            owner_field: owner_field.into(),
        }
    }
}

impl Permission for IsOwner {
    fn has_permission(&self, ctx: &AuthContext, _: &str) -> bool {
        ctx.user_id().is_some()
    }

    fn has_object_permission(&self, ctx: &AuthContext, _: &str, obj: &Value) -> bool {
        let (Some(user_id), Some(owner)) = (ctx.user_id(), obj.get(&self.owner_field)) else {
            return false;
        };
        owner.as_str() == Some(user_id.to_string().as_str())
    }
}

/// Grants when any member grants
#[derive(Default)]
pub struct AnyOf(pub Vec<Box<dyn Permission>>);

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, permission: impl Permission + 'static) -> Self {
        self.0.push(Box::new(permission));
        self
    }
}

impl Permission for AnyOf {
    fn has_permission(&self, ctx: &AuthContext, action: &str) -> bool {
        self.0.iter().any(|p| p.has_permission(ctx, action))
    }

    fn has_object_permission(&self, ctx: &AuthContext, action: &str, obj: &Value) -> bool {
        self.0
            .iter()
            .any(|p| p.has_object_permission(ctx, action, obj))
    }
}

/// Grants when every member grants
#[derive(Default)]
pub struct AllOf(pub Vec<Box<dyn Permission>>);

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, permission: impl Permission + 'static) -> Self {
        self.0.push(Box::new(permission));
        self
    }
}

impl Permission for AllOf {
    fn has_permission(&self, ctx: &AuthContext, action: &str) -> bool {
        self.0.iter().all(|p| p.has_permission(ctx, action))
    }

    fn has_object_permission(&self, ctx: &AuthContext, action: &str, obj: &Value) -> bool {
        self.0
            .iter()
            .all(|p| p.has_object_permission(ctx, action, obj))
    }
}

/// Parse a permission name (for YAML config)
///
/// Unknown names fall back to [`IsAuthenticated`].
pub fn parse_permission(s: &str) -> Box<dyn Permission> {
    match s {
        "allow_any" | "public" => Box::new(AllowAny),
        "authenticated" => Box::new(IsAuthenticated),
        "admin_only" => Box::new(IsAdmin),
        "read_only" => Box::new(ReadOnly),
        s if s.starts_with("role:") => {
            let role = s.trim_start_matches("role:").to_string();
            Box::new(HasRole(vec![role]))
        }
        s if s.starts_with("owner:") => Box::new(IsOwner::new(s.trim_start_matches("owner:"))),
        _ => Box::new(IsAuthenticated),
    }
}

/// Run a view-level check, mapping refusal to 401/403
pub fn check_permission(
    permission: &dyn Permission,
    ctx: &AuthContext,
    action: &str,
) -> Result<(), ExtraError> {
    if permission.has_permission(ctx, action) {
        return Ok(());
    }
    Err(denied(ctx, action))
}

/// Run an object-level check, mapping refusal to 401/403
pub fn check_object_permission(
    permission: &dyn Permission,
    ctx: &AuthContext,
    action: &str,
    obj: &Value,
) -> Result<(), ExtraError> {
    if permission.has_object_permission(ctx, action, obj) {
        return Ok(());
    }
    Err(denied(ctx, action))
}

fn denied(ctx: &AuthContext, action: &str) -> ExtraError {
    tracing::debug!(action, authenticated = ctx.is_authenticated(), "permission denied");
    let err = if ctx.is_authenticated() {
        RequestError::Forbidden {
            message: format!("not allowed to {}", action),
        }
    } else {
        RequestError::Unauthorized {
            message: "authentication credentials were not provided".to_string(),
        }
    };
    ExtraError::Request(err)
}
