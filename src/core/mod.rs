//! Core module containing the request-facing types shared by every helper

pub mod auth;
pub mod error;
pub mod extractors;
pub mod query;
pub mod store;

pub use auth::{
    AllOf, AllowAny, AnyOf, AuthContext, HasRole, IsAdmin, IsAuthenticated, IsOwner, Permission,
    ReadOnly,
};
pub use error::{ExtraError, ExtraResult};
pub use extractors::{FilterQuery, PageQuery, ShapeQuery};
pub use query::{FilterParams, PageParams, ShapeParams};
pub use store::Collection;
