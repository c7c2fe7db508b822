//! # rest-extra
//!
//! Building blocks for list and detail endpoints of JSON REST APIs on axum.
//!
//! ## Features
//!
//! - **Dynamic Filters**: repeated `filter` JSON objects with Django-style
//!   lookups (`price__gte`), combined by `cond=and|or`, plus `distinct`
//! - **Required Fields & Aliases**: per-endpoint filter rules from YAML
//! - **Header Pagination**: page-number or limit/offset, with `Items-Count`
//!   and `Pagination` link headers
//! - **Response Shaping**: `?fields=` selection and `?translations=`
//! - **Field Codecs**: base64 image uploads, per-language translated fields
//! - **Permissions**: composable `AnyOf` / `AllOf` permission checks
//! - **Routing**: list/detail/extra-action route resolution
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rest_extra::prelude::*;
//!
//! async fn list_products(
//!     FilterQuery(filters): FilterQuery,
//!     PageQuery(page): PageQuery,
//!     headers: HeaderMap,
//!     uri: Uri,
//! ) -> Result<Page<Value>, ExtraError> {
//!     let resolver = FilterResolver::new(
//!         FilterConfig::new()
//!             .with_required_fields(["status"])
//!             .with_alias("kind", "category"),
//!     );
//!     let products = InMemoryCollection::new(load_products());
//!     let view = resolver.resolve(&filters, &products)?;
//!
//!     PageNumberPagination::default().paginate(view.to_vec(), &page, &request_url(&headers, &uri))
//! }
//! ```

pub mod config;
pub mod core;
pub mod filters;
pub mod logging;
pub mod pagination;
pub mod serializers;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{
            AllOf, AllowAny, AnyOf, AuthContext, HasRole, IsAdmin, IsAuthenticated, IsOwner,
            Permission, ReadOnly, check_object_permission, check_permission, parse_permission,
        },
        error::{ExtraError, ExtraResult, FieldError, FilterError, RequestError, ValidationError},
        extractors::{FilterQuery, PageQuery, ShapeQuery},
        query::{FilterParams, PageParams, ShapeParams},
        store::Collection,
    };

    // === Filters ===
    pub use crate::filters::{
        Condition, Constraint, FilterConfig, FilterExpression, FilterResolver, Lookup, resolve,
    };

    // === Storage ===
    pub use crate::storage::InMemoryCollection;

    // === Pagination ===
    pub use crate::pagination::{
        LimitOffsetPagination, Page, PageNumberPagination, Paginator, request_url,
    };

    // === Serializers ===
    pub use crate::serializers::{
        Base64ImageField, DecodedFile, MethodSerializers, SerializerSet, TranslatedFields,
        Translations, select_fields,
    };

    // === Config ===
    pub use crate::config::{ApiConfig, EndpointConfig};

    // === Server ===
    pub use crate::server::{ExtraAction, RestRouter, RouteMatch};

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;

    // === Axum ===
    pub use axum::{
        Json, Router,
        http::{HeaderMap, Uri},
        routing::get,
    };
}
