//! Axum extractors for list query parameters
//!
//! These wrap `axum_extra`'s `Query`, which understands repeated keys
//! (`?filter=..&filter=..`), and turn rejections into [`ExtraError`]s so
//! handlers answer with the crate's JSON error body.

use axum::extract::FromRequestParts;
use axum::http::Method;
use axum::http::request::Parts;
use axum_extra::extract::Query;
use serde::de::DeserializeOwned;

use crate::core::error::{ExtraError, RequestError};
use crate::core::query::{FilterParams, PageParams, ShapeParams};

async fn query<T, S>(parts: &mut Parts, state: &S) -> Result<T, ExtraError>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    let Query(value) = Query::<T>::from_request_parts(parts, state)
        .await
        .map_err(|e| {
            ExtraError::Request(RequestError::InvalidQuery {
                message: e.to_string(),
            })
        })?;
    Ok(value)
}

/// `filter`, `cond` and `distinct` parameters
#[derive(Debug, Clone, Default)]
pub struct FilterQuery(pub FilterParams);

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
{
    type Rejection = ExtraError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(query(parts, state).await?))
    }
}

/// `page`, `limit` and `offset` parameters
#[derive(Debug, Clone, Default)]
pub struct PageQuery(pub PageParams);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ExtraError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(query(parts, state).await?))
    }
}

/// Response shaping: selected fields and languages
///
/// Field selection only applies to GET requests; for other methods
/// `fields` is always `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeQuery {
    pub fields: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
}

impl<S> FromRequestParts<S> for ShapeQuery
where
    S: Send + Sync,
{
    type Rejection = ExtraError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params: ShapeParams = query(parts, state).await?;

        let fields = if parts.method == Method::GET {
            params.field_list()
        } else {
            None
        };

        Ok(Self {
            fields,
            languages: params.language_list(),
        })
    }
}
