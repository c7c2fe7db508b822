//! Header-based pagination
//!
//! List responses carry the page items as a plain JSON array. Paging
//! metadata travels in headers instead of an envelope:
//!
//! - `Items-Count`: total number of items across all pages
//! - `Pagination`: `<next>; rel="next", <prev>; rel="prev"` (omitted when
//!   there is neither)

pub mod limit_offset;
pub mod page_number;

pub use limit_offset::LimitOffsetPagination;
pub use page_number::PageNumberPagination;

use axum::Json;
use axum::http::header::HOST;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use url::Url;

use crate::core::error::{ExtraError, ExtraResult};
use crate::core::query::PageParams;

pub const ITEMS_COUNT_HEADER: HeaderName = HeaderName::from_static("items-count");
pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("pagination");

/// Next/previous page URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PaginationLinks {
    /// Value of the `Pagination` header, `None` when there are no links
    pub fn header_value(&self) -> Option<String> {
        match (&self.next, &self.previous) {
            (Some(next), Some(prev)) => Some(format!(
                "<{}>; rel=\"next\", <{}>; rel=\"prev\"",
                next, prev
            )),
            (Some(next), None) => Some(format!("<{}>; rel=\"next\"", next)),
            (None, Some(prev)) => Some(format!("<{}>; rel=\"prev\"", prev)),
            (None, None) => None,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub count: usize,
    pub links: PaginationLinks,
}

impl<T> Page<T> {
    /// Transform the items, keeping count and links
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            links: self.links,
        }
    }

    /// Response headers for this page
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ITEMS_COUNT_HEADER, HeaderValue::from(self.count));
        if let Some(link) = self.links.header_value() {
            match HeaderValue::from_str(&link) {
                Ok(value) => {
                    headers.insert(PAGINATION_HEADER, value);
                }
                Err(e) => tracing::warn!(error = %e, "pagination link is not a valid header value"),
            }
        }
        headers
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        let headers = self.headers();
        (headers, Json(self.items)).into_response()
    }
}

/// A pagination style
pub trait Paginator {
    /// Cut `items` down to the requested page
    ///
    /// `request_url` must be absolute; next/previous links are derived
    /// from it.
    fn paginate<T>(
        &self,
        items: Vec<T>,
        params: &PageParams,
        request_url: &str,
    ) -> ExtraResult<Page<T>>;
}

/// Rebuild the absolute URL of a request from its `Host` header and URI
pub fn request_url(headers: &HeaderMap, uri: &Uri) -> String {
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("http://{}{}", host, path_and_query)
}

fn parse_url(url: &str) -> ExtraResult<Url> {
    Url::parse(url)
        .map_err(|e| ExtraError::Internal(format!("invalid request URL '{}': {}", url, e)))
}

fn rewrite_query(url: &str, key: &str, value: Option<String>) -> ExtraResult<String> {
    let mut url = parse_url(url)?;

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if let Some(value) = value {
        pairs.push((key.to_string(), value));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Ok(url.to_string())
}

/// Set `key` to `value` in the query string of `url`
pub fn replace_query_param(url: &str, key: &str, value: impl ToString) -> ExtraResult<String> {
    rewrite_query(url, key, Some(value.to_string()))
}

/// Drop `key` from the query string of `url`
pub fn remove_query_param(url: &str, key: &str) -> ExtraResult<String> {
    rewrite_query(url, key, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_both_links() {
        let links = PaginationLinks {
            next: Some("http://x/items?page=3".to_string()),
            previous: Some("http://x/items".to_string()),
        };
        assert_eq!(
            links.header_value().unwrap(),
            r#"<http://x/items?page=3>; rel="next", <http://x/items>; rel="prev""#
        );
    }

    #[test]
    fn test_header_value_single_link() {
        let next_only = PaginationLinks {
            next: Some("http://x/a".to_string()),
            previous: None,
        };
        assert_eq!(next_only.header_value().unwrap(), r#"<http://x/a>; rel="next""#);

        let prev_only = PaginationLinks {
            next: None,
            previous: Some("http://x/a".to_string()),
        };
        assert_eq!(prev_only.header_value().unwrap(), r#"<http://x/a>; rel="prev""#);
    }

    #[test]
    fn test_no_links_no_pagination_header() {
        let page = Page {
            items: vec![1, 2],
            count: 2,
            links: PaginationLinks::default(),
        };
        let headers = page.headers();
        assert_eq!(headers.get(ITEMS_COUNT_HEADER).unwrap(), "2");
        assert!(headers.get(PAGINATION_HEADER).is_none());
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page {
            items: vec![1, 2],
            count: 7,
            links: PaginationLinks {
                next: Some("n".to_string()),
                previous: None,
            },
        };
        let mapped = page.map(|i| i * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.count, 7);
        assert_eq!(mapped.links.next.as_deref(), Some("n"));
    }

    #[test]
    fn test_replace_query_param() {
        let url = replace_query_param("http://x/items?page=2&cond=or", "page", 3).unwrap();
        assert_eq!(url, "http://x/items?cond=or&page=3");
    }

    #[test]
    fn test_replace_keeps_repeated_keys_in_order() {
        let url = replace_query_param("http://x/items?filter=a&filter=b", "page", 2).unwrap();
        assert_eq!(url, "http://x/items?filter=a&filter=b&page=2");
    }

    #[test]
    fn test_remove_query_param() {
        assert_eq!(
            remove_query_param("http://x/items?page=2", "page").unwrap(),
            "http://x/items"
        );
        assert_eq!(
            remove_query_param("http://x/items?page=2&limit=5", "page").unwrap(),
            "http://x/items?limit=5"
        );
    }

    #[test]
    fn test_request_url_from_host() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("api.example.com"));
        let uri: Uri = "/items?page=2".parse().unwrap();
        assert_eq!(
            request_url(&headers, &uri),
            "http://api.example.com/items?page=2"
        );
        assert_eq!(
            request_url(&HeaderMap::new(), &uri),
            "http://localhost/items?page=2"
        );
    }
}
