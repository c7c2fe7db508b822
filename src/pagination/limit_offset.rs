//! `?limit=N&offset=M` pagination

use super::{Page, PaginationLinks, Paginator, remove_query_param, replace_query_param};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::core::error::ExtraResult;
use crate::core::query::PageParams;

/// Limit/offset pagination
///
/// An offset past the end yields an empty page rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffsetPagination {
    pub default_limit: usize,
    pub max_limit: Option<usize>,
}

impl Default for LimitOffsetPagination {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: None,
        }
    }
}

impl LimitOffsetPagination {
    pub const LIMIT_PARAM: &'static str = "limit";
    pub const OFFSET_PARAM: &'static str = "offset";

    pub fn new(default_limit: usize) -> Self {
        Self {
            default_limit: default_limit.max(1),
            max_limit: None,
        }
    }

    pub fn with_max_limit(mut self, max: usize) -> Self {
        self.max_limit = Some(max.max(1));
        self
    }

    fn limit(&self, params: &PageParams) -> usize {
        let limit = match params.limit {
            Some(limit) if limit > 0 => limit,
            _ => self.default_limit.max(1),
        };
        match self.max_limit {
            Some(max) => limit.min(max),
            None => limit,
        }
    }
}

impl Paginator for LimitOffsetPagination {
    fn paginate<T>(
        &self,
        items: Vec<T>,
        params: &PageParams,
        request_url: &str,
    ) -> ExtraResult<Page<T>> {
        let count = items.len();
        let limit = self.limit(params);
        let offset = params.offset.unwrap_or(0);
        // Client-supplied, so either may be close to usize::MAX
        let end = offset.saturating_add(limit);

        let next = if end < count {
            let url = replace_query_param(request_url, Self::LIMIT_PARAM, limit)?;
            Some(replace_query_param(&url, Self::OFFSET_PARAM, end)?)
        } else {
            None
        };

        let previous = if offset == 0 {
            None
        } else {
            let url = replace_query_param(request_url, Self::LIMIT_PARAM, limit)?;
            if offset <= limit {
                Some(remove_query_param(&url, Self::OFFSET_PARAM)?)
            } else {
                Some(replace_query_param(&url, Self::OFFSET_PARAM, offset - limit)?)
            }
        };

        let items = items.into_iter().skip(offset).take(limit).collect();

        Ok(Page {
            items,
            count,
            links: PaginationLinks { next, previous },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://api.test/items";

    fn params(limit: Option<usize>, offset: Option<usize>) -> PageParams {
        PageParams {
            page: None,
            limit,
            offset,
        }
    }

    #[test]
    fn test_first_window() {
        let page = LimitOffsetPagination::new(4)
            .paginate((0..10).collect(), &params(None, None), URL)
            .unwrap();
        assert_eq!(page.items, vec![0, 1, 2, 3]);
        assert_eq!(page.count, 10);
        assert_eq!(
            page.links.next.as_deref(),
            Some("http://api.test/items?limit=4&offset=4")
        );
        assert!(page.links.previous.is_none());
    }

    #[test]
    fn test_middle_window() {
        let page = LimitOffsetPagination::default()
            .paginate(
                (0..10).collect(),
                &params(Some(3), Some(5)),
                "http://api.test/items?limit=3&offset=5",
            )
            .unwrap();
        assert_eq!(page.items, vec![5, 6, 7]);
        assert_eq!(
            page.links.next.as_deref(),
            Some("http://api.test/items?limit=3&offset=8")
        );
        assert_eq!(
            page.links.previous.as_deref(),
            Some("http://api.test/items?limit=3&offset=2")
        );
    }

    #[test]
    fn test_previous_drops_offset_when_reaching_start() {
        let page = LimitOffsetPagination::default()
            .paginate(
                (0..10).collect(),
                &params(Some(3), Some(2)),
                "http://api.test/items?limit=3&offset=2",
            )
            .unwrap();
        assert_eq!(
            page.links.previous.as_deref(),
            Some("http://api.test/items?limit=3")
        );
    }

    #[test]
    fn test_last_window_has_no_next() {
        let page = LimitOffsetPagination::default()
            .paginate((0..10).collect(), &params(Some(5), Some(5)), URL)
            .unwrap();
        assert_eq!(page.items, vec![5, 6, 7, 8, 9]);
        assert!(page.links.next.is_none());
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let page = LimitOffsetPagination::default()
            .paginate((0..3).collect::<Vec<i32>>(), &params(Some(2), Some(10)), URL)
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, 3);
        assert!(page.links.next.is_none());
        assert!(page.links.previous.is_some());
    }

    #[test]
    fn test_offset_at_usize_max_is_empty() {
        let page = LimitOffsetPagination::default()
            .paginate(vec![1, 2, 3], &params(Some(5), Some(usize::MAX)), "http://x/items")
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, 3);
        assert!(page.links.next.is_none());
        assert_eq!(
            page.links.previous,
            Some(format!("http://x/items?limit=5&offset={}", usize::MAX - 5))
        );
    }

    #[test]
    fn test_limit_at_usize_max_takes_everything() {
        let page = LimitOffsetPagination::default()
            .paginate(vec![1, 2, 3], &params(Some(usize::MAX), Some(1)), URL)
            .unwrap();
        assert_eq!(page.items, vec![2, 3]);
        assert!(page.links.next.is_none());
        assert_eq!(
            page.links.previous,
            Some(format!("http://api.test/items?limit={}", usize::MAX))
        );
    }

    #[test]
    fn test_max_limit_caps_client_limit() {
        let page = LimitOffsetPagination::default()
            .with_max_limit(2)
            .paginate((0..10).collect(), &params(Some(50), None), URL)
            .unwrap();
        assert_eq!(page.items, vec![0, 1]);
        assert_eq!(
            page.links.next.as_deref(),
            Some("http://api.test/items?limit=2&offset=2")
        );
    }
}
