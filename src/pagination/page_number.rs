//! `?page=N` pagination

use super::{Page, PaginationLinks, Paginator, remove_query_param, replace_query_param};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::core::error::{ExtraResult, RequestError};
use crate::core::query::PageParams;

/// Page-number pagination
///
/// `page` starts at 1 and also accepts `last`. When `max_page_size` is set,
/// clients may pick a smaller or larger page with `limit`, capped at that
/// maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumberPagination {
    pub page_size: usize,
    pub max_page_size: Option<usize>,
}

impl Default for PageNumberPagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
        }
    }
}

impl PageNumberPagination {
    pub const PAGE_PARAM: &'static str = "page";

    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            max_page_size: None,
        }
    }

    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max.max(1));
        self
    }

    fn effective_page_size(&self, params: &PageParams) -> usize {
        match (self.max_page_size, params.limit) {
            (Some(max), Some(limit)) if limit > 0 => limit.min(max),
            _ => self.page_size.max(1),
        }
    }

    fn page_number(raw: Option<&str>, num_pages: usize) -> ExtraResult<usize> {
        let invalid = || RequestError::InvalidPage {
            page: raw.unwrap_or_default().to_string(),
        };

        let page = match raw.map(str::trim) {
            None | Some("") => 1,
            Some("last") => num_pages,
            Some(value) => value.parse::<usize>().map_err(|_| invalid())?,
        };

        if page == 0 || page > num_pages {
            return Err(invalid().into());
        }
        Ok(page)
    }
}

impl Paginator for PageNumberPagination {
    fn paginate<T>(
        &self,
        items: Vec<T>,
        params: &PageParams,
        request_url: &str,
    ) -> ExtraResult<Page<T>> {
        let count = items.len();
        let page_size = self.effective_page_size(params);
        let num_pages = count.div_ceil(page_size).max(1);
        let page = Self::page_number(params.page.as_deref(), num_pages)?;

        let next = if page < num_pages {
            Some(replace_query_param(request_url, Self::PAGE_PARAM, page + 1)?)
        } else {
            None
        };

        let previous = match page {
            1 => None,
            2 => Some(remove_query_param(request_url, Self::PAGE_PARAM)?),
            _ => Some(replace_query_param(request_url, Self::PAGE_PARAM, page - 1)?),
        };

        let start = (page - 1) * page_size;
        let items = items.into_iter().skip(start).take(page_size).collect();

        Ok(Page {
            items,
            count,
            links: PaginationLinks { next, previous },
        })
    }
}
