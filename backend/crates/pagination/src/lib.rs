//! Page-number pagination primitives shared by helpdesk list endpoints.
//!
//! Pages are 1-based. A [`PageRequest`] names the page and page size; a
//! [`Page`] carries one window of an already ordered collection together with
//! the totals a client needs to render page controls. Requests past the last
//! page are not clamped: they produce an empty window and the caller decides
//! how to present that.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(2, 10)?;
//! let page = Page::slice((1..=25).collect::<Vec<u32>>(), request);
//! assert_eq!(page.items.first(), Some(&11));
//! assert_eq!(page.total_pages, 3);
//! # Ok::<(), pagination::PageRequestError>(())
//! ```

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Page size used when a caller does not choose one.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Errors raised when building a [`PageRequest`] from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page indices start at 1.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroUsize,
    page_size: NonZeroUsize,
}

impl PageRequest {
    /// Build a request from a 1-based page index and a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPage`] when `page` is zero and
    /// [`PageRequestError::ZeroPageSize`] when `page_size` is zero.
    pub const fn new(page: usize, page_size: usize) -> Result<Self, PageRequestError> {
        let Some(page) = NonZeroUsize::new(page) else {
            return Err(PageRequestError::ZeroPage);
        };
        let Some(page_size) = NonZeroUsize::new(page_size) else {
            return Err(PageRequestError::ZeroPageSize);
        };
        Ok(Self { page, page_size })
    }

    /// Request a page using [`DEFAULT_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPage`] when `page` is zero.
    pub const fn with_default_size(page: usize) -> Result<Self, PageRequestError> {
        Self::new(page, DEFAULT_PAGE_SIZE.get())
    }

    /// The 1-based page index.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page.get()
    }

    /// The number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Number of items that precede this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page
            .get()
            .saturating_sub(1)
            .saturating_mul(self.page_size.get())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: NonZeroUsize::MIN,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Number of pages needed to show `total_items` at `page_size` per page.
///
/// An empty collection has zero pages.
#[must_use]
pub const fn total_pages(total_items: usize, page_size: NonZeroUsize) -> usize {
    total_items.div_ceil(page_size.get())
}

/// One window of an ordered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in collection order.
    pub items: Vec<T>,
    /// The 1-based page index that was requested.
    pub page: usize,
    /// Maximum number of items per page.
    pub page_size: usize,
    /// Size of the whole collection.
    pub total_items: usize,
    /// Number of pages in the whole collection.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cut the requested window out of an ordered collection.
    #[must_use]
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.page_size())
            .collect();
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            total_items,
            total_pages: total_pages(total_items, request.page_size),
        }
    }

    /// Whether the requested page lies after the last page.
    ///
    /// Page 1 of an empty collection is not out of range.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        if self.total_pages == 0 {
            self.page > 1
        } else {
            self.page > self.total_pages
        }
    }

    /// Transform every item while keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(transform).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
