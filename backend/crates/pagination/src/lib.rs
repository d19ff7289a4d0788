//! Offset pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] is a validated `(page, page_size)` pair. It owns the
//! offset and capacity arithmetic so callers never compute
//! `(page - 1) * page_size` by hand. A [`Page`] is the response envelope
//! `{ "count": .., "results": [..] }`, where `count` is the total number of
//! matches across all pages.

use serde::{Deserialize, Serialize};

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size accepted by [`PageRequest::new`].
pub const MAX_PAGE_SIZE: u32 = 50;

/// A single reason a page request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The page number was zero.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: u32,
    },
    /// The page size was zero or above the permitted maximum.
    #[error("page size must be between 1 and {max}, got {page_size}")]
    PageSizeOutOfRange {
        /// Rejected page size.
        page_size: u32,
        /// Maximum page size that would have been accepted.
        max: u32,
    },
}

/// Validated one-based page selection.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= max page size`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20).expect("valid page request");
/// assert_eq!(request.offset(), 40);
/// assert_eq!(request.capacity(45), 5);
/// assert_eq!(request.capacity(10), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate a page request against [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns every violated constraint at once so callers can report all
    /// offending fields in a single response.
    pub fn new(page: u32, page_size: u32) -> Result<Self, Vec<PageRequestError>> {
        Self::with_max_page_size(page, page_size, MAX_PAGE_SIZE)
    }

    /// Validate a page request against a caller-supplied maximum page size.
    ///
    /// # Errors
    ///
    /// Returns every violated constraint at once.
    pub fn with_max_page_size(
        page: u32,
        page_size: u32,
        max: u32,
    ) -> Result<Self, Vec<PageRequestError>> {
        let mut errors = Vec::new();
        if page == 0 {
            errors.push(PageRequestError::PageOutOfRange { page });
        }
        if page_size == 0 || page_size > max {
            errors.push(PageRequestError::PageSizeOutOfRange { page_size, max });
        }

        if errors.is_empty() {
            Ok(Self { page, page_size })
        } else {
            Err(errors)
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of results on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows skipped before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        // `page >= 1` holds by construction.
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Number of rows this page holds when `total` rows match overall.
    ///
    /// Equal to `min(page_size, max(0, total - offset))`.
    #[must_use]
    pub fn capacity(&self, total: u64) -> usize {
        let remaining = total.saturating_sub(self.offset());
        let length = remaining.min(u64::from(self.page_size));
        usize::try_from(length).unwrap_or(usize::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total match count.
///
/// `results` always serialises as a JSON array, never `null`.
///
/// # Examples
/// ```
/// use pagination::Page;
///
/// let page: Page<u8> = Page::empty();
/// let json = serde_json::to_string(&page).expect("serialise page");
/// assert_eq!(json, r#"{"count":0,"results":[]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Total number of matches across all pages.
    pub count: u64,
    /// Results on this page only, in display order.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Page with no matches.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }

    /// Page whose result buffer is sized for `request` against `count` matches.
    #[must_use]
    pub fn with_capacity(count: u64, request: &PageRequest) -> Self {
        Self {
            count,
            results: Vec::with_capacity(request.capacity(count)),
        }
    }

    /// Convert every result while keeping the count.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
