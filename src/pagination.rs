//! Offset pagination shared by every listing operation.

use serde::{Deserialize, Serialize};

/// Page number and size requested by a caller.
///
/// Pages are one-based. Construction clamps the page to at least `1` and the
/// limit to `1..=max_limit`, so repositories never see a zero-sized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Upper bound applied when callers do not specify their own cap.
    pub const DEFAULT_MAX_LIMIT: u32 = 100;

    /// Creates a page request, substituting defaults for missing values.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32, max_limit: u32) -> Self {
        Self {
            page: page.filter(|value| *value > 0).unwrap_or(1),
            limit: limit
                .filter(|value| *value > 0)
                .unwrap_or(default_limit)
                .clamp(1, max_limit.max(1)),
        }
    }

    /// Returns the first page with the given size.
    #[must_use]
    pub fn first(limit: u32) -> Self {
        Self::new(None, Some(limit), limit, limit)
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns the number of rows to skip before this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Applies this page to an already filtered and ordered sequence.
    #[must_use]
    pub fn slice<T: Clone>(self, items: &[T]) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.iter().skip(skip).take(take).cloned().collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, 20, Self::DEFAULT_MAX_LIMIT)
    }
}

/// One page of results together with the unpaged total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items matching the query across all pages.
    pub total: u64,
    /// The request that produced this page.
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Creates a page from its items, total and originating request.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Returns the number of pages needed to show `total` items.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.limit()))
    }

    /// Maps every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}
