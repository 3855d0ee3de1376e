//! Pagination and sort-direction value types.

use serde::Serialize;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 5;
/// Upper bound applied to caller-supplied page sizes.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Alphabetical direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses `asc`/`desc` case-insensitively; anything else is ascending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Offset/size page selector. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Builds a request, applying `default_size` when `size` is absent or zero
    /// and clamping to `MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, size: Option<u32>, default_size: u32) -> Self {
        let size = match size {
            Some(0) | None => default_size,
            Some(value) => value,
        };
        Self {
            page: page.unwrap_or(0),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let size = u64::from(request.size);
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
            total_pages: total_items.div_ceil(size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageRequest, SortDirection, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

    #[test]
    fn sort_direction_parse_is_case_insensitive_with_asc_fallback() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("Asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Asc);
        assert_eq!(SortDirection::parse(""), SortDirection::Asc);
    }

    #[test]
    fn page_request_applies_default_and_clamps() {
        let request = PageRequest::new(None, None, DEFAULT_PAGE_SIZE);
        assert_eq!(request.page, 0);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);

        let zero = PageRequest::new(Some(2), Some(0), 7);
        assert_eq!(zero.size, 7);
        assert_eq!(zero.offset(), 14);

        let huge = PageRequest::new(Some(1), Some(10_000), DEFAULT_PAGE_SIZE);
        assert_eq!(huge.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn page_counts_partial_last_page() {
        let page = Page::new(vec![1, 2], PageRequest::new(Some(2), Some(5), 5), 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.map(|value| value * 10).items, vec![10, 20]);
    }
}
