//! The three list-windowing strategies applied to collection endpoints.
//!
//! Each strategy consumes the full ordered result set plus the client's window
//! parameters and produces exactly one [`Page`] with next/previous indicators.
//! A strategy is chosen per endpoint at configuration time via [`Paginator`];
//! strategies are never combined.
//!
//! Out-of-range page-number or offset requests yield an empty page rather than
//! an error. The cursor strategy is stricter: a token that cannot be decoded,
//! or that no longer corresponds to a valid position, fails with
//! [`PaginationError::InvalidCursor`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Default page size for page-number pagination.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Largest page size a client may request via `size=`.
pub const MAX_PAGE_SIZE: usize = 10;

/// Sentinel value on the page key meaning "last page".
pub const LAST_PAGE_SENTINEL: &str = "end";

/// Default limit for limit-offset pagination.
pub const DEFAULT_LIMIT: usize = 3;

/// Largest limit a client may request via `limit=`.
pub const MAX_LIMIT: usize = 10;

/// Fixed page size for cursor pagination.
pub const CURSOR_PAGE_SIZE: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    #[error("Invalid cursor")]
    InvalidCursor,
}

/// One window of an ordered result set.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token or parameter value the client sends to fetch the following page.
    pub next: Option<String>,
    /// Token or parameter value for the preceding page.
    pub previous: Option<String>,
    /// Total number of items before windowing.
    pub count: usize,
}

/// Strategy selected for a list endpoint at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paginator {
    PageNumber(PageNumberPagination),
    LimitOffset(LimitOffsetPagination),
    Cursor(CursorPagination),
}

/// Raw client window parameters, a superset of every strategy's query keys.
/// Each strategy reads only the keys it defines and ignores the rest.
#[derive(Debug, Default, Clone)]
pub struct WindowParams {
    pub page: Option<PageSelector>,
    pub size: Option<usize>,
    pub limit: Option<usize>,
    pub start: Option<usize>,
    pub record: Option<String>,
}

impl Paginator {
    /// Window `items` (sorted ascending by `key`) with the selected strategy.
    ///
    /// Only the cursor strategy can fail; the other two treat out-of-range
    /// windows as empty pages.
    pub fn paginate<T>(
        &self,
        items: Vec<T>,
        key: impl Fn(&T) -> i64,
        params: &WindowParams,
    ) -> Result<Page<T>, PaginationError> {
        match self {
            Paginator::PageNumber(pager) => Ok(pager.paginate(items, params.page, params.size)),
            Paginator::LimitOffset(pager) => Ok(pager.paginate(items, params.limit, params.start)),
            Paginator::Cursor(pager) => pager.paginate(items, key, params.record.as_deref()),
        }
    }
}

// ---------------------------------------------------------------------------
// Page-number strategy
// ---------------------------------------------------------------------------

/// Client selection on the page key: a 1-based index or the `end` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelector {
    Index(usize),
    Last,
}

impl PageSelector {
    /// Parse the raw `p=` query value. Unparsable values select page 1.
    pub fn parse(raw: &str) -> Self {
        if raw == LAST_PAGE_SENTINEL {
            PageSelector::Last
        } else {
            raw.parse().map(PageSelector::Index).unwrap_or(PageSelector::Index(1))
        }
    }
}

/// Page-number windowing: `?p=<page>&size=<page size>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumberPagination {
    pub page_size: usize,
    pub max_page_size: usize,
}

impl Default for PageNumberPagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageNumberPagination {
    /// Window `items` to the requested page.
    ///
    /// A requested size above the maximum is clamped silently. A page index
    /// past the end returns an empty page with no adjacent-page indicators.
    pub fn paginate<T>(&self, items: Vec<T>, page: Option<PageSelector>, size: Option<usize>) -> Page<T> {
        let size = size.unwrap_or(self.page_size).clamp(1, self.max_page_size);
        let count = items.len();
        let total_pages = count.div_ceil(size).max(1);

        let number = match page.unwrap_or(PageSelector::Index(1)) {
            PageSelector::Index(n) => n,
            PageSelector::Last => total_pages,
        };

        if number == 0 || number > total_pages {
            return Page {
                items: Vec::new(),
                next: None,
                previous: None,
                count,
            };
        }

        let start = (number - 1) * size;
        let end = (start + size).min(count);

        let next = (number < total_pages).then(|| (number + 1).to_string());
        let previous = (number > 1).then(|| (number - 1).to_string());

        Page {
            items: carve(items, start, end),
            next,
            previous,
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// Limit-offset strategy
// ---------------------------------------------------------------------------

/// Limit-offset windowing: `?limit=<n>&start=<offset>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffsetPagination {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for LimitOffsetPagination {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl LimitOffsetPagination {
    /// Window `items` to `[start, start + limit)`.
    ///
    /// A limit above the maximum is clamped silently; an offset past the end
    /// yields an empty page. Next/previous indicators carry the adjacent
    /// offsets.
    pub fn paginate<T>(&self, items: Vec<T>, limit: Option<usize>, start: Option<usize>) -> Page<T> {
        let limit = limit.unwrap_or(self.default_limit).clamp(1, self.max_limit);
        let start = start.unwrap_or(0);
        let count = items.len();

        let begin = start.min(count);
        let end = (begin + limit).min(count);

        let next = (start + limit < count).then(|| (start + limit).to_string());
        let previous = (start > 0 && start <= count).then(|| start.saturating_sub(limit).to_string());

        Page {
            items: carve(items, begin, end),
            next,
            previous,
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor strategy
// ---------------------------------------------------------------------------

/// Opaque cursor payload: an offset, a direction flag, and an anchor position
/// in the ordering (creation time as microseconds since the epoch).
///
/// The anchor is always the ordering value of a real item adjacent to the
/// window, so pages stay stable when later items are inserted: an insertion
/// lands after every already-issued anchor and cannot shift earlier pages.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct CursorToken {
    o: usize,
    r: bool,
    p: Option<i64>,
}

impl CursorToken {
    fn encode(&self) -> String {
        // Serialization of this struct cannot fail.
        let json = serde_json::to_vec(self).expect("cursor token serialization");
        URL_SAFE_NO_PAD.encode(json)
    }

    fn decode(raw: &str) -> Result<Self, PaginationError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw)
            .map_err(|_| PaginationError::InvalidCursor)?;
        serde_json::from_slice(&bytes).map_err(|_| PaginationError::InvalidCursor)
    }
}

/// Cursor windowing: `?record=<token>`, fixed page size, ascending creation
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPagination {
    pub page_size: usize,
}

impl Default for CursorPagination {
    fn default() -> Self {
        Self {
            page_size: CURSOR_PAGE_SIZE,
        }
    }
}

impl CursorPagination {
    /// Window `items` (sorted ascending by `key`) to the page the token
    /// selects, or the first page when no token is given.
    ///
    /// `key` extracts the ordering value, typically the creation timestamp in
    /// microseconds. Fails with [`PaginationError::InvalidCursor`] when the
    /// token does not decode or points outside the current result set.
    pub fn paginate<T>(
        &self,
        items: Vec<T>,
        key: impl Fn(&T) -> i64,
        record: Option<&str>,
    ) -> Result<Page<T>, PaginationError> {
        let count = items.len();

        let (start, end) = match record {
            None => (0, self.page_size.min(count)),
            Some(raw) => {
                let token = CursorToken::decode(raw)?;
                self.resolve(&items, &key, &token)?
            }
        };

        let next = next_token(&items, &key, end);
        let previous = previous_token(&items, &key, start);

        Ok(Page {
            items: carve(items, start, end),
            next,
            previous,
            count,
        })
    }

    /// Resolve a decoded token to an absolute `[start, end)` window.
    fn resolve<T>(
        &self,
        items: &[T],
        key: &impl Fn(&T) -> i64,
        token: &CursorToken,
    ) -> Result<(usize, usize), PaginationError> {
        let len = items.len();
        if token.r {
            // Backward: take `page_size` items ending just before the anchor,
            // after skipping `o` from the end of the filtered prefix.
            let upper = match token.p {
                Some(p) => items.partition_point(|x| key(x) < p),
                None => len,
            };
            let end = upper.checked_sub(token.o).ok_or(PaginationError::InvalidCursor)?;
            if end == 0 {
                return Err(PaginationError::InvalidCursor);
            }
            Ok((end.saturating_sub(self.page_size), end))
        } else {
            // Forward: start `o` items into the suffix strictly after the anchor.
            let base = match token.p {
                Some(p) => items.partition_point(|x| key(x) <= p),
                None => 0,
            };
            let start = base + token.o;
            if start >= len {
                return Err(PaginationError::InvalidCursor);
            }
            Ok((start, (start + self.page_size).min(len)))
        }
    }
}

/// Build the forward token selecting the window that begins at `end`.
///
/// The anchor is the last item whose key differs from `items[end]`'s
/// predecessor run, with an offset covering any equal-key ties so the
/// follow-up request lands exactly at `end`.
fn next_token<T>(items: &[T], key: &impl Fn(&T) -> i64, end: usize) -> Option<String> {
    if end >= items.len() {
        return None;
    }
    let last_key = key(&items[end - 1]);
    let first_of_run = items.partition_point(|x| key(x) < last_key);
    let token = if first_of_run == 0 {
        CursorToken {
            o: end,
            r: false,
            p: None,
        }
    } else {
        CursorToken {
            o: end - first_of_run,
            r: false,
            p: Some(key(&items[first_of_run - 1])),
        }
    };
    Some(token.encode())
}

/// Build the backward token selecting the window that ends at `start`.
fn previous_token<T>(items: &[T], key: &impl Fn(&T) -> i64, start: usize) -> Option<String> {
    if start == 0 {
        return None;
    }
    let first_key = key(&items[start]);
    let after_run = items.partition_point(|x| key(x) <= first_key);
    let token = if after_run == items.len() {
        CursorToken {
            o: items.len() - start,
            r: true,
            p: None,
        }
    } else {
        CursorToken {
            o: after_run - start,
            r: true,
            p: Some(key(&items[after_run])),
        }
    };
    Some(token.encode())
}

/// Reduce `items` to the `[start, end)` window without cloning.
fn carve<T>(mut items: Vec<T>, start: usize, end: usize) -> Vec<T> {
    items.truncate(end);
    if start > 0 {
        items.drain(..start);
    }
    items
}
