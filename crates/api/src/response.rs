//! Shared response envelope types for API handlers.
//!
//! Plain responses use a `{ "data": ... }` envelope; paginated responses add
//! next/previous indicators and the total count alongside the data.

use serde::Serialize;
use watchbase_core::pagination::Page;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Response envelope for paginated list endpoints.
///
/// `next` and `previous` hold whatever the endpoint's pagination strategy
/// uses to address adjacent pages: a page number, an offset, or an opaque
/// cursor token.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub count: usize,
}

impl<T: Serialize> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            next: page.next,
            previous: page.previous,
            count: page.count,
        }
    }
}
