//! Cursor pager
//!
//! Follows `pagination.cursor_next` until the upstream stops returning one,
//! concatenating each page's records in upstream order.

use super::types::{extract_records, next_cursor, NextPage, PaginationState};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::Result;
use crate::http::{ApiRequest, Requester};
use crate::types::{JsonObject, JsonValue};
use tracing::debug;

/// Cursor-based pagination over a [`Requester`]
///
/// The page size is always forced onto the `limit` query parameter; the
/// caller's `limit` argument to [`fetch_all`](Self::fetch_all) caps the total
/// instead.
///
/// There is no iteration ceiling. An upstream that never stops handing out
/// cursors keeps this looping.
#[derive(Debug, Clone)]
pub struct CursorPager {
    /// Records requested per page
    pub page_size: u32,
    /// Query parameter carrying the page size
    pub limit_param: String,
    /// Query parameter carrying the cursor
    pub cursor_param: String,
}

impl CursorPager {
    /// Create a pager with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            limit_param: "limit".to_string(),
            cursor_param: "cursor".to_string(),
        }
    }

    /// Count one page's records and decide whether another page follows
    pub fn process_response(
        &self,
        body: &JsonValue,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);

        next_cursor(body).map_or(NextPage::Done, NextPage::with_cursor)
    }

    /// Fetch every page of `request`.
    ///
    /// With `limit = Some(n)` (n > 0) the result is cut to exactly `n`
    /// records as soon as that many have arrived, even mid-page. `Some(0)`
    /// means no cap.
    pub async fn fetch_all<R: Requester + ?Sized>(
        &self,
        requester: &R,
        mut request: ApiRequest,
        limit: Option<usize>,
    ) -> Result<Vec<JsonValue>> {
        let cap = limit.filter(|&n| n > 0);
        let mut query = request.query.take().unwrap_or_else(JsonObject::new);
        query.insert(self.limit_param.clone(), self.page_size.into());

        let mut records = Vec::new();
        let mut state = PaginationState::new();

        loop {
            state.next_page();

            let page_request = ApiRequest {
                query: Some(query.clone()),
                ..request.clone()
            };
            let response = requester.execute(page_request).await?;

            let page = extract_records(&response);
            let page_len = page.len();
            records.extend(page);

            let next = self.process_response(&response, page_len, &mut state);
            debug!(
                endpoint = %request.endpoint,
                page = state.page,
                records = page_len,
                total = state.total_fetched,
                has_more = next.is_continue(),
                "Fetched page"
            );

            if let Some(cap) = cap {
                if records.len() >= cap {
                    records.truncate(cap);
                    return Ok(records);
                }
            }

            match next {
                NextPage::Continue { cursor } => {
                    query.insert(self.cursor_param.clone(), cursor.into());
                }
                NextPage::Done => break,
            }
        }

        Ok(records)
    }
}

impl Default for CursorPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
