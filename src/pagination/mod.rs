//! Pagination module
//!
//! Cursor pagination for Katana list endpoints.
//!
//! # Overview
//!
//! [`CursorPager::fetch_all`] repeatedly calls a [`Requester`](crate::http::Requester),
//! forcing the page size onto `limit`, feeding `pagination.cursor_next` back
//! as `cursor`, and concatenating each page's records until no cursor comes
//! back or the caller's cap is reached.

mod pager;
mod types;

pub use pager::CursorPager;
pub use types::{
    extract_records, next_cursor, unwrap_envelope, NextPage, PaginationState, CURSOR_PATH,
};
