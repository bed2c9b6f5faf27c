//! Query building module
//!
//! Turns caller-side filter maps into the flat query maps the Katana API
//! expects, plus the small value helpers request bodies go through.
//!
//! # Overview
//!
//! Range filters are written as nested objects and flattened into bracket
//! keys:
//!
//! ```text
//! { "created_at": { "gte": "2024-01-01", "lte": "2024-12-31" } }
//!   => created_at[gte]=2024-01-01&created_at[lte]=2024-12-31
//! ```
//!
//! Everything here is pure: no I/O, no shared state.

mod builder;
mod values;

pub use builder::{build_filter_query, FieldMapping};
pub use values::{
    format_date, format_numeric_for_api, is_empty_value, map_fields, parse_numeric,
    remove_empty_values,
};
