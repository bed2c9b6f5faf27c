//! Built-in catalog embedded in the library
//!
//! The Katana resource catalog ships inside the crate so callers never need
//! a file on disk.

/// Katana MRP catalog YAML
pub static BUILTIN_CATALOG: &str = include_str!("../../catalog/katana.yaml");
