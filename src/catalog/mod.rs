//! Resource catalog module
//!
//! Declarative description of every Katana resource and operation.
//!
//! # Overview
//!
//! The catalog module provides:
//! - `CatalogDefinition` - Parsed YAML catalog
//! - `OperationDefinition` - Method, path template, gathering mode, fixed body/query
//! - `Catalog` - Validated catalog with name lookups, including the embedded default

mod builtin;
mod loader;
mod types;

pub use builtin::BUILTIN_CATALOG;
pub use loader::{load_catalog, load_catalog_from_str, normalize_name, Catalog};
pub use types::{
    CatalogDefinition, CheckDefinition, OperationDefinition, OperationMode, ResourceDefinition,
};
