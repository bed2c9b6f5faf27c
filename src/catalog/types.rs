//! Catalog types
//!
//! Declarative resource/operation definitions for YAML parsing.

use crate::query::FieldMapping;
use crate::types::{JsonObject, Method};
use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog Definition
// ============================================================================

/// Top-level catalog definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogDefinition {
    /// Catalog name
    pub name: String,
    /// Catalog version
    #[serde(default = "default_version")]
    pub version: String,
    /// Connection check configuration
    #[serde(default)]
    pub check: Option<CheckDefinition>,
    /// Resource definitions
    pub resources: Vec<ResourceDefinition>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Connection check configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckDefinition {
    /// Endpoint path for the check request
    pub path: String,
    /// Query parameters
    #[serde(default)]
    pub query: JsonObject,
}

impl Default for CheckDefinition {
    fn default() -> Self {
        let mut query = JsonObject::new();
        query.insert("limit".to_string(), 1.into());
        Self {
            path: "/products".to_string(),
            query,
        }
    }
}

// ============================================================================
// Resource Definition
// ============================================================================

/// One upstream entity (sales orders, products, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceDefinition {
    /// Resource name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Operations on this resource
    pub operations: Vec<OperationDefinition>,
}

impl ResourceDefinition {
    /// Find an operation by (already normalized) name
    pub fn operation(&self, name: &str) -> Option<&OperationDefinition> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Operation names in declaration order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }
}

// ============================================================================
// Operation Definition
// ============================================================================

/// How an operation's response is gathered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    /// One request, response returned as-is
    #[default]
    Single,
    /// Every page, no cap
    All,
    /// Every page or one limited page, chosen by the caller
    List,
}

/// One operation on a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// Operation name
    pub name: String,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Endpoint path template, e.g. `/sales_orders/{{ id }}`
    pub path: String,
    /// Response gathering mode
    #[serde(default)]
    pub mode: OperationMode,
    /// Fixed body merged over the caller's body
    #[serde(default)]
    pub body: Option<JsonObject>,
    /// Fixed query parameters (can contain templates)
    #[serde(default)]
    pub query: Option<JsonObject>,
    /// Renames applied to caller filter keys
    #[serde(default)]
    pub filter_mapping: Option<FieldMapping>,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

impl OperationDefinition {
    /// Whether this operation paginates
    pub fn is_paginated(&self) -> bool {
        matches!(self.mode, OperationMode::All | OperationMode::List)
    }
}
