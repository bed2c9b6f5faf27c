//! YAML loader for catalog definitions
//!
//! Parses and validates catalog YAML, either the embedded Katana catalog or
//! a custom file.

use super::builtin::BUILTIN_CATALOG;
use super::types::{CatalogDefinition, CheckDefinition, OperationDefinition, ResourceDefinition};
use crate::error::{Error, Result};
use crate::types::Method;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a catalog definition from a YAML file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read catalog file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_catalog_from_str(&content)
}

/// Load a catalog definition from a YAML string
pub fn load_catalog_from_str(yaml: &str) -> Result<CatalogDefinition> {
    let mut def: CatalogDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse catalog YAML: {e}")))?;

    for resource in &mut def.resources {
        resource.name = normalize_name(&resource.name);
        for op in &mut resource.operations {
            op.name = normalize_name(&op.name);
        }
    }

    validate_catalog(&def)?;
    Ok(def)
}

/// Normalize a resource or operation name to snake_case.
///
/// `salesOrder`, `sales-order` and `Sales Order` all become `sales_order`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for c in name.trim().chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    out
}

/// Validate a catalog definition
fn validate_catalog(def: &CatalogDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Catalog name cannot be empty"));
    }

    if def.resources.is_empty() {
        return Err(Error::config("Catalog must have at least one resource"));
    }

    let names: HashSet<_> = def.resources.iter().map(|r| &r.name).collect();
    if names.len() != def.resources.len() {
        return Err(Error::config("Duplicate resource names found"));
    }

    if let Some(check) = &def.check {
        validate_path("check", &check.path)?;
    }

    for resource in &def.resources {
        validate_resource(resource)?;
    }

    Ok(())
}

/// Validate a resource definition
fn validate_resource(resource: &ResourceDefinition) -> Result<()> {
    if resource.name.is_empty() {
        return Err(Error::config("Resource name cannot be empty"));
    }

    if resource.operations.is_empty() {
        return Err(Error::config(format!(
            "Resource '{}' must have at least one operation",
            resource.name
        )));
    }

    let names: HashSet<_> = resource.operations.iter().map(|o| &o.name).collect();
    if names.len() != resource.operations.len() {
        return Err(Error::config(format!(
            "Duplicate operation names in resource '{}'",
            resource.name
        )));
    }

    for op in &resource.operations {
        validate_operation(&resource.name, op)?;
    }

    Ok(())
}

/// Validate an operation definition
fn validate_operation(resource: &str, op: &OperationDefinition) -> Result<()> {
    if op.name.is_empty() {
        return Err(Error::config(format!(
            "Resource '{resource}' has an operation with an empty name"
        )));
    }

    validate_path(&format!("{resource}.{}", op.name), &op.path)?;

    if op.is_paginated() && op.method != Method::GET {
        return Err(Error::config(format!(
            "Operation '{resource}.{}' paginates but uses {}",
            op.name, op.method
        )));
    }

    Ok(())
}

fn validate_path(owner: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::config(format!("'{owner}' path cannot be empty")));
    }
    if !path.starts_with('/') {
        return Err(Error::config(format!(
            "'{owner}' path must start with '/': {path}"
        )));
    }
    Ok(())
}

// ============================================================================
// Catalog
// ============================================================================

/// A validated catalog with name lookups
#[derive(Debug, Clone)]
pub struct Catalog {
    definition: CatalogDefinition,
}

impl Catalog {
    /// Wrap an already validated definition
    pub fn new(definition: CatalogDefinition) -> Self {
        Self { definition }
    }

    /// The embedded Katana catalog
    pub fn builtin() -> Result<Self> {
        let definition = load_catalog_from_str(BUILTIN_CATALOG)?;
        debug!(
            resources = definition.resources.len(),
            version = %definition.version,
            "Loaded built-in catalog"
        );
        Ok(Self::new(definition))
    }

    /// Parse and validate a catalog from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        load_catalog_from_str(yaml).map(Self::new)
    }

    /// Parse and validate a catalog from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        load_catalog(path).map(Self::new)
    }

    /// The underlying definition
    pub fn definition(&self) -> &CatalogDefinition {
        &self.definition
    }

    /// Look up a resource; names are normalized first
    pub fn resource(&self, name: &str) -> Result<&ResourceDefinition> {
        let name = normalize_name(name);
        self.definition
            .resources
            .iter()
            .find(|r| r.name == name)
            .ok_or(Error::UnknownResource { resource: name })
    }

    /// Look up an operation on a resource; names are normalized first
    pub fn operation(&self, resource: &str, operation: &str) -> Result<&OperationDefinition> {
        let resource = self.resource(resource)?;
        let operation = normalize_name(operation);
        resource
            .operation(&operation)
            .ok_or_else(|| Error::UnknownOperation {
                resource: resource.name.clone(),
                operation,
            })
    }

    /// Resource names in declaration order
    pub fn resources(&self) -> Vec<&str> {
        self.definition
            .resources
            .iter()
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Connection check request, falling back to `GET /products?limit=1`
    pub fn check(&self) -> CheckDefinition {
        self.definition.check.clone().unwrap_or_default()
    }
}
