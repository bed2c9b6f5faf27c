//! Template interpolation for catalog paths and fixed parameters
//!
//! Handles `{{ variable }}` interpolation against an invocation's params.
//! Supports nested access like `{{ row.id }}`.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Characters that would change the shape of a URL if spliced into a path
const PATH_RESERVED: &[char] = &['/', '?', '#'];

/// Look up a dotted path in `params`; null counts as missing
fn lookup<'a>(params: &'a JsonObject, path: &str) -> Option<&'a JsonValue> {
    let mut parts = path.split('.');
    let first = params.get(parts.next()?)?;
    let value = parts.try_fold(first, |current, key| current.get(key))?;
    (!value.is_null()).then_some(value)
}

/// Render a template string against `params`
pub fn render(template: &str, params: &JsonObject) -> Result<String> {
    render_with(template, params, |_, value| Ok(value_to_string(value)))
}

/// Render an endpoint path template.
///
/// Substituted values must be non-empty, must not contain `/`, `?` or `#`,
/// and must not be a dot segment (`.`, `..` or a percent-encoded form of
/// either), so a parameter can never escape its path segment.
pub fn render_path(template: &str, params: &JsonObject) -> Result<String> {
    render_with(template, params, |name, value| {
        let segment = value_to_string(value);
        if segment.is_empty() {
            return Err(Error::invalid_param(name, "path parameter is empty"));
        }
        if segment.contains(PATH_RESERVED) || is_dot_segment(&segment) {
            return Err(Error::invalid_param(
                name,
                format!("'{segment}' is not a valid path segment"),
            ));
        }
        Ok(segment)
    })
}

/// `.` or `..`, with any dot written as `%2e` in either case
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn render_with<F>(template: &str, params: &JsonObject, mut convert: F) -> Result<String>
where
    F: FnMut(&str, &JsonValue) -> Result<String>,
{
    let mut result = String::with_capacity(template.len());
    let mut last = 0;
    let mut missing = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let (Some(full), Some(var)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        result.push_str(&template[last..full.start()]);
        last = full.end();

        match lookup(params, var.as_str()) {
            Some(value) => result.push_str(&convert(var.as_str(), value)?),
            None => missing.push(var.as_str().to_string()),
        }
    }
    result.push_str(&template[last..]);

    if missing.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// The variable name when `s` is exactly one placeholder and nothing else
fn sole_variable(s: &str) -> Option<&str> {
    let cap = TEMPLATE_REGEX.captures(s.trim())?;
    let full = cap.get(0)?;
    (full.as_str().len() == s.trim().len()).then(|| cap.get(1).map(|m| m.as_str()))?
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        // For complex types, use JSON serialization
        _ => value.to_string(),
    }
}

/// Render all string values in a JSON value.
///
/// A string that is a single placeholder is replaced by the raw parameter,
/// so `"{{ id }}"` with `id = 42` yields the number `42`, not `"42"`.
pub fn render_value(value: &JsonValue, params: &JsonObject) -> Result<JsonValue> {
    match value {
        JsonValue::String(s) => {
            if let Some(var) = sole_variable(s) {
                return lookup(params, var)
                    .cloned()
                    .ok_or_else(|| Error::undefined_var(var));
            }
            if has_templates(s) {
                Ok(JsonValue::String(render(s, params)?))
            } else {
                Ok(value.clone())
            }
        }
        JsonValue::Object(map) => {
            let mut rendered = JsonObject::new();
            for (k, v) in map {
                rendered.insert(k.clone(), render_value(v, params)?);
            }
            Ok(JsonValue::Object(rendered))
        }
        JsonValue::Array(arr) => arr
            .iter()
            .map(|v| render_value(v, params))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        _ => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: JsonValue) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_simple_substitution() {
        let p = params(json!({"id": 42}));
        assert_eq!(render("/sales_orders/{{ id }}", &p).unwrap(), "/sales_orders/42");
    }

    #[test]
    fn test_multiple_substitutions() {
        let p = params(json!({"id": "17", "ingredient_id": 3}));
        let result = render_path("/variants/{{ id }}/recipe/ingredients/{{ ingredient_id }}", &p)
            .unwrap();
        assert_eq!(result, "/variants/17/recipe/ingredients/3");
    }

    #[test]
    fn test_nested_value() {
        let p = params(json!({"row": {"id": 9}}));
        assert_eq!(render("/sales_order_rows/{{ row.id }}", &p).unwrap(), "/sales_order_rows/9");
    }

    #[test]
    fn test_undefined_variable() {
        let p = params(json!({"other": 1}));
        let err = render("/products/{{ id }}", &p).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn test_null_counts_as_undefined() {
        let p = params(json!({"id": null}));
        assert!(render("/products/{{ id }}", &p).is_err());
    }

    #[test]
    fn test_no_templates() {
        let p = JsonObject::new();
        assert_eq!(render("/inventory/summary", &p).unwrap(), "/inventory/summary");
    }

    #[test]
    fn test_render_path_rejects_reserved_characters() {
        for bad in [
            "1/../../admin",
            "1?x=2",
            "1#frag",
            "",
            ".",
            "..",
            "%2e",
            "%2e%2e",
            "%2E%2E",
            ".%2e",
            "%2e.",
        ] {
            let p = params(json!({"id": bad}));
            let err = render_path("/products/{{ id }}", &p).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { .. }), "{bad}");
        }
    }

    #[test]
    fn test_render_path_keeps_dotted_values() {
        for good in ["v1.2", "...", "a..b", "%2e%2e%2e"] {
            let p = params(json!({"id": good}));
            assert_eq!(
                render_path("/products/{{ id }}", &p).unwrap(),
                format!("/products/{good}")
            );
        }
    }

    #[test]
    fn test_has_templates() {
        assert!(has_templates("{{ id }}"));
        assert!(has_templates("/products/{{ id }}/variants"));
        assert!(!has_templates("/products"));
        assert!(!has_templates("{ not a template }"));
    }

    #[test]
    fn test_render_value_keeps_raw_type_for_sole_placeholder() {
        let p = params(json!({"id": 42, "name": "Acme"}));
        let input = json!({
            "customer_id": "{{ id }}",
            "label": "Customer {{ name }}",
            "status": "DONE"
        });

        assert_eq!(
            render_value(&input, &p).unwrap(),
            json!({"customer_id": 42, "label": "Customer Acme", "status": "DONE"})
        );
    }

    #[test]
    fn test_render_value_missing_variable() {
        let p = JsonObject::new();
        let err = render_value(&json!({"supplier_id": "{{ id }}"}), &p).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
    }

    #[test]
    fn test_whitespace_in_template() {
        let p = params(json!({"id": "x"}));
        assert_eq!(render("{{id}}", &p).unwrap(), "x");
        assert_eq!(render("{{ id }}", &p).unwrap(), "x");
        assert_eq!(render("{{  id  }}", &p).unwrap(), "x");
    }
}
