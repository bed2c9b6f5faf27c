//! Filter query builder

use super::values::is_empty_value;
use crate::types::{JsonObject, JsonValue};
use std::collections::HashMap;

/// Caller field name -> upstream field name
pub type FieldMapping = HashMap<String, String>;

/// Flatten a filter map into a query map.
///
/// Null and empty-string values are skipped; `0` and `false` are kept.
/// Object values are range filters and become one `field[op]` key per
/// non-empty inner entry, never a bare `field` key. Keys missing from
/// `field_mapping`, or mapped to an empty name, pass through unchanged.
pub fn build_filter_query(
    filters: &JsonObject,
    field_mapping: Option<&FieldMapping>,
) -> JsonObject {
    let mut query = JsonObject::new();

    for (key, value) in filters {
        if is_empty_value(value) {
            continue;
        }

        let field = field_mapping
            .and_then(|mapping| mapping.get(key))
            .filter(|mapped| !mapped.is_empty())
            .unwrap_or(key);

        match value {
            JsonValue::Object(ranges) => {
                for (operator, operand) in ranges {
                    if !is_empty_value(operand) {
                        query.insert(format!("{field}[{operator}]"), operand.clone());
                    }
                }
            }
            _ => {
                query.insert(field.clone(), value.clone());
            }
        }
    }

    query
}
