#![deny(missing_docs)]

//! # OpenAPI Normalization
//!
//! Rewrites OpenAPI 3.0 documents into the 3.1 vocabulary `utoipa`
//! understands before deserializing contracts.
//!
//! - `nullable: true` / `x-nullable: true` become `type: [T, "null"]`, or an
//!   `anyOf` with a null branch when the schema has no `type`.
//! - Boolean schemas become object schemas.

use serde_json::{json, Map, Value};

/// Applies every rewrite to a whole document.
pub(crate) fn normalize_document(value: &mut Value) {
    normalize_nullable_schemas(value);
    normalize_boolean_schemas(value);
}

/// Rewrites `nullable` flags into null unions, recursively.
pub(crate) fn normalize_nullable_schemas(value: &mut Value) {
    if let Value::Object(map) = value {
        if let Some(replacement) = apply_nullable_flag(map) {
            *value = replacement;
        }
    }

    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                normalize_nullable_schemas(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                normalize_nullable_schemas(v);
            }
        }
        _ => {}
    }
}

fn apply_nullable_flag(map: &mut Map<String, Value>) -> Option<Value> {
    let flagged = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);
    if !(flagged("nullable") || flagged("x-nullable")) {
        map.remove("nullable");
        return None;
    }

    map.remove("nullable");
    map.remove("x-nullable");

    if let Some(type_val) = map.get_mut("type") {
        match type_val {
            Value::String(s) if s.as_str() != "null" => {
                let single = s.clone();
                *type_val = json!([single, "null"]);
            }
            Value::Array(types) => {
                if !types.iter().any(|t| t.as_str() == Some("null")) {
                    types.push(Value::String("null".to_string()));
                }
            }
            _ => {}
        }
        return None;
    }

    let original = Value::Object(map.clone());
    Some(json!({ "anyOf": [original, { "type": "null" }] }))
}

/// Rewrites `true` / `false` schemas in schema positions.
fn normalize_boolean_schemas(value: &mut Value) {
    if let Some(schemas) = value
        .get_mut("components")
        .and_then(|c| c.get_mut("schemas"))
        .and_then(Value::as_object_mut)
    {
        for schema in schemas.values_mut() {
            normalize_schema_node(schema);
        }
    }
    normalize_schema_fields(value);
}

fn normalize_schema_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if key == "schema" {
                    normalize_schema_node(v);
                } else {
                    normalize_schema_fields(v);
                }
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                normalize_schema_fields(v);
            }
        }
        _ => {}
    }
}

fn normalize_schema_node(value: &mut Value) {
    match value {
        Value::Bool(flag) => *value = bool_schema_replacement(*flag),
        Value::Object(map) => {
            if let Some(props) = map.get_mut("properties").and_then(Value::as_object_mut) {
                for v in props.values_mut() {
                    normalize_schema_node(v);
                }
            }
            if let Some(items) = map.get_mut("items") {
                normalize_schema_node(items);
            }
            for key in ["allOf", "anyOf", "oneOf"] {
                if let Some(members) = map.get_mut(key).and_then(Value::as_array_mut) {
                    for v in members.iter_mut() {
                        normalize_schema_node(v);
                    }
                }
            }
            if let Some(additional) = map.get_mut("additionalProperties") {
                if !additional.is_boolean() {
                    normalize_schema_node(additional);
                }
            }
        }
        _ => {}
    }
}

fn bool_schema_replacement(flag: bool) -> Value {
    if flag {
        Value::Object(Map::new())
    } else {
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["__never__"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nullable_with_type_becomes_type_union() {
        let mut value = json!({"type": "string", "nullable": true});
        normalize_nullable_schemas(&mut value);
        assert_eq!(value, json!({"type": ["string", "null"]}));
    }

    #[test]
    fn test_nullable_without_type_becomes_any_of() {
        let mut value = json!({
            "allOf": [{"$ref": "#/components/schemas/Pet"}],
            "nullable": true
        });
        normalize_nullable_schemas(&mut value);
        assert_eq!(
            value,
            json!({"anyOf": [
                {"allOf": [{"$ref": "#/components/schemas/Pet"}]},
                {"type": "null"}
            ]})
        );
    }

    #[test]
    fn test_false_nullable_is_dropped() {
        let mut value = json!({"properties": {"a": {"type": "integer", "nullable": false}}});
        normalize_nullable_schemas(&mut value);
        assert_eq!(value, json!({"properties": {"a": {"type": "integer"}}}));
    }

    #[test]
    fn test_boolean_schemas_in_schema_positions() {
        let mut value = json!({
            "components": {"schemas": {"Any": true, "Obj": {"properties": {"flag": false}}}},
            "paths": {"/a": {"get": {"responses": {"200": {
                "description": "Ok",
                "content": {"application/json": {"schema": true}}
            }}}}}
        });
        normalize_document(&mut value);
        assert!(value["components"]["schemas"]["Any"].is_object());
        assert!(value["components"]["schemas"]["Obj"]["properties"]["flag"].is_object());
        assert!(
            value["paths"]["/a"]["get"]["responses"]["200"]["content"]["application/json"]
                ["schema"]
                .is_object()
        );
    }
}
