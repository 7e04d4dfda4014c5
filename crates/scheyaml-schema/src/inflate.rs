//! # Shorthand Inflation
//!
//! Schema documents are written in a compact notation and expanded into a
//! canonical schema tree before compilation. Rules, in priority order:
//!
//! | Shorthand                         | Canonical form                                   |
//! |-----------------------------------|--------------------------------------------------|
//! | mapping with a string `type`      | unchanged (full schema escape hatch)             |
//! | `"<name>[]"`                      | `{type: array, items: inflate("<name>")}`        |
//! | `"string"`/`"number"`/`"boolean"` | `{type: <name>}`                                 |
//! | any other string `s`              | `{type: enum, enum: [s]}`                        |
//! | sequence `L`                      | `{type: enum, enum: L}`                          |
//! | other mapping `M`                 | `{type: object, properties, required: keys(M)}`  |
//! | anything else                     | unchanged                                        |
//!
//! Every key of a shorthand mapping is required; there is no optional
//! property shorthand. Authors who need one write a full schema fragment.

use serde_json::{json, Map, Value};

/// Names inflated to a bare `{type: <name>}`.
pub const PRIMITIVE_TYPES: [&str; 3] = ["string", "number", "boolean"];

/// Pseudo type marking an enumeration of literal values.
pub const ENUM_TYPE: &str = "enum";

const ARRAY_SUFFIX: &str = "[]";

/// Expand a shorthand schema description into a canonical schema.
///
/// Total and side-effect free. Canonical fragments pass through unchanged,
/// so `inflate(&inflate(v)) == inflate(v)`.
pub fn inflate(raw: &Value) -> Value {
    match raw {
        Value::Object(map) if map.get("type").is_some_and(Value::is_string) => raw.clone(),
        Value::String(name) => inflate_name(name),
        Value::Array(values) => json!({ "type": ENUM_TYPE, "enum": values }),
        Value::Object(map) => inflate_object(map),
        other => other.clone(),
    }
}

fn inflate_name(name: &str) -> Value {
    if let Some(element) = name.strip_suffix(ARRAY_SUFFIX) {
        return json!({ "type": "array", "items": inflate_name(element) });
    }
    if PRIMITIVE_TYPES.contains(&name) {
        json!({ "type": name })
    } else {
        json!({ "type": ENUM_TYPE, "enum": [name] })
    }
}

fn inflate_object(map: &Map<String, Value>) -> Value {
    let mut properties = Map::with_capacity(map.len());
    let mut required = Vec::with_capacity(map.len());
    for (key, value) in map {
        properties.insert(key.clone(), inflate(value));
        required.push(Value::String(key.clone()));
    }
    json!({ "type": "object", "properties": properties, "required": required })
}
