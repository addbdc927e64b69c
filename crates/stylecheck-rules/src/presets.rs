//! Ready-made option maps.

use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        // json! with a brace literal always yields an object.
        _ => Map::new(),
    }
}

/// The `recommended` preset: the fixable whitespace and quoting rules.
#[must_use]
pub fn recommended() -> Map<String, Value> {
    object(json!({
        "disallowQuotedKeysInObjects": true,
        "requireSpaceAfterKeywords": true,
        "disallowMultipleLineBreaks": true,
        "requireLineFeedAtFileEnd": true,
    }))
}

/// The `strict` preset: `recommended` plus keyword and line-length limits.
#[must_use]
pub fn strict() -> Map<String, Value> {
    let mut options = recommended();
    options.extend(object(json!({
        "disallowKeywords": ["with"],
        "maximumLineLength": 100,
    })));
    options
}
