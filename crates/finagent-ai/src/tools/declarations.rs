//! Provider-specific projections of tool declarations.

use serde_json::Value;

use crate::ToolDefinition;

/// Convert a tool definition to the Gemini `functionDeclarations` format.
pub fn to_gemini_tool(tool: &ToolDefinition) -> Value {
    serde_json::json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": to_gemini_schema(&tool.parameters),
    })
}

/// Rewrite a JSON Schema into Gemini's OpenAPI subset: type names become
/// the upper-case `Type` enum values. Key order is preserved.
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_ascii_uppercase()),
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        ("items", item) => to_gemini_schema(item),
                        _ => value.clone(),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
