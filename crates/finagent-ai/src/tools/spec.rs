//! Tool schemas and argument validation.

use serde_json::{Map, Value};

use super::ToolError;
use crate::ToolDefinition;

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// One named parameter of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
}

impl ParamSpec {
    pub fn required(
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// Name, description and ordered parameter list of a tool.
///
/// The required list is derived from the per-parameter flags, so every
/// required name always refers to a declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn required_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    fn find(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Project this spec into a provider-neutral declaration.
    pub fn definition(&self) -> ToolDefinition {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.kind.as_str(),
                    "description": param.description,
                }),
            );
        }

        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": self.required_names(),
            }),
        }
    }

    /// Check raw call arguments against the schema.
    ///
    /// Rejects non-object payloads, unknown fields, missing required fields
    /// and type mismatches. Whole-number floats are accepted for integer
    /// parameters and normalized to integers.
    pub fn validate(&self, arguments: &Value) -> Result<ToolArgs, ToolError> {
        let invalid = |reason: String| ToolError::InvalidArguments {
            tool: self.name.clone(),
            reason,
        };

        let raw = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            other => return Err(invalid(format!("expected an object, got {other}"))),
        };

        let mut values = Map::new();
        for (key, value) in raw {
            let param = self
                .find(&key)
                .ok_or_else(|| invalid(format!("unknown parameter '{key}'")))?;
            if value.is_null() && !param.required {
                continue;
            }
            let value = coerce(param, value).ok_or_else(|| {
                invalid(format!(
                    "parameter '{}' must be of type {}",
                    param.name,
                    param.kind.as_str()
                ))
            })?;
            values.insert(key, value);
        }

        for name in self.required_names() {
            if !values.contains_key(name) {
                return Err(invalid(format!("missing required parameter '{name}'")));
            }
        }

        Ok(ToolArgs {
            tool: self.name.clone(),
            values,
        })
    }
}

fn coerce(param: &ParamSpec, value: Value) -> Option<Value> {
    match (param.kind, value) {
        (ParamKind::String, v @ Value::String(_)) => Some(v),
        (ParamKind::Boolean, v @ Value::Bool(_)) => Some(v),
        (ParamKind::Number, v @ Value::Number(_)) => Some(v),
        (ParamKind::Integer, Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                Some(Value::Number(n))
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(Value::from(f as i64))
                } else {
                    None
                }
            }
        }
        _ => None,
    }
}

/// Arguments that passed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArgs {
    tool: String,
    values: Map<String, Value>,
}

impl ToolArgs {
    fn missing(&self, name: &str) -> ToolError {
        ToolError::InvalidArguments {
            tool: self.tool.clone(),
            reason: format!("missing parameter '{name}'"),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Result<&str, ToolError> {
        self.opt_str(name).ok_or_else(|| self.missing(name))
    }

    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn integer(&self, name: &str) -> Result<i64, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.missing(name))
    }

    pub fn number(&self, name: &str) -> Result<f64, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.missing(name))
    }

    pub fn boolean(&self, name: &str) -> Result<bool, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| self.missing(name))
    }
}
