//! Validation of standard tool definitions
//!
//! Every provider converts tools from the same standard shape
//! `{name, description, parameters}`; this module checks that shape before
//! any provider-specific wrapping happens. One malformed tool fails the whole
//! conversion with the offending definition attached.

use crate::tool::entities::ToolDefinition;
use serde_json::{Value, json};
use thiserror::Error;

/// Parameter types a tool property may declare.
pub const SUPPORTED_PARAMETER_TYPES: [&str; 6] =
    ["string", "number", "integer", "boolean", "array", "object"];

const REQUIRED_FIELDS: [&str; 3] = ["name", "description", "parameters"];

/// A tool definition that cannot be converted for a provider.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid tool definition: {message}")]
pub struct ToolValidationError {
    pub message: String,
    /// The standard definition that failed validation.
    pub tool: Value,
    pub details: Option<Value>,
}

impl ToolValidationError {
    fn new(message: impl Into<String>, tool: &Value) -> Self {
        Self {
            message: message.into(),
            tool: tool.clone(),
            details: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Name of the offending tool, when it has one.
    pub fn tool_name(&self) -> Option<&str> {
        self.tool.get("name").and_then(Value::as_str)
    }
}

/// Validate one standard tool definition.
pub fn validate_tool(tool: &Value) -> Result<(), ToolValidationError> {
    let fields = tool
        .as_object()
        .ok_or_else(|| ToolValidationError::new("Tool definition must be an object", tool))?;

    for field in REQUIRED_FIELDS {
        if !fields.contains_key(field) {
            return Err(ToolValidationError::new(
                format!("Missing required field: {field}"),
                tool,
            ));
        }
    }

    if !is_non_empty_str(&fields["name"]) {
        return Err(ToolValidationError::new(
            "Tool name must be a non-empty string",
            tool,
        ));
    }
    if !is_non_empty_str(&fields["description"]) {
        return Err(ToolValidationError::new(
            "Tool description must be a non-empty string",
            tool,
        ));
    }

    let parameters = fields["parameters"]
        .as_object()
        .ok_or_else(|| ToolValidationError::new("Tool parameters must be an object", tool))?;

    let (Some(schema_type), Some(properties)) = (parameters.get("type"), parameters.get("properties"))
    else {
        return Err(ToolValidationError::new(
            "Parameters must have 'type' and 'properties' fields",
            tool,
        ));
    };

    if schema_type.as_str() != Some("object") {
        return Err(
            ToolValidationError::new("Parameters type must be 'object'", tool)
                .with_details(json!({"type": schema_type})),
        );
    }

    let properties = properties.as_object().ok_or_else(|| {
        ToolValidationError::new("Parameters properties must be an object", tool)
    })?;

    for (property, schema) in properties {
        match schema.get("type").and_then(Value::as_str) {
            Some(kind) if SUPPORTED_PARAMETER_TYPES.contains(&kind) => {}
            Some(kind) => {
                return Err(ToolValidationError::new(
                    format!("Unsupported parameter type: {kind} in property: {property}"),
                    tool,
                )
                .with_details(json!({"property": property, "type": kind})));
            }
            None => {
                return Err(ToolValidationError::new(
                    format!("Property '{property}' must declare a type"),
                    tool,
                )
                .with_details(json!({"property": property})));
            }
        }
    }

    Ok(())
}

/// Validate and return the standard form of every tool, in order.
pub fn standard_tools(tools: &[ToolDefinition]) -> Result<Vec<Value>, ToolValidationError> {
    tools
        .iter()
        .map(|tool| {
            let standard = tool.to_standard();
            validate_tool(&standard)?;
            Ok(standard)
        })
        .collect()
}

fn is_non_empty_str(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_tool() -> Value {
        json!({
            "name": "fs-read_file",
            "description": "Read a file",
            "parameters": {
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "limit": {"type": "integer"},
                },
                "required": ["path"],
            }
        })
    }

    #[test]
    fn test_valid_tool() {
        assert!(validate_tool(&valid_tool()).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let mut tool = valid_tool();
        tool.as_object_mut().unwrap().remove("parameters");
        let err = validate_tool(&tool).unwrap_err();
        assert_eq!(err.message, "Missing required field: parameters");
        assert_eq!(err.tool_name(), Some("fs-read_file"));
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut tool = valid_tool();
        tool["description"] = json!("");
        let err = validate_tool(&tool).unwrap_err();
        assert_eq!(err.message, "Tool description must be a non-empty string");
    }

    #[test]
    fn test_non_object_schema_rejected() {
        let mut tool = valid_tool();
        tool["parameters"]["type"] = json!("array");
        assert_eq!(
            validate_tool(&tool).unwrap_err().message,
            "Parameters type must be 'object'"
        );
    }

    #[test]
    fn test_missing_properties_rejected() {
        let mut tool = valid_tool();
        tool["parameters"].as_object_mut().unwrap().remove("properties");
        assert!(validate_tool(&tool).is_err());
    }

    #[test]
    fn test_unsupported_property_type() {
        let mut tool = valid_tool();
        tool["parameters"]["properties"]["when"] = json!({"type": "date"});
        let err = validate_tool(&tool).unwrap_err();
        assert_eq!(err.message, "Unsupported parameter type: date in property: when");
        assert_eq!(err.details.unwrap()["property"], "when");
        assert_eq!(err.tool, tool);
    }

    #[test]
    fn test_standard_tools_fails_on_first_bad_tool() {
        let good = ToolDefinition::new(
            "a-ok",
            "fine",
            json!({"type": "object", "properties": {"x": {"type": "number"}}}),
        );
        let bad = ToolDefinition::new("a-bad", "", json!({"type": "object", "properties": {}}));

        assert_eq!(standard_tools(std::slice::from_ref(&good)).unwrap().len(), 1);

        let err = standard_tools(&[good, bad]).unwrap_err();
        assert_eq!(err.tool_name(), Some("a-bad"));
    }
}
