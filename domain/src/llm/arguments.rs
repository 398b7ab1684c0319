//! Tool-call argument decoding shared by the provider parsers

use serde_json::{Map, Value};

/// Decode provider-supplied arguments into a mapping.
///
/// Accepts a JSON-encoded string (blank means no arguments) or an already
/// decoded object. Anything else, or a string that does not decode to an
/// object, is rejected with a reason.
pub(crate) fn parse_arguments(raw: &Value) -> Result<Map<String, Value>, String> {
    match raw {
        Value::Object(map) => Ok(map.clone()),
        Value::String(s) if s.trim().is_empty() => Ok(Map::new()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("arguments are not an object: {other}")),
            Err(e) => Err(format!("invalid arguments JSON: {e}")),
        },
        other => Err(format!("unexpected arguments value: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments(&json!("{\"a\": 1}")).unwrap()["a"], 1);
        assert_eq!(parse_arguments(&json!({"b": true})).unwrap()["b"], true);
        assert!(parse_arguments(&json!("")).unwrap().is_empty());
        assert!(parse_arguments(&json!("[1, 2]")).is_err());
        assert!(parse_arguments(&json!("{oops")).is_err());
        assert!(parse_arguments(&json!(3)).is_err());
    }
}
