//! Utility functions for tool argument handling

use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::blockchain::models::ToolError;

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<T, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Err(ToolError::schema(key, "is required")),
        Some(value) => from_value(value.clone())
            .map_err(|e| ToolError::schema(key, format!("has an invalid type ({})", e))),
    }
}

/// Like [`get_required_arg`], but a missing or `null` value is `None`.
pub fn get_optional_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
) -> Result<Option<T>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => get_required_arg(args, key).map(Some),
    }
}

/// Treat empty or whitespace-only strings as absent.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
