//! Turns raw response bodies into typed results.

use crate::{
    error::{Result, RunwareError},
    models::{GenerationResult, ResultSet},
};
use serde_json::Value;

fn parse_envelope(body: &str) -> Result<Value> {
    let mut decoded: Value = serde_json::from_str(body)
        .map_err(|e| RunwareError::Decode(format!("invalid JSON: {}", e)))?;

    match decoded.get_mut("data") {
        Some(data) => Ok(data.take()),
        None => Err(RunwareError::Decode(missing_data_message(&decoded))),
    }
}

fn missing_data_message(decoded: &Value) -> String {
    let remote = decoded
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|messages| !messages.is_empty());

    match remote {
        Some(messages) => format!("response does not contain data: {}", messages),
        None => "response does not contain data".to_string(),
    }
}

/// Batch shape: `data` is a list with one entry per generated image.
pub fn parse_generation(body: &str) -> Result<ResultSet> {
    let data = parse_envelope(body)?;
    if !data.is_array() {
        return Err(RunwareError::Decode(
            "expected 'data' to be a list of results".into(),
        ));
    }
    let results: Vec<GenerationResult> = serde_json::from_value(data)
        .map_err(|e| RunwareError::Decode(format!("malformed result entry: {}", e)))?;

    if results.is_empty() {
        log::warn!("Runware response contained no results");
    }
    Ok(ResultSet::new(results))
}

/// Single shape: `data` is one object carrying `field`.
///
/// A one-element list is accepted as well.
pub fn parse_upload(body: &str, field: &str) -> Result<String> {
    let data = parse_envelope(body)?;
    let entry = match &data {
        Value::Object(_) => &data,
        Value::Array(items) => items
            .first()
            .ok_or_else(|| RunwareError::Decode("upload response 'data' is empty".into()))?,
        _ => {
            return Err(RunwareError::Decode(
                "expected 'data' to be an object".into(),
            ))
        }
    };

    entry
        .get(field)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| {
            RunwareError::Decode(format!("missing '{}' in response data", field))
        })
}
