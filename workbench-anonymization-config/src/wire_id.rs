use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserializes a server-issued identifier that may arrive either as a JSON
/// string or as a JSON integer, always yielding its string form.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or integer identifier, found {other}"
        ))),
    }
}
