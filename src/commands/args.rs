//! Lenient parsing of the `args` envelope sent by the voice agent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept strings, numbers and booleans as text; blank or other values become `None`
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Extract operation arguments from a request body.
///
/// Accepts `{"args": {...}}`, `{"args": "<json object>"}` or the bare object.
/// Anything unparseable yields empty arguments so the operation can answer
/// with its usual guidance message.
pub fn parse_args<T>(body: &[u8]) -> T
where
    T: DeserializeOwned + Default,
{
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return T::default(),
    };

    let args = match value {
        Value::Object(mut map) => match map.remove("args") {
            Some(args @ Value::Object(_)) => args,
            Some(Value::String(encoded)) => match serde_json::from_str::<Value>(&encoded) {
                Ok(args @ Value::Object(_)) => args,
                _ => return T::default(),
            },
            Some(_) => return T::default(),
            None => Value::Object(map),
        },
        _ => return T::default(),
    };

    serde_json::from_value(args).unwrap_or_default()
}
