//! Typed trace event records.
//!
//! Raw Chrome Trace Event objects are loosely typed: ids and pids show up as
//! strings or numbers, `args` may be missing or null, and the phase tag is a
//! free-form string. [`EventRecord`] absorbs that looseness at the edge so the
//! importer can dispatch on an exhaustive [`Phase`] enum.

use crate::utils::config::MICROS_PER_MILLI;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Phase tag of a trace event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 'B' - open a synchronous slice
    Begin,
    /// 'E' - close the innermost open synchronous slice
    End,
    /// 'I' or 'i' - zero duration slice
    Instant,
    /// 'P' - sample point
    Sample,
    /// 'C' - counter values
    Counter,
    /// 'M' - metadata (thread/process names)
    Metadata,
    /// 'S' - async slice start
    AsyncStart,
    /// 'T' - async slice step
    AsyncStep,
    /// 'F' - async slice finish
    AsyncFinish,
    /// 's', 't', 'f' - flow events, accepted and dropped
    Flow,
    /// 'N' - object created
    ObjectNew,
    /// 'O' - object snapshot
    ObjectSnapshot,
    /// 'D' - object deleted
    ObjectDelete,
    /// Anything else, kept verbatim for error reporting
    Unknown(String),
}

impl std::str::FromStr for Phase {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "B" => Self::Begin,
            "E" => Self::End,
            "I" | "i" => Self::Instant,
            "P" => Self::Sample,
            "C" => Self::Counter,
            "M" => Self::Metadata,
            "S" => Self::AsyncStart,
            "T" => Self::AsyncStep,
            "F" => Self::AsyncFinish,
            "s" | "t" | "f" => Self::Flow,
            "N" => Self::ObjectNew,
            "O" => Self::ObjectSnapshot,
            "D" => Self::ObjectDelete,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for Phase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Value = Deserialize::deserialize(deserializer)?;
        let tag = match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        match tag.parse() {
            Ok(phase) => Ok(phase),
            Err(never) => match never {},
        }
    }
}

fn default_phase() -> Phase {
    Phase::Unknown(String::new())
}

/// A single trace event, immutable once read
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    /// Phase tag (`ph`)
    #[serde(rename = "ph", default = "default_phase")]
    pub phase: Phase,

    /// Event name; async and object events require it
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub name: Option<String>,

    /// Event category (`cat`)
    #[serde(rename = "cat", default, deserialize_with = "deserialize_string_or_number")]
    pub category: String,

    /// Process id
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub pid: String,

    /// Thread id
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub tid: String,

    /// Timestamp in microseconds (`ts`)
    #[serde(rename = "ts", default, deserialize_with = "deserialize_timestamp")]
    pub timestamp_micros: f64,

    /// Event arguments; anything that is not an object reads as empty
    #[serde(default, deserialize_with = "deserialize_args")]
    pub args: Map<String, Value>,

    /// Correlation id for async, object and keyed counter events
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub id: Option<String>,
}

impl EventRecord {
    /// Timestamp converted to milliseconds
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_micros / MICROS_PER_MILLI
    }

    /// Name, or the empty string for anonymous events
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Decode one record from an already parsed JSON value
    ///
    /// **Public** - used by the normalizer for each array element
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        EventRecord::deserialize(value)
    }
}

/// Render a JSON scalar used as a key (ids, pids, tids)
///
/// **Public** - also used for stream packet pids and async step labels
pub fn value_to_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Deserialize a field that can be either a string or number.
pub(crate) fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    Ok(value_to_key(&value))
}

/// Deserialize an optional field that can be either a string or number.
fn deserialize_optional_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Deserialize::deserialize(deserializer)?;
    match value {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) | None => Ok(None),
    }
}

/// Deserialize a timestamp given as a number or numeric string.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Value = Deserialize::deserialize(deserializer)?;
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("timestamp out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", s, e))),
        Value::Null => Ok(0.0),
        _ => Err(D::Error::custom("expected number or string for ts")),
    }
}

/// Deserialize `args`, treating anything but an object as empty.
fn deserialize_args<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_ids_become_strings() {
        let event = EventRecord::from_value(&json!({
            "ph": "S", "name": "x", "pid": 1, "tid": 2, "ts": 1500, "id": 7
        }))
        .unwrap();

        assert_eq!(event.phase, Phase::AsyncStart);
        assert_eq!(event.pid, "1");
        assert_eq!(event.tid, "2");
        assert_eq!(event.id.as_deref(), Some("7"));
        assert_eq!(event.timestamp_ms(), 1.5);
    }

    #[test]
    fn test_missing_fields_default() {
        let event = EventRecord::from_value(&json!({"ph": "B"})).unwrap();

        assert_eq!(event.name, None);
        assert_eq!(event.category, "");
        assert_eq!(event.timestamp_micros, 0.0);
        assert!(event.args.is_empty());
    }

    #[test]
    fn test_null_args_read_as_empty() {
        let event = EventRecord::from_value(&json!({"ph": "E", "args": null})).unwrap();
        assert!(event.args.is_empty());
    }

    #[test]
    fn test_unknown_phase_is_kept() {
        let event = EventRecord::from_value(&json!({"ph": "X", "name": "x"})).unwrap();
        assert_eq!(event.phase, Phase::Unknown("X".to_string()));
    }

    #[test]
    fn test_lowercase_instant() {
        assert_eq!("i".parse::<Phase>().unwrap(), Phase::Instant);
        assert_eq!("I".parse::<Phase>().unwrap(), Phase::Instant);
    }

    #[test]
    fn test_string_timestamp() {
        let event = EventRecord::from_value(&json!({"ph": "B", "ts": "2000"})).unwrap();
        assert_eq!(event.timestamp_ms(), 2.0);
    }

    #[test]
    fn test_object_timestamp_is_rejected() {
        assert!(EventRecord::from_value(&json!({"ph": "B", "ts": {}})).is_err());
    }
}
