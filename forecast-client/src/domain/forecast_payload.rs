use serde::Deserialize;
use serde_json::{Map, Value};

/// Forecast document as returned by the Open-Meteo `/v1/forecast` endpoint.
///
/// Only the sections the ingestor reshapes are named. They are kept as raw
/// values so that a payload with an unexpected shape still deserializes and
/// can be reported precisely further down the pipeline. Every other
/// top-level key lands in `passthrough` untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawForecastPayload {
    #[serde(default)]
    pub current_units: Option<Value>,
    #[serde(default)]
    pub current: Option<Value>,
    #[serde(default)]
    pub hourly_units: Option<Value>,
    #[serde(default)]
    pub hourly: Option<Value>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl RawForecastPayload {
    /// Splits a decoded top-level JSON object into the named sections and
    /// the pass-through remainder.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        Self {
            current_units: take_non_null(&mut object, "current_units"),
            current: take_non_null(&mut object, "current"),
            hourly_units: take_non_null(&mut object, "hourly_units"),
            hourly: take_non_null(&mut object, "hourly"),
            passthrough: object,
        }
    }
}

fn take_non_null(object: &mut Map<String, Value>, key: &str) -> Option<Value> {
    match object.remove(key) {
        Some(Value::Null) | None => None,
        Some(v) => Some(v),
    }
}
