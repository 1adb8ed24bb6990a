use forecast_client::domain::RawForecastPayload;
use serde_json::{Map, Value};

use crate::pipeline::IngestError;
use crate::sources::open_meteo::json_kind;

/// Keys stripped from both `hourly_units` and `hourly`.
pub const PRUNED_HOURLY_KEYS: [&str; 2] = ["relative_humidity_2m", "wind_speed_10m"];

/// Reduce a raw forecast to what gets stored.
///
/// Rules:
/// - `current_units` and `current` are dropped whatever they contain.
/// - `hourly_units` and `hourly` must be objects; `PRUNED_HOURLY_KEYS` are
///   removed from each.
/// - every other top-level key is kept as received.
pub fn prune_forecast(raw: RawForecastPayload) -> Result<Map<String, Value>, IngestError> {
    let RawForecastPayload {
        current_units: _,
        current: _,
        hourly_units,
        hourly,
        passthrough,
    } = raw;

    let hourly_units = prune_section("hourly_units", hourly_units)?;
    let hourly = prune_section("hourly", hourly)?;

    let mut forecast = passthrough;
    forecast.insert("hourly_units".to_string(), Value::Object(hourly_units));
    forecast.insert("hourly".to_string(), Value::Object(hourly));
    Ok(forecast)
}

fn prune_section(name: &str, section: Option<Value>) -> Result<Map<String, Value>, IngestError> {
    match section {
        Some(Value::Object(mut fields)) => {
            for key in PRUNED_HOURLY_KEYS {
                fields.remove(key);
            }
            Ok(fields)
        }
        Some(other) => Err(IngestError::MalformedPayload(format!(
            "`{name}` must be an object, got {}",
            json_kind(&other)
        ))),
        None => Err(IngestError::MalformedPayload(format!(
            "`{name}` is missing from the forecast"
        ))),
    }
}
