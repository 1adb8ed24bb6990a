mod identity;
mod prune;

pub use identity::new_record_id;
pub use prune::{prune_forecast, PRUNED_HOURLY_KEYS};

use forecast_client::domain::{ForecastRecord, RawForecastPayload};

use crate::pipeline::{Envelope, IngestError, Transform};

/// Prune a raw forecast and stamp it with a new record id.
pub fn to_forecast_record(
    env: Envelope<RawForecastPayload>,
) -> Result<Envelope<ForecastRecord>, IngestError> {
    let Envelope {
        payload,
        received_at,
    } = env;
    let forecast = prune_forecast(payload)?;

    Ok(Envelope {
        payload: ForecastRecord::new(new_record_id(), forecast),
        received_at,
    })
}

#[derive(Clone, Default)]
pub struct ForecastRecordTransform;

#[async_trait::async_trait]
impl Transform<RawForecastPayload, ForecastRecord> for ForecastRecordTransform {
    async fn apply(
        &self,
        input: Envelope<RawForecastPayload>,
    ) -> Result<Envelope<ForecastRecord>, IngestError> {
        match to_forecast_record(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("forecast_payload_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_carries_pruned_forecast_and_receive_time() {
        let env = Envelope::new(
            serde_json::from_value::<RawForecastPayload>(json!({
                "timezone": "GMT",
                "current": {"temperature_2m": 1.0},
                "hourly_units": {"wind_speed_10m": "km/h"},
                "hourly": {"wind_speed_10m": [1.0]}
            }))
            .unwrap(),
        );
        let received_at = env.received_at;

        let out = to_forecast_record(env).unwrap();

        assert_eq!(out.received_at, received_at);
        assert_eq!(out.payload.id.len(), 36);
        assert_eq!(
            serde_json::Value::Object(out.payload.forecast),
            json!({"timezone": "GMT", "hourly_units": {}, "hourly": {}})
        );
    }

    #[test]
    fn each_record_gets_its_own_id() {
        let payload: RawForecastPayload =
            serde_json::from_value(json!({"hourly_units": {}, "hourly": {}})).unwrap();

        let a = to_forecast_record(Envelope::new(payload.clone())).unwrap();
        let b = to_forecast_record(Envelope::new(payload)).unwrap();

        assert_ne!(a.payload.id, b.payload.id);
    }
}
