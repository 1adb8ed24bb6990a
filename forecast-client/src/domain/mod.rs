mod forecast_payload;
mod forecast_record;

pub use forecast_payload::RawForecastPayload;
pub use forecast_record::ForecastRecord;
