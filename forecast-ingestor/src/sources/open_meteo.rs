use std::time::{Duration, Instant, SystemTime};

use forecast_client::domain::RawForecastPayload;
use reqwest::Client;
use serde_json::Value;

use crate::config::{ConfigError, ForecastConfig};
use crate::pipeline::{Envelope, IngestError, Source};

pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

// Berlin, as hard-wired into the deployed function.
const LATITUDE: &str = "52.52";
const LONGITUDE: &str = "13.41";
const CURRENT_VARIABLES: &str = "temperature_2m,wind_speed_10m";
const HOURLY_VARIABLES: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";

/// Longest slice of an error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Fetches the fixed Berlin forecast from Open-Meteo.
#[derive(Clone)]
pub struct OpenMeteoSource {
    client: Client,
    url: String,
    timeout: Duration,
}

impl OpenMeteoSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn from_config(cfg: &ForecastConfig) -> Result<Self, ConfigError> {
        Self::new(cfg.url.clone(), Duration::from_secs(cfg.timeout_secs))
    }

    async fn get_body(&self) -> Result<String, IngestError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("latitude", LATITUDE),
                ("longitude", LONGITUDE),
                ("current", CURRENT_VARIABLES),
                ("hourly", HOURLY_VARIABLES),
            ])
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.network_error(e))?;

        if !status.is_success() {
            return Err(IngestError::Network(format!(
                "forecast API responded with {status}: {}",
                truncate(&body, MAX_ERROR_BODY_CHARS)
            )));
        }

        Ok(body)
    }

    fn network_error(&self, e: reqwest::Error) -> IngestError {
        if e.is_timeout() {
            IngestError::Network(format!(
                "forecast request timed out after {:?}: {e}",
                self.timeout
            ))
        } else {
            IngestError::Network(format!("forecast request failed: {e}"))
        }
    }
}

#[async_trait::async_trait]
impl Source<RawForecastPayload> for OpenMeteoSource {
    async fn fetch(&self) -> Result<Envelope<RawForecastPayload>, IngestError> {
        let received_at = SystemTime::now();
        let started = Instant::now();

        let body = self.get_body().await;
        metrics::histogram!("forecast_fetch_duration_seconds").record(started.elapsed().as_secs_f64());

        let payload = parse_forecast_body(&body?)?;
        Ok(Envelope {
            payload,
            received_at,
        })
    }
}

/// Decode a forecast response body. Anything but a top-level JSON object is
/// a parse error.
pub fn parse_forecast_body(body: &str) -> Result<RawForecastPayload, IngestError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| IngestError::Parse(format!("forecast body is not valid JSON: {e}")))?;

    match value {
        Value::Object(object) => Ok(RawForecastPayload::from_object(object)),
        other => Err(IngestError::Parse(format!(
            "forecast body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
