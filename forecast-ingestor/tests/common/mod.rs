#![allow(dead_code)]

use std::time::Duration;

use forecast_client::db::TableName;
use forecast_client::domain::ForecastRecord;
use forecast_ingestor::pipeline::{Envelope, IngestError, Sink};
use forecast_ingestor::sinks::MemoryTableSink;
use forecast_ingestor::sources::OpenMeteoSource;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TABLE: &str = "Weather";
pub const FORECAST_PATH: &str = "/v1/forecast";

/// Forecast response in the shape Open-Meteo returns for the fixed query.
pub fn forecast_body() -> Value {
    json!({
        "latitude": 52.52,
        "current_units": {"temperature_2m": "°C", "wind_speed_10m": "km/h"},
        "current": {"temperature_2m": 3.2, "wind_speed_10m": 11.0},
        "hourly_units": {"temperature_2m": "°C", "relative_humidity_2m": "%", "wind_speed_10m": "km/h"},
        "hourly": {"temperature_2m": [1, 2], "relative_humidity_2m": [50, 60], "wind_speed_10m": [5, 6]}
    })
}

/// What `forecast_body` looks like once stored.
pub fn pruned_body() -> Value {
    json!({
        "latitude": 52.52,
        "hourly_units": {"temperature_2m": "°C"},
        "hourly": {"temperature_2m": [1, 2]}
    })
}

/// Start a stub forecast API that answers the fixed query with `response`,
/// expecting exactly `calls` requests.
pub async fn forecast_api(response: ResponseTemplate, calls: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "52.52"))
        .and(query_param("longitude", "13.41"))
        .and(query_param("current", "temperature_2m,wind_speed_10m"))
        .and(query_param(
            "hourly",
            "temperature_2m,relative_humidity_2m,wind_speed_10m",
        ))
        .respond_with(response)
        .expect(calls)
        .mount(&server)
        .await;

    server
}

pub fn source_for(server: &MockServer) -> OpenMeteoSource {
    OpenMeteoSource::new(
        format!("{}{}", server.uri(), FORECAST_PATH),
        Duration::from_secs(10),
    )
    .unwrap()
}

/// A source pointed at a local port nobody listens on.
pub fn unreachable_source() -> OpenMeteoSource {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    OpenMeteoSource::new(
        format!("http://127.0.0.1:{port}{FORECAST_PATH}"),
        Duration::from_secs(10),
    )
    .unwrap()
}

pub fn memory_table() -> MemoryTableSink {
    MemoryTableSink::new(TableName::parse(TABLE).unwrap())
}

/// Table that refuses every write, as a table without write permission would.
pub struct RejectingSink;

#[async_trait::async_trait]
impl Sink<ForecastRecord> for RejectingSink {
    async fn put(&self, _input: &Envelope<ForecastRecord>) -> Result<(), IngestError> {
        Err(IngestError::Persistence(
            "AccessDenied: not authorized to write".to_string(),
        ))
    }
}
