//! HTTP trigger standing in for the function URL.
//!
//! Every request to `/` is one invocation. The request body and query are
//! never read.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{any, get},
    Router,
};
use forecast_client::domain::{ForecastRecord, RawForecastPayload};

use crate::ingestor::ForecastIngestor;
use crate::pipeline::{Sink, Source};

pub fn router<S, K>(ingestor: Arc<ForecastIngestor<S, K>>) -> Router
where
    S: Source<RawForecastPayload> + Send + Sync + 'static,
    K: Sink<ForecastRecord> + Send + Sync + 'static,
{
    Router::new()
        .route("/", any(invoke::<S, K>))
        .route("/healthz", get(healthz))
        .with_state(ingestor)
}

pub async fn serve<S, K>(bind_addr: &str, ingestor: Arc<ForecastIngestor<S, K>>) -> anyhow::Result<()>
where
    S: Source<RawForecastPayload> + Send + Sync + 'static,
    K: Sink<ForecastRecord> + Send + Sync + 'static,
{
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid trigger.http_bind_addr {bind_addr}: {e}"))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "forecast trigger listening");

    axum::serve(listener, router(ingestor).into_make_service()).await?;
    Ok(())
}

async fn invoke<S, K>(
    State(ingestor): State<Arc<ForecastIngestor<S, K>>>,
) -> Result<StatusCode, (StatusCode, String)>
where
    S: Source<RawForecastPayload> + Send + Sync + 'static,
    K: Sink<ForecastRecord> + Send + Sync + 'static,
{
    metrics::counter!("forecast_trigger_requests_total").increment(1);

    ingestor
        .handle()
        .await
        .map(|()| StatusCode::OK)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn healthz() -> &'static str {
    "ok"
}
