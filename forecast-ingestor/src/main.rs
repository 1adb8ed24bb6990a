use std::sync::Arc;

use anyhow::Result;
use forecast_ingestor::{
    config::AppConfig, metrics_server, observability, trigger, ForecastIngestor,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // HTTP client and table pool live for the whole process; a missing
    // `target_table` stops us here.
    let ingestor = Arc::new(ForecastIngestor::from_config(&cfg)?);

    trigger::serve(&cfg.trigger.http_bind_addr, ingestor).await
}
