use anyhow::Result;
use forecast_ingestor::{config::AppConfig, observability, ForecastIngestor};

/// Run a single invocation and exit. With `failure_policy = "strict"` a
/// failed invocation gives a non-zero exit status.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;
    let ingestor = ForecastIngestor::from_config(&cfg)?;

    ingestor.handle().await?;

    Ok(())
}
