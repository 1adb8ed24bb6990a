use std::time::{Duration, SystemTime};

use forecast_client::db::{forecast_records, TableName};
use forecast_client::domain::ForecastRecord;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::{ConfigError, TableConfig};
use crate::pipeline::{Envelope, IngestError, Sink};

/// Writes forecast records into a Postgres-wire document table.
#[derive(Clone)]
pub struct PgTableSink {
    pool: PgPool,
    table: TableName,
}

impl PgTableSink {
    pub fn new(pool: PgPool, table: TableName) -> Self {
        Self { pool, table }
    }

    /// Build the pool without connecting; the first write opens the
    /// connection and later invocations reuse it.
    pub fn connect_lazy(cfg: &TableConfig, table: TableName) -> Result<Self, ConfigError> {
        let uri = cfg.uri.as_deref().ok_or(ConfigError::MissingDatabaseUri)?;

        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
            .connect_lazy(uri)
            .map_err(|e| ConfigError::TableClient(e.to_string()))?;

        Ok(Self::new(pool, table))
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }
}

#[async_trait::async_trait]
impl Sink<ForecastRecord> for PgTableSink {
    async fn put(&self, input: &Envelope<ForecastRecord>) -> Result<(), IngestError> {
        match forecast_records::put_record(&self.pool, &self.table, &input.payload).await {
            Ok(()) => {
                metrics::counter!("forecast_records_written_total").increment(1);
                if let Ok(dur) = SystemTime::now().duration_since(input.received_at) {
                    metrics::histogram!("forecast_end_to_end_latency_seconds")
                        .record(dur.as_secs_f64());
                }
                Ok(())
            }
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    table = %self.table,
                    id = %input.payload.id,
                    "forecast table write failed"
                );
                metrics::counter!("forecast_table_errors_total").increment(1);
                Err(IngestError::Persistence(format!(
                    "write to table {} failed: {e}",
                    self.table
                )))
            }
        }
    }

    fn target(&self) -> String {
        self.table.to_string()
    }
}
