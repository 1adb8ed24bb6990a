use std::sync::Arc;

use forecast_client::domain::{ForecastRecord, RawForecastPayload};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::pipeline::{IngestError, Pipeline, Sink, Source};
use crate::sinks::TableSink;
use crate::sources::OpenMeteoSource;
use crate::transform::ForecastRecordTransform;

/// What `handle` does with a failed invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and report success to the caller.
    #[default]
    Swallow,
    /// Log the failure and return it.
    Strict,
}

pub type ForecastPipeline<S, K> = Pipeline<S, RawForecastPayload, ForecastRecord, K>;

/// Fetches, prunes and stores one forecast per invocation.
pub struct ForecastIngestor<S, K> {
    pipeline: ForecastPipeline<S, K>,
    policy: FailurePolicy,
}

impl<S, K> ForecastIngestor<S, K>
where
    S: Source<RawForecastPayload> + Send + Sync + 'static,
    K: Sink<ForecastRecord> + Send + Sync + 'static,
{
    pub fn new(source: S, sink: K, policy: FailurePolicy) -> Self {
        Self {
            pipeline: Pipeline {
                source,
                transform: Arc::new(ForecastRecordTransform),
                sink,
            },
            policy,
        }
    }

    /// Run one invocation and return the stored record, whatever the policy.
    pub async fn ingest(&self) -> Result<ForecastRecord, IngestError> {
        self.pipeline.run_once().await.map(|env| env.payload)
    }

    /// Invocation entry point. The trigger's payload carries nothing, so
    /// there is no input. Under `FailurePolicy::Swallow` this never fails.
    pub async fn handle(&self) -> Result<(), IngestError> {
        tracing::info!("incoming forecast invocation");
        metrics::counter!("forecast_invocations_total").increment(1);

        match self.ingest().await {
            Ok(record) => {
                tracing::info!(
                    id = %record.id,
                    table = %self.pipeline.sink.target(),
                    "forecast record saved"
                );
                Ok(())
            }
            Err(e) => {
                metrics::counter!("forecast_invocation_failures_total", "kind" => e.kind())
                    .increment(1);
                match self.policy {
                    FailurePolicy::Swallow => {
                        tracing::error!(error = %e, kind = e.kind(), "forecast invocation failed, suppressed");
                        Ok(())
                    }
                    FailurePolicy::Strict => {
                        tracing::error!(error = %e, kind = e.kind(), "forecast invocation failed");
                        Err(e)
                    }
                }
            }
        }
    }
}

impl ForecastIngestor<OpenMeteoSource, TableSink> {
    /// Wire the production source and table from configuration. Fails if
    /// `target_table` is unset or invalid.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, IngestError> {
        let table = cfg.target_table()?;
        let source = OpenMeteoSource::from_config(&cfg.forecast)?;
        let sink = TableSink::from_config(&cfg.table, table)?;

        tracing::info!(
            table = %sink.table(),
            url = %cfg.forecast.url,
            policy = ?cfg.failure_policy,
            "forecast ingestor configured"
        );

        Ok(Self::new(source, sink, cfg.failure_policy))
    }
}
