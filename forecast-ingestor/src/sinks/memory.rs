use std::{collections::HashMap, sync::Arc};

use forecast_client::db::TableName;
use forecast_client::domain::ForecastRecord;
use tokio::sync::Mutex;

use crate::pipeline::{Envelope, IngestError, Sink};

/// Process-local table keyed by record id.
///
/// Clones share the same rows, so a handle kept by the caller sees every
/// write made through the sink.
#[derive(Clone)]
pub struct MemoryTableSink {
    table: TableName,
    rows: Arc<Mutex<HashMap<String, ForecastRecord>>>,
}

impl MemoryTableSink {
    pub fn new(table: TableName) -> Self {
        Self {
            table,
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub async fn get(&self, id: &str) -> Option<ForecastRecord> {
        self.rows.lock().await.get(id).cloned()
    }

    pub async fn records(&self) -> Vec<ForecastRecord> {
        self.rows.lock().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl Sink<ForecastRecord> for MemoryTableSink {
    async fn put(&self, input: &Envelope<ForecastRecord>) -> Result<(), IngestError> {
        let record = input.payload.clone();
        self.rows.lock().await.insert(record.id.clone(), record);
        metrics::counter!("forecast_records_written_total").increment(1);
        Ok(())
    }

    fn target(&self) -> String {
        self.table.to_string()
    }
}
