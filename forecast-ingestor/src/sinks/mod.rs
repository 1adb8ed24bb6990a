pub mod memory;
pub mod pgwire;

pub use memory::MemoryTableSink;
pub use pgwire::PgTableSink;

use forecast_client::db::TableName;
use forecast_client::domain::ForecastRecord;

use crate::config::{ConfigError, TableConfig, TableKind};
use crate::pipeline::{Envelope, IngestError, Sink};

/// The table backend chosen by `table.kind`.
pub enum TableSink {
    Pgwire(PgTableSink),
    Memory(MemoryTableSink),
}

impl TableSink {
    pub fn from_config(cfg: &TableConfig, table: TableName) -> Result<Self, ConfigError> {
        match cfg.kind {
            TableKind::Pgwire => Ok(Self::Pgwire(PgTableSink::connect_lazy(cfg, table)?)),
            TableKind::Memory => Ok(Self::Memory(MemoryTableSink::new(table))),
        }
    }

    pub fn table(&self) -> &TableName {
        match self {
            Self::Pgwire(s) => s.table(),
            Self::Memory(s) => s.table(),
        }
    }
}

#[async_trait::async_trait]
impl Sink<ForecastRecord> for TableSink {
    async fn put(&self, input: &Envelope<ForecastRecord>) -> Result<(), IngestError> {
        match self {
            Self::Pgwire(s) => s.put(input).await,
            Self::Memory(s) => s.put(input).await,
        }
    }

    fn target(&self) -> String {
        self.table().to_string()
    }
}
