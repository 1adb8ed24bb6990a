use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One persisted forecast: a generated primary key plus the pruned payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub id: String,
    pub forecast: Map<String, Value>,
}

impl ForecastRecord {
    pub fn new(id: impl Into<String>, forecast: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            forecast,
        }
    }
}
