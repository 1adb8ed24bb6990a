pub mod forecast_records;
mod table_name;

pub use table_name::{TableName, TableNameError};
