use anyhow::Result;
use sqlx::{types::Json, PgPool};

use super::TableName;
use crate::domain::ForecastRecord;

/// Put a forecast record, overwriting any existing row with the same id.
///
/// The table is provisioned out-of-band; see
/// `sql/schema/01_forecast_records.sql` for the expected layout.
pub async fn put_record(pool: &PgPool, table: &TableName, record: &ForecastRecord) -> Result<()> {
    let sql = upsert_statement(table);

    sqlx::query(&sql)
        .bind(&record.id)
        .bind(Json(&record.forecast))
        .execute(pool)
        .await?;

    Ok(())
}

fn upsert_statement(table: &TableName) -> String {
    format!(
        r#"
        INSERT INTO {} (id, forecast)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE
        SET forecast = EXCLUDED.forecast
        "#,
        table.quoted()
    )
}
