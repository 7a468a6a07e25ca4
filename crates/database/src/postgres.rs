use crate::error::DbError;
use crate::source::ObservationSource;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::Observation;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

/// Reads observations from the `price_observations` table.
///
/// Rows come back in insertion order (`ORDER BY id`), which plays the role of
/// file order for tie-breaking.
#[derive(Debug, Clone)]
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    /// Creates a new `PgSource` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationSource for PgSource {
    async fn load(&self, symbol: &str) -> Result<Vec<Observation>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT observed_at, symbol, price
            FROM price_observations
            WHERE symbol = $1
            ORDER BY id ASC
            "#,
        )
        .bind(symbol)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DbError::source_unavailable(symbol, e))?;

        rows.iter().map(|row| map_row(symbol, row)).collect()
    }

    /// Pushes the UTC-day filter into SQL as the half-open range `[day, day + 1)`.
    async fn load_for_day(&self, symbol: &str, day: NaiveDate) -> Result<Vec<Observation>, DbError> {
        let (start, end) = day_bounds(day)
            .ok_or_else(|| DbError::source_unavailable(symbol, format!("day {} is out of range", day)))?;

        let rows = sqlx::query(
            r#"
            SELECT observed_at, symbol, price
            FROM price_observations
            WHERE symbol = $1 AND observed_at >= $2 AND observed_at < $3
            ORDER BY id ASC
            "#,
        )
        .bind(symbol)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DbError::source_unavailable(symbol, e))?;

        rows.iter().map(|row| map_row(symbol, row)).collect()
    }
}

fn map_row(symbol: &str, row: &PgRow) -> Result<Observation, DbError> {
    let timestamp: DateTime<Utc> = row
        .try_get("observed_at")
        .map_err(|e| DbError::source_unavailable(symbol, e))?;
    let row_symbol: String = row
        .try_get("symbol")
        .map_err(|e| DbError::source_unavailable(symbol, e))?;
    let price: Decimal = row
        .try_get("price")
        .map_err(|e| DbError::source_unavailable(symbol, e))?;

    Ok(Observation::new(timestamp, row_symbol, price))
}

/// Start (inclusive) and end (exclusive) of a UTC calendar day.
fn day_bounds(day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = day.and_hms_opt(0, 0, 0)?.and_utc();
    let end = day.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc();
    Some((start, end))
}
