use crate::error::DbError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::Observation;

/// The capability to materialize the raw observation table of one symbol.
///
/// Implementations decide where the data lives (flat files, PostgreSQL, memory).
/// Order matters: the store breaks ties in favour of the observation it sees
/// first, so a source must return rows in a stable order for unchanged data.
///
/// An empty table is a valid, non-error outcome. A table that cannot be located
/// or parsed is `DbError::SourceUnavailable`.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Returns every observation recorded for `symbol`.
    async fn load(&self, symbol: &str) -> Result<Vec<Observation>, DbError>;

    /// Returns the observations for `symbol` whose UTC date is `day`.
    ///
    /// The default implementation filters the output of `load`; sources that can
    /// push the filter down (e.g. SQL) should override it.
    async fn load_for_day(&self, symbol: &str, day: NaiveDate) -> Result<Vec<Observation>, DbError> {
        let mut observations = self.load(symbol).await?;
        observations.retain(|o| o.is_on(day));
        Ok(observations)
    }
}
