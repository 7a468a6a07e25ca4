use crate::DbError;
use crate::source::ObservationSource;
use chrono::NaiveDate;
use core_types::Observation;
use std::fmt;
use std::sync::Arc;

/// The `ObservationStore` answers extremal questions about one symbol's
/// observation table.
///
/// Every operation re-reads the table from its source and scans it once; there
/// is no caching between calls. When `day` is given, only observations whose UTC
/// date equals it are considered.
///
/// Ties (equal prices, equal timestamps) resolve to the observation the source
/// returned first.
#[derive(Clone)]
pub struct ObservationStore {
    source: Arc<dyn ObservationSource>,
}

impl fmt::Debug for ObservationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationStore").finish_non_exhaustive()
    }
}

impl ObservationStore {
    pub fn new(source: Arc<dyn ObservationSource>) -> Self {
        Self { source }
    }

    /// The observation with the lowest price.
    pub async fn minimum(&self, symbol: &str, day: Option<NaiveDate>) -> Result<Option<Observation>, DbError> {
        let observations = self.observations(symbol, day).await?;
        Ok(first_preferred(observations, |candidate, best| candidate.price < best.price))
    }

    /// The observation with the highest price.
    pub async fn maximum(&self, symbol: &str, day: Option<NaiveDate>) -> Result<Option<Observation>, DbError> {
        let observations = self.observations(symbol, day).await?;
        Ok(first_preferred(observations, |candidate, best| candidate.price > best.price))
    }

    /// The observation with the earliest timestamp.
    pub async fn oldest(&self, symbol: &str, day: Option<NaiveDate>) -> Result<Option<Observation>, DbError> {
        let observations = self.observations(symbol, day).await?;
        Ok(first_preferred(observations, |candidate, best| candidate.timestamp < best.timestamp))
    }

    /// The observation with the latest timestamp.
    pub async fn newest(&self, symbol: &str, day: Option<NaiveDate>) -> Result<Option<Observation>, DbError> {
        let observations = self.observations(symbol, day).await?;
        Ok(first_preferred(observations, |candidate, best| candidate.timestamp > best.timestamp))
    }

    async fn observations(&self, symbol: &str, day: Option<NaiveDate>) -> Result<Vec<Observation>, DbError> {
        match day {
            Some(day) => self.source.load_for_day(symbol, day).await,
            None => self.source.load(symbol).await,
        }
    }
}

/// Folds the sequence down to one element. A later element only replaces the
/// current pick when `prefer(candidate, best)` is strictly true, so the first of
/// several equal elements wins.
fn first_preferred<F>(observations: Vec<Observation>, prefer: F) -> Option<Observation>
where
    F: Fn(&Observation, &Observation) -> bool,
{
    observations
        .into_iter()
        .reduce(|best, candidate| if prefer(&candidate, &best) { candidate } else { best })
}
