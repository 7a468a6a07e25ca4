use crate::error::AnalyticsError;
use crate::range::normalized_range_of;
use crate::report::RankedSymbol;
use chrono::NaiveDate;
use core_types::{Statistics, SymbolUniverse};
use database::ObservationStore;
use futures::future::try_join_all;
use rust_decimal::Decimal;

/// A stateless calculator composing observation-store lookups into the public
/// statistics queries.
///
/// Each call re-reads the underlying data. Symbols are assumed to have been
/// validated against the universe by the caller.
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    store: ObservationStore,
    symbols: SymbolUniverse,
}

impl StatisticsEngine {
    pub fn new(store: ObservationStore, symbols: SymbolUniverse) -> Self {
        Self { store, symbols }
    }

    pub fn symbols(&self) -> &SymbolUniverse {
        &self.symbols
    }

    /// Minimum, maximum, oldest and newest observation of `symbol` over all time.
    pub async fn statistics(&self, symbol: &str) -> Result<Statistics, AnalyticsError> {
        self.statistics_in(symbol, None).await
    }

    /// The same four observations, restricted to one UTC calendar day.
    pub async fn statistics_for_day(&self, symbol: &str, day: NaiveDate) -> Result<Statistics, AnalyticsError> {
        self.statistics_in(symbol, Some(day)).await
    }

    async fn statistics_in(&self, symbol: &str, day: Option<NaiveDate>) -> Result<Statistics, AnalyticsError> {
        tracing::debug!(symbol, ?day, "Computing statistics.");

        // Each field is looked up on its own; an empty one never hides the others.
        let (minimum, maximum, oldest, newest) = tokio::try_join!(
            self.store.minimum(symbol, day),
            self.store.maximum(symbol, day),
            self.store.oldest(symbol, day),
            self.store.newest(symbol, day),
        )?;

        Ok(Statistics {
            minimum,
            maximum,
            oldest,
            newest,
        })
    }

    /// Normalized range of `symbol` over all time, `None` when undefined.
    pub async fn normalized_range(&self, symbol: &str) -> Result<Option<Decimal>, AnalyticsError> {
        self.normalized_range_in(symbol, None).await
    }

    /// Normalized range of `symbol` on one UTC day, `None` when undefined.
    pub async fn normalized_range_for_day(
        &self,
        symbol: &str,
        day: NaiveDate,
    ) -> Result<Option<Decimal>, AnalyticsError> {
        self.normalized_range_in(symbol, Some(day)).await
    }

    async fn normalized_range_in(
        &self,
        symbol: &str,
        day: Option<NaiveDate>,
    ) -> Result<Option<Decimal>, AnalyticsError> {
        let (minimum, maximum) = tokio::try_join!(
            self.store.minimum(symbol, day),
            self.store.maximum(symbol, day),
        )?;

        let range = normalized_range_of(minimum.as_ref(), maximum.as_ref());
        if range.is_none() {
            tracing::debug!(symbol, ?day, "No normalized range: missing data or zero minimum.");
        }
        Ok(range)
    }

    /// Every symbol with a defined normalized range, most volatile first.
    ///
    /// Exact ties keep universe order (the sort is stable).
    pub async fn ranked_normalized_ranges(&self) -> Result<Vec<RankedSymbol>, AnalyticsError> {
        let mut ranked: Vec<RankedSymbol> = self
            .ranges_in(None)
            .await?
            .into_iter()
            .filter_map(|(symbol, range)| {
                range.map(|normalized_range| RankedSymbol {
                    symbol: symbol.to_string(),
                    normalized_range,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.normalized_range.cmp(&a.normalized_range));

        tracing::debug!(ranked = ranked.len(), universe = self.symbols.len(), "Ranked symbols.");
        Ok(ranked)
    }

    /// Symbols ordered by normalized range, descending.
    pub async fn rank_symbols_by_normalized_range(&self) -> Result<Vec<String>, AnalyticsError> {
        Ok(self
            .ranked_normalized_ranges()
            .await?
            .into_iter()
            .map(|entry| entry.symbol)
            .collect())
    }

    /// The symbol with the greatest normalized range on `day`.
    ///
    /// Ties go to the symbol listed first in the universe. `None` when no symbol
    /// has a defined range that day.
    pub async fn top_symbol_for_day(&self, day: NaiveDate) -> Result<Option<String>, AnalyticsError> {
        let top = self
            .ranges_in(Some(day))
            .await?
            .into_iter()
            .filter_map(|(symbol, range)| range.map(|range| (symbol, range)))
            .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
            .map(|(symbol, _)| symbol.to_string());

        tracing::debug!(%day, top = ?top, "Selected top symbol for day.");
        Ok(top)
    }

    /// `(symbol, range)` for the whole universe, in universe order.
    async fn ranges_in(&self, day: Option<NaiveDate>) -> Result<Vec<(&str, Option<Decimal>)>, AnalyticsError> {
        // `try_join_all` yields results in input order, so concurrency does not
        // change tie-breaking.
        try_join_all(self.symbols.iter().map(|symbol| async move {
            let range = self.normalized_range_in(symbol, day).await?;
            Ok::<_, AnalyticsError>((symbol, range))
        }))
        .await
    }
}
