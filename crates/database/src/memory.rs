use crate::error::DbError;
use crate::source::ObservationSource;
use async_trait::async_trait;
use core_types::Observation;
use std::collections::{HashMap, HashSet};

/// An in-memory observation source, mostly useful as a fixture.
///
/// A symbol without registered observations has an empty table. A symbol marked
/// with `with_unavailable` behaves like a missing or corrupt file.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, Vec<Observation>>,
    unavailable: HashSet<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `observations` to the table of `symbol`, preserving their order.
    pub fn with_observations(
        mut self,
        symbol: impl Into<String>,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Self {
        self.tables
            .entry(symbol.into())
            .or_default()
            .extend(observations);
        self
    }

    pub fn with_unavailable(mut self, symbol: impl Into<String>) -> Self {
        self.unavailable.insert(symbol.into());
        self
    }
}

#[async_trait]
impl ObservationSource for MemorySource {
    async fn load(&self, symbol: &str) -> Result<Vec<Observation>, DbError> {
        if self.unavailable.contains(symbol) {
            return Err(DbError::source_unavailable(symbol, "marked unavailable"));
        }
        Ok(self.tables.get(symbol).cloned().unwrap_or_default())
    }
}
