use crate::error::DbError;
use crate::source::ObservationSource;
use async_trait::async_trait;
use chrono::DateTime;
use core_types::Observation;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name pattern of a symbol's table inside the storage directory.
const FILE_SUFFIX: &str = "_values.csv";

/// One raw line of a `<SYMBOL>_values.csv` file: `timestamp,symbol,price`.
#[derive(Debug, Deserialize)]
struct RawRecord {
    /// Milliseconds since the Unix epoch.
    timestamp: i64,
    symbol: String,
    price: String,
}

/// Reads each symbol's observations from `<dir>/<SYMBOL>_values.csv`.
///
/// Files are re-read on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `symbol`.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}{}", symbol, FILE_SUFFIX))
    }
}

#[async_trait]
impl ObservationSource for CsvSource {
    async fn load(&self, symbol: &str) -> Result<Vec<Observation>, DbError> {
        let path = self.path_for(symbol);
        tracing::debug!(symbol, path = %path.display(), "Reading observation file.");

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DbError::source_unavailable(symbol, format!("{}: {}", path.display(), e)))?;

        parse_observations(symbol, bytes.as_slice())
    }
}

/// Parses a headed `timestamp,symbol,price` CSV stream.
///
/// Any malformed row fails the whole table: a half-read table would silently
/// skew the extrema.
pub fn parse_observations<R: Read>(symbol: &str, reader: R) -> Result<Vec<Observation>, DbError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for record in csv_reader.deserialize::<RawRecord>() {
        let raw = record.map_err(|e| DbError::source_unavailable(symbol, e))?;
        observations.push(into_observation(symbol, raw)?);
    }
    Ok(observations)
}

fn into_observation(symbol: &str, raw: RawRecord) -> Result<Observation, DbError> {
    let timestamp = DateTime::from_timestamp_millis(raw.timestamp).ok_or_else(|| {
        DbError::source_unavailable(symbol, format!("timestamp {} is out of range", raw.timestamp))
    })?;

    let price = Decimal::from_str(&raw.price)
        .or_else(|_| Decimal::from_scientific(&raw.price))
        .map_err(|e| DbError::source_unavailable(symbol, format!("invalid price '{}': {}", raw.price, e)))?;

    Ok(Observation::new(timestamp, raw.symbol, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::tempdir;

    const BTC_CSV: &str = "timestamp,symbol,price\n\
        1641009600000,BTC,46813.21\n\
        1641020400000,BTC,46979.61\n\
        1641031200000,BTC,47143.98\n\
        1641112800000,BTC,46871.09\n";

    #[test]
    fn parses_epoch_millis_as_utc() {
        let observations = parse_observations("BTC", BTC_CSV.as_bytes()).unwrap();

        assert_eq!(observations.len(), 4);
        assert_eq!(
            observations[0].timestamp,
            Utc.with_ymd_and_hms(2022, 1, 1, 4, 0, 0).unwrap()
        );
        assert_eq!(observations[0].symbol, "BTC");
        assert_eq!(observations[0].price, dec!(46813.21));
    }

    #[test]
    fn keeps_file_order() {
        let observations = parse_observations("BTC", BTC_CSV.as_bytes()).unwrap();
        let prices: Vec<_> = observations.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![dec!(46813.21), dec!(46979.61), dec!(47143.98), dec!(46871.09)]);
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let observations = parse_observations("BTC", "timestamp,symbol,price\n".as_bytes()).unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn accepts_scientific_notation_prices() {
        let csv = "timestamp,symbol,price\n1641009600000,DOGE,1.7E-1\n";
        let observations = parse_observations("DOGE", csv.as_bytes()).unwrap();
        assert_eq!(observations[0].price, dec!(0.17));
    }

    #[test]
    fn malformed_price_is_source_unavailable() {
        let csv = "timestamp,symbol,price\n1641009600000,BTC,not-a-number\n";
        let err = parse_observations("BTC", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DbError::SourceUnavailable { ref symbol, .. } if symbol == "BTC"));
    }

    #[test]
    fn malformed_timestamp_is_source_unavailable() {
        let csv = "timestamp,symbol,price\nyesterday,BTC,1.0\n";
        let err = parse_observations("BTC", csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DbError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn loads_symbol_file_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("BTC_values.csv"), BTC_CSV).unwrap();
        let source = CsvSource::new(dir.path());

        let all = source.load("BTC").await.unwrap();
        assert_eq!(all.len(), 4);

        let day = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let first_day = source.load_for_day("BTC", day).await.unwrap();
        assert_eq!(first_day.len(), 3);
        assert!(first_day.iter().all(|o| o.is_on(day)));
    }

    #[tokio::test]
    async fn missing_file_is_source_unavailable() {
        let dir = tempdir().unwrap();
        let source = CsvSource::new(dir.path());

        let err = source.load("ETH").await.unwrap_err();
        assert!(matches!(err, DbError::SourceUnavailable { ref symbol, .. } if symbol == "ETH"));
    }
}
