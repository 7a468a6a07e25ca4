use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price reading for one symbol at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub price: Decimal,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, symbol: impl Into<String>, price: Decimal) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            price,
        }
    }

    /// The calendar day this observation falls on, evaluated in UTC.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Returns `true` when the observation was taken on `day` (UTC).
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.day() == day
    }
}

/// The extremal observations of one symbol, optionally scoped to a single day.
///
/// Every field is independent: an empty observation set leaves all four `None`,
/// and the absence of one never implies the absence of another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub minimum: Option<Observation>,
    pub maximum: Option<Observation>,
    pub oldest: Option<Observation>,
    pub newest: Option<Observation>,
}

impl Statistics {
    /// `true` when no field could be computed.
    pub fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.maximum.is_none()
            && self.oldest.is_none()
            && self.newest.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn day_is_taken_from_the_utc_date() {
        // 2022-01-01T23:30:00Z is still Jan 1st in UTC even if a local clock says otherwise.
        let ts = Utc.with_ymd_and_hms(2022, 1, 1, 23, 30, 0).unwrap();
        let obs = Observation::new(ts, "BTC", dec!(46813.21));

        assert_eq!(obs.day(), NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert!(obs.is_on(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()));
        assert!(!obs.is_on(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap()));
    }

    #[test]
    fn empty_statistics_serialize_as_nulls() {
        let stats = Statistics::default();
        assert!(stats.is_empty());

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "minimum": null, "maximum": null, "oldest": null, "newest": null })
        );
    }

    #[test]
    fn observation_serializes_price_as_exact_string() {
        let ts = Utc.with_ymd_and_hms(2022, 1, 1, 4, 0, 0).unwrap();
        let obs = Observation::new(ts, "BTC", dec!(46813.21));

        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["symbol"], "BTC");
        assert_eq!(json["price"], "46813.21");
        assert_eq!(json["timestamp"], "2022-01-01T04:00:00Z");
    }
}
