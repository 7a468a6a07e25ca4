use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The fixed, ordered set of symbols the system answers queries about.
///
/// Order is the configuration order and is load-bearing: rankings break exact
/// ties by it. Construction rejects empty lists, blank entries and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolUniverse(Vec<String>);

impl SymbolUniverse {
    pub fn new<I, S>(symbols: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();

        if symbols.is_empty() {
            return Err(CoreError::InvalidInput(
                "symbols".to_string(),
                "at least one symbol must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if symbol.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "symbols".to_string(),
                    "symbol names cannot be blank".to_string(),
                ));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(CoreError::InvalidInput(
                    "symbols".to_string(),
                    format!("duplicate symbol '{}'", symbol),
                ));
            }
        }

        Ok(Self(symbols))
    }

    /// Case-sensitive membership check.
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for SymbolUniverse {
    type Error = CoreError;

    fn try_from(symbols: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(symbols)
    }
}

impl From<SymbolUniverse> for Vec<String> {
    fn from(universe: SymbolUniverse) -> Self {
        universe.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_configuration_order() {
        let universe = SymbolUniverse::new(["ETH", "BTC", "LTC"]).unwrap();
        assert_eq!(universe.iter().collect::<Vec<_>>(), vec!["ETH", "BTC", "LTC"]);
        assert_eq!(universe.len(), 3);
    }

    #[test]
    fn membership_is_case_sensitive() {
        let universe = SymbolUniverse::new(["BTC"]).unwrap();
        assert!(universe.contains("BTC"));
        assert!(!universe.contains("btc"));
        assert!(!universe.contains("ETH"));
    }

    #[test]
    fn rejects_empty_blank_and_duplicate_symbols() {
        assert!(SymbolUniverse::new(Vec::<String>::new()).is_err());
        assert!(SymbolUniverse::new(["BTC", " "]).is_err());

        let err = SymbolUniverse::new(["BTC", "ETH", "BTC"]).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput("symbols".to_string(), "duplicate symbol 'BTC'".to_string())
        );
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: SymbolUniverse = serde_json::from_str(r#"["BTC","ETH"]"#).unwrap();
        assert!(ok.contains("ETH"));

        let dup: Result<SymbolUniverse, _> = serde_json::from_str(r#"["BTC","BTC"]"#);
        assert!(dup.is_err());
    }
}
