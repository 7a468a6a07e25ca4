use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of the volatility ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSymbol {
    pub symbol: String,
    pub normalized_range: Decimal,
}
