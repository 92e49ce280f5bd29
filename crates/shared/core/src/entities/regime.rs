use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classified market state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketRegime {
    TrendingUp,
    TrendingDown,
    Ranging,
    Volatile,
}

/// Detector output: the regime and how confident the detector is in it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeAssessment {
    pub regime: MarketRegime,

    /// Detector confidence (0-1)
    pub confidence: Decimal,
}

/// Strategy-side regime detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeDetectionConfig {
    /// Chart timeframe the detector should classify, e.g. "H1"
    pub timeframe: String,

    /// Below this confidence the trade is not taken (0-1)
    pub min_confidence: Decimal,
}
