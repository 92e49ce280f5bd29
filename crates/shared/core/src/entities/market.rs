use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Major forex trading sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingSession {
    Sydney,
    Tokyo,
    London,
    NewYork,
}

/// Market snapshot used by validation and sizing.
///
/// Every field is optional: providers report what they have and each
/// consumer decides whether a missing field is an error or a skipped check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    /// Average True Range in price units
    pub atr: Option<Decimal>,

    /// Recent price volatility in price units (e.g. stddev of returns)
    pub volatility: Option<Decimal>,

    /// Current bid-ask spread in pips
    pub spread_pips: Option<Decimal>,

    /// Currently active trading session
    pub session: Option<TradingSession>,

    /// Most recent swing high
    pub swing_high: Option<Decimal>,

    /// Most recent swing low
    pub swing_low: Option<Decimal>,

    /// When this snapshot was taken
    pub timestamp: Option<DateTime<Utc>>,
}

/// Session filter: which sessions a strategy may trade and how
/// aggressively it sizes in each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sessions the strategy is allowed to trade in
    pub allowed_sessions: Vec<TradingSession>,

    /// Per-session position size multiplier (missing = 1.0)
    pub aggressiveness: HashMap<TradingSession, Decimal>,
}

impl SessionConfig {
    /// Is trading allowed in the given session?
    pub fn allows(&self, session: TradingSession) -> bool {
        self.allowed_sessions.contains(&session)
    }

    /// Size multiplier for the given session
    pub fn multiplier(&self, session: TradingSession) -> Decimal {
        self.aggressiveness
            .get(&session)
            .copied()
            .unwrap_or(Decimal::ONE)
    }
}

/// Dynamic risk adjustments driven by current volatility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicRiskConfig {
    /// Cut position size when ATR exceeds the threshold
    pub reduce_in_high_volatility: bool,

    /// ATR level (price units) above which the market counts as
    /// high-volatility
    pub high_volatility_threshold: Decimal,

    /// ATR multiplier used for stop placement when sizing dynamically
    pub atr_multiplier: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_session_config_allows_and_multiplier() {
        let mut aggressiveness = HashMap::new();
        aggressiveness.insert(TradingSession::London, dec!(1.2));

        let config = SessionConfig {
            allowed_sessions: vec![TradingSession::London, TradingSession::NewYork],
            aggressiveness,
        };

        assert!(config.allows(TradingSession::London));
        assert!(!config.allows(TradingSession::Tokyo));
        assert_eq!(config.multiplier(TradingSession::London), dec!(1.2));
        assert_eq!(config.multiplier(TradingSession::NewYork), Decimal::ONE);
    }
}
