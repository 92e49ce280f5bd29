use crate::entities::correlation::CorrelationFilter;
use crate::entities::exit::EnhancedPartialExitConfig;
use crate::entities::market::{DynamicRiskConfig, SessionConfig};
use crate::entities::position::TradeDirection;
use crate::entities::regime::RegimeDetectionConfig;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A proposed trade submitted for validation.
///
/// Immutable input: the validator never mutates it in place. When a limit
/// forces a size change, the suggestion comes back as a separate
/// `TradeAdjustment` on the validation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeParams {
    /// Instrument symbol
    pub symbol: String,

    /// Trade direction
    pub direction: TradeDirection,

    /// Requested size in lots
    pub lot_size: Decimal,

    /// Intended entry price
    pub entry_price: Decimal,

    /// Stop-loss price
    pub stop_loss: Decimal,

    /// Optional take-profit price
    pub take_profit: Option<Decimal>,

    /// Owner of the trade
    pub user_id: String,

    /// Volatility-driven risk adjustments, if the strategy uses them
    pub dynamic_risk: Option<DynamicRiskConfig>,

    /// Session filter, if the strategy restricts trading hours
    pub session: Option<SessionConfig>,

    /// Correlation filter, if the strategy limits correlated exposure
    pub correlation: Option<CorrelationFilter>,

    /// Regime detection settings, if the strategy adapts to market regime
    pub regime: Option<RegimeDetectionConfig>,

    /// Staged partial-exit plan, if configured
    pub partial_exit: Option<EnhancedPartialExitConfig>,

    /// Current ATR in price units, when the caller has it
    pub current_atr: Option<Decimal>,
}

impl TradeParams {
    /// Absolute distance between entry and stop in price units
    pub fn stop_distance(&self) -> Decimal {
        (self.entry_price - self.stop_loss).abs()
    }

    /// Is the stop on the protective side of the entry?
    ///
    /// Buy stops must sit below the entry, sell stops above it.
    pub fn stop_is_protective(&self) -> bool {
        match self.direction {
            TradeDirection::Buy => self.stop_loss < self.entry_price,
            TradeDirection::Sell => self.stop_loss > self.entry_price,
        }
    }
}

/// Outcome of a single broker close call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResult {
    /// Ticket of the closed position
    pub ticket: u64,

    /// Price the position was closed at
    pub close_price: Decimal,

    /// Realized profit/loss of the close
    pub profit: Decimal,

    /// When the broker confirmed the close
    pub closed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(direction: TradeDirection, entry: Decimal, stop: Decimal) -> TradeParams {
        TradeParams {
            symbol: "EURUSD".to_string(),
            direction,
            lot_size: dec!(0.10),
            entry_price: entry,
            stop_loss: stop,
            take_profit: None,
            user_id: "user-1".to_string(),
            dynamic_risk: None,
            session: None,
            correlation: None,
            regime: None,
            partial_exit: None,
            current_atr: None,
        }
    }

    #[test]
    fn test_stop_distance() {
        let t = trade(TradeDirection::Buy, dec!(1.1000), dec!(1.0900));
        assert_eq!(t.stop_distance(), dec!(0.0100));
    }

    #[test]
    fn test_buy_stop_must_be_below_entry() {
        assert!(trade(TradeDirection::Buy, dec!(1.1000), dec!(1.0900)).stop_is_protective());
        assert!(!trade(TradeDirection::Buy, dec!(1.1000), dec!(1.1100)).stop_is_protective());
    }

    #[test]
    fn test_sell_stop_must_be_above_entry() {
        assert!(trade(TradeDirection::Sell, dec!(1.1000), dec!(1.1100)).stop_is_protective());
        assert!(!trade(TradeDirection::Sell, dec!(1.1000), dec!(1.0900)).stop_is_protective());
    }
}
