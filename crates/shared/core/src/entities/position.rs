use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction - buy (long) or sell (short)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    /// Buy - profit when price rises
    Buy,
    /// Sell - profit when price falls
    Sell,
}

impl TradeDirection {
    /// Returns the opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            TradeDirection::Buy => TradeDirection::Sell,
            TradeDirection::Sell => TradeDirection::Buy,
        }
    }
}

/// An open position as reported by the broker.
///
/// The engine treats positions as read-only facts: they are created and
/// mutated broker-side and only ever closed through the execution port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Broker ticket number (unique per position)
    pub ticket: u64,

    /// Instrument symbol, e.g. "EURUSD"
    pub symbol: String,

    /// Position direction
    pub direction: TradeDirection,

    /// Position size in lots (always positive)
    pub lot_size: Decimal,

    /// Price at which the position was opened
    pub open_price: Decimal,

    /// Current market price
    pub current_price: Decimal,

    /// Floating profit/loss in account currency
    pub profit: Decimal,

    /// Accumulated swap charges
    pub swap: Decimal,

    /// When the position was opened
    pub open_time: DateTime<Utc>,
}

impl Position {
    /// Floating loss of this position (zero when in profit)
    pub fn loss(&self) -> Decimal {
        (-self.profit).max(Decimal::ZERO)
    }

    /// Was this position opened on the given calendar date (UTC)?
    pub fn opened_on(&self, date: NaiveDate) -> bool {
        self.open_time.date_naive() == date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(profit: Decimal) -> Position {
        Position {
            ticket: 1001,
            symbol: "EURUSD".to_string(),
            direction: TradeDirection::Buy,
            lot_size: dec!(0.10),
            open_price: dec!(1.1000),
            current_price: dec!(1.1010),
            profit,
            swap: Decimal::ZERO,
            open_time: Utc::now(),
        }
    }

    #[test]
    fn test_opposite_direction() {
        assert_eq!(TradeDirection::Buy.opposite(), TradeDirection::Sell);
        assert_eq!(TradeDirection::Sell.opposite(), TradeDirection::Buy);
    }

    #[test]
    fn test_loss_only_counts_negative_profit() {
        assert_eq!(position(dec!(25)).loss(), Decimal::ZERO);
        assert_eq!(position(dec!(-40)).loss(), dec!(40));
    }

    #[test]
    fn test_opened_on_today() {
        let p = position(Decimal::ZERO);
        assert!(p.opened_on(Utc::now().date_naive()));
    }
}
