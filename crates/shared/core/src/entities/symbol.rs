use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Instrument contract specification.
///
/// Everything position sizing needs to convert between account-currency
/// risk and tradable lots: pip size, contract size and the broker's
/// lot constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Instrument symbol, e.g. "EURUSD"
    pub symbol: String,

    /// Smallest standard price increment (pip size), e.g. 0.0001
    pub point: Decimal,

    /// Units of the base instrument per 1.0 lot, e.g. 100_000
    pub contract_size: Decimal,

    /// Minimum tradable lot size
    pub min_lot: Decimal,

    /// Maximum tradable lot size
    pub max_lot: Decimal,

    /// Lot granularity - sizes must be a multiple of this
    pub lot_step: Decimal,

    /// Price display digits
    pub digits: u32,
}

impl SymbolInfo {
    /// Account-currency value of one pip for 1.0 lot
    pub fn pip_value(&self) -> Decimal {
        self.contract_size * self.point
    }

    /// Convert an absolute price distance into pips
    pub fn price_to_pips(&self, distance: Decimal) -> Decimal {
        if self.point.is_zero() {
            return Decimal::ZERO;
        }
        distance.abs() / self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eurusd() -> SymbolInfo {
        SymbolInfo {
            symbol: "EURUSD".to_string(),
            point: dec!(0.0001),
            contract_size: dec!(100000),
            min_lot: dec!(0.01),
            max_lot: dec!(100),
            lot_step: dec!(0.01),
            digits: 5,
        }
    }

    #[test]
    fn test_pip_value() {
        // 100_000 * 0.0001 = 10 per pip per lot
        assert_eq!(eurusd().pip_value(), dec!(10.0000));
    }

    #[test]
    fn test_price_to_pips() {
        let info = eurusd();
        assert_eq!(info.price_to_pips(dec!(0.0100)), dec!(100));
        assert_eq!(info.price_to_pips(dec!(-0.0020)), dec!(20));
    }
}
