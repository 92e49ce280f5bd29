use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account snapshot as reported by the broker.
///
/// Read-only to the engine; all fields are in the account currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account balance (realized)
    pub balance: Decimal,

    /// Account equity (balance + floating P&L)
    pub equity: Decimal,

    /// Margin currently in use
    pub margin: Decimal,

    /// Margin still available for new positions
    pub free_margin: Decimal,

    /// Broker-configured account leverage (e.g. 100 = 1:100)
    pub leverage: u32,

    /// Account currency code
    pub currency: String,
}

impl AccountInfo {
    /// Decline from balance to equity, floored at zero.
    ///
    /// This is the drawdown definition the exposure monitor reports:
    /// unrealized losses eating into the realized balance.
    pub fn drawdown(&self) -> Decimal {
        (self.balance - self.equity).max(Decimal::ZERO)
    }

    /// Drawdown as a percentage of balance (zero for empty accounts)
    pub fn drawdown_percent(&self) -> Decimal {
        if self.balance <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.drawdown() / self.balance * Decimal::ONE_HUNDRED
    }
}
