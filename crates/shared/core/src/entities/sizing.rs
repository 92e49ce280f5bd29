use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position sizing method, tagged with its inputs.
///
/// Constructed once at the system boundary; the sizer dispatches on the
/// variant instead of re-interpreting loose configuration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PositionSizingConfig {
    /// Risk a fixed percent of balance against a pip-distance stop
    FixedRisk {
        risk_percent: Decimal,
        stop_loss_pips: Decimal,
    },
    /// Risk a fixed percent of balance against an ATR-derived stop
    AtrBased {
        risk_percent: Decimal,
        atr: Decimal,
        atr_multiplier: Decimal,
    },
    /// Kelly criterion from historical win rate and payoff ratio
    Kelly {
        win_rate: Decimal,
        payoff_ratio: Decimal,
        stop_loss_pips: Decimal,
    },
    /// Size inversely proportional to recent volatility
    VolatilityBased {
        risk_percent: Decimal,
        volatility: Decimal,
    },
    /// Allocate a percent of equity as notional
    AccountEquity {
        equity_percent: Decimal,
        entry_price: Decimal,
    },
    /// Fixed lot count, normalized to the symbol's constraints
    FixedLot { lots: Decimal },
}

/// Output of a sizing calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSizingResult {
    /// Tradable size in lots (step-aligned, within broker bounds)
    pub position_size: Decimal,

    /// Account-currency amount at risk at the stop
    pub risk_amount: Decimal,

    /// Risk as a percent of balance
    pub risk_percentage: Decimal,

    /// Stop price implied by the method, when it derives one
    pub stop_loss_price: Option<Decimal>,

    /// Confidence in the sizing method for current conditions (0-1)
    pub confidence: Decimal,

    /// Advisory notes (clamping, aggressive Kelly fraction, ...)
    pub warnings: Vec<String>,
}
