use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Per-user risk limits.
///
/// Created lazily with defaults on first access and mutated only through
/// the parameter service; the store never deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    /// Maximum risk per trade, percent of balance
    pub max_risk_per_trade: Decimal,

    /// Maximum daily loss, percent of balance
    pub max_daily_loss: Decimal,

    /// Maximum drawdown, percent of balance
    pub max_drawdown: Decimal,

    /// Maximum number of simultaneously open positions
    pub max_positions: u32,

    /// Maximum permitted account leverage
    pub max_leverage: u32,

    /// Minimum stop-loss distance in pips
    pub min_stop_loss_distance: Decimal,

    /// Maximum single position size in lots
    pub max_lot_size: Decimal,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            max_risk_per_trade: dec!(2.0),
            max_daily_loss: dec!(6.0),
            max_drawdown: dec!(20.0),
            max_positions: 5,
            max_leverage: 100,
            min_stop_loss_distance: dec!(10),
            max_lot_size: dec!(10.0),
        }
    }
}

impl RiskParameters {
    /// Validate the invariants: every field strictly positive,
    /// percentages within (0, 100].
    pub fn validate(&self) -> Result<(), String> {
        let percents = [
            ("max_risk_per_trade", self.max_risk_per_trade),
            ("max_daily_loss", self.max_daily_loss),
            ("max_drawdown", self.max_drawdown),
        ];
        for (name, value) in percents {
            if value <= Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(format!("{} must be in (0, 100], got {}", name, value));
            }
        }
        if self.max_positions == 0 {
            return Err("max_positions must be positive".to_string());
        }
        if self.max_leverage == 0 {
            return Err("max_leverage must be positive".to_string());
        }
        if self.min_stop_loss_distance <= Decimal::ZERO {
            return Err(format!(
                "min_stop_loss_distance must be positive, got {}",
                self.min_stop_loss_distance
            ));
        }
        if self.max_lot_size <= Decimal::ZERO {
            return Err(format!(
                "max_lot_size must be positive, got {}",
                self.max_lot_size
            ));
        }
        Ok(())
    }
}

/// Which limit a violation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    MaxDailyLoss,
    MaxDrawdown,
    MaxPositions,
    MaxRiskExposure,
    MaxLeverage,
}

/// How severe a violation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Informational, does not block by itself
    Warning,
    /// Limit breached
    Critical,
    /// Limit breached by a wide margin
    Emergency,
}

/// A single breached (or stressed) risk limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskViolation {
    pub kind: ViolationKind,
    pub current_value: Decimal,
    pub limit: Decimal,
    pub severity: ViolationSeverity,
    pub message: String,
}

/// Aggregated account risk snapshot with any limit violations.
///
/// `total_risk_exposure` is the sum of absolute floating P&L across open
/// positions - a proxy for at-risk capital, not distance-to-stop exposure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskExposure {
    pub balance: Decimal,
    pub total_risk_exposure: Decimal,
    pub risk_exposure_percent: Decimal,
    pub open_positions: u32,
    pub daily_loss: Decimal,
    pub daily_loss_percent: Decimal,
    pub current_drawdown: Decimal,
    pub drawdown_percent: Decimal,
    pub available_margin: Decimal,
    pub limits_exceeded: bool,
    pub violations: Vec<RiskViolation>,
}

impl RiskExposure {
    /// Attach the violation list, keeping `limits_exceeded` consistent
    pub fn with_violations(mut self, violations: Vec<RiskViolation>) -> Self {
        self.limits_exceeded = !violations.is_empty();
        self.violations = violations;
        self
    }
}
