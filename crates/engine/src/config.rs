use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Engine-wide tuning knobs.
///
/// Every threshold that was a magic number in earlier revisions lives
/// here as a named, defaulted field.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Emergency close pool settings
    pub emergency: EmergencyConfig,

    /// Spread (pips) above which validation emits an advisory warning
    pub spread_warning_pips: Decimal,

    /// Daily-loss/drawdown overshoot factor that escalates a violation
    /// from Critical to Emergency
    pub severity_escalation_factor: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            emergency: EmergencyConfig::default(),
            spread_warning_pips: dec!(20),
            severity_escalation_factor: dec!(1.5),
        }
    }
}

/// Bounded-concurrency settings for emergency liquidation
#[derive(Debug, Clone)]
pub struct EmergencyConfig {
    /// Maximum broker close calls in flight at once
    pub max_in_flight: usize,

    /// Per-close broker call timeout
    pub close_timeout: Duration,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 5,
            close_timeout: Duration::from_secs(10),
        }
    }
}
