//! Per-regime risk profiles.
//!
//! A fixed lookup table the validator applies whenever regime detection
//! is active. Trending markets tolerate more size and wider targets;
//! volatile markets halve size and widen stops.

use aegis_core::MarketRegime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Risk multipliers and ceilings for one market regime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeRiskProfile {
    /// Applied to the allowed position size
    pub position_size_multiplier: Decimal,

    /// Applied to stop-loss distances
    pub stop_loss_multiplier: Decimal,

    /// Applied to take-profit distances
    pub take_profit_multiplier: Decimal,

    /// Applied to the drawdown limit
    pub max_drawdown_multiplier: Decimal,

    /// Applied to the daily-loss limit
    pub max_daily_loss_multiplier: Decimal,

    /// Hard lot ceiling in this regime
    pub max_position_size: Decimal,

    /// Exposure-percent ceiling in this regime
    pub max_exposure_percent: Decimal,
}

/// Profile for a classified regime
pub fn regime_profile(regime: MarketRegime) -> RegimeRiskProfile {
    match regime {
        MarketRegime::TrendingUp => RegimeRiskProfile {
            position_size_multiplier: dec!(1.2),
            stop_loss_multiplier: dec!(1.0),
            take_profit_multiplier: dec!(1.5),
            max_drawdown_multiplier: dec!(1.0),
            max_daily_loss_multiplier: dec!(1.0),
            max_position_size: dec!(10),
            max_exposure_percent: dec!(40),
        },
        MarketRegime::TrendingDown => RegimeRiskProfile {
            position_size_multiplier: dec!(1.0),
            stop_loss_multiplier: dec!(0.9),
            take_profit_multiplier: dec!(1.2),
            max_drawdown_multiplier: dec!(0.9),
            max_daily_loss_multiplier: dec!(0.9),
            max_position_size: dec!(8),
            max_exposure_percent: dec!(30),
        },
        MarketRegime::Ranging => RegimeRiskProfile {
            position_size_multiplier: dec!(0.8),
            stop_loss_multiplier: dec!(0.8),
            take_profit_multiplier: dec!(0.8),
            max_drawdown_multiplier: dec!(0.8),
            max_daily_loss_multiplier: dec!(0.8),
            max_position_size: dec!(6),
            max_exposure_percent: dec!(25),
        },
        MarketRegime::Volatile => RegimeRiskProfile {
            position_size_multiplier: dec!(0.5),
            stop_loss_multiplier: dec!(1.5),
            take_profit_multiplier: dec!(1.0),
            max_drawdown_multiplier: dec!(0.6),
            max_daily_loss_multiplier: dec!(0.6),
            max_position_size: dec!(3),
            max_exposure_percent: dec!(15),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trending_up_increases_size() {
        let profile = regime_profile(MarketRegime::TrendingUp);
        assert_eq!(profile.position_size_multiplier, dec!(1.2));
        assert_eq!(profile.max_position_size, dec!(10));
    }

    #[test]
    fn test_volatile_halves_size_and_widens_stops() {
        let profile = regime_profile(MarketRegime::Volatile);
        assert_eq!(profile.position_size_multiplier, dec!(0.5));
        assert_eq!(profile.stop_loss_multiplier, dec!(1.5));
        assert_eq!(profile.max_exposure_percent, dec!(15));
    }

    #[test]
    fn test_volatile_is_strictest_regime() {
        let volatile = regime_profile(MarketRegime::Volatile);
        for regime in [
            MarketRegime::TrendingUp,
            MarketRegime::TrendingDown,
            MarketRegime::Ranging,
        ] {
            let other = regime_profile(regime);
            assert!(volatile.position_size_multiplier <= other.position_size_multiplier);
            assert!(volatile.max_position_size <= other.max_position_size);
            assert!(volatile.max_exposure_percent <= other.max_exposure_percent);
        }
    }
}
