//! Exit configuration validation.
//!
//! Structural bounds checks for smart-exit and staged partial-exit
//! plans, plus a market-aware reachability check: the plan is replayed
//! against a synthetic profitable trade (favorable excursion of
//! max(2 x ATR, 50 pips), held for 24 hours) and rejected when no level
//! could ever fire.

use aegis_core::{
    EnhancedPartialExitConfig, ExitTrigger, MarketData, SmartExitRules, StopLossRule, SymbolInfo,
    TakeProfitRule,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const ATR_STOP_MULTIPLIER_RANGE: (Decimal, Decimal) = (dec!(1), dec!(5));
const SWING_LOOKBACK_RANGE: (u32, u32) = (5, 50);
const MAX_HOLDING_HOURS_RANGE: (u32, u32) = (1, 168);
const RR_RATIO_RANGE: (Decimal, Decimal) = (dec!(0.5), dec!(10));

/// Total partial-exit percent below which the plan leaves most of the
/// position unmanaged
const PARTIAL_TOTAL_WARN_BELOW: Decimal = dec!(50);

/// Floor on the synthetic trade's favorable excursion, in pips
const MIN_FAVORABLE_PIPS: Decimal = dec!(50);

/// ATR multiple the synthetic trade moves in favor
const FAVORABLE_ATR_MULTIPLE: Decimal = dec!(2);

/// Hours the synthetic trade is held
const SIMULATED_HOLD_HOURS: u32 = 24;

/// Outcome of validating an exit configuration
#[derive(Debug, Clone, Default)]
pub struct ExitValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ExitValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn merge(&mut self, other: ExitValidation) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Stateless validator for exit plans
pub struct ExitConfigValidator;

impl ExitConfigValidator {
    /// Structural checks on a smart-exit rule set
    pub fn validate_smart_exit(rules: &SmartExitRules) -> ExitValidation {
        let mut report = ExitValidation::default();

        match &rules.stop {
            StopLossRule::FixedPips { pips } => {
                if *pips <= Decimal::ZERO {
                    report
                        .errors
                        .push(format!("Fixed stop distance must be positive, got {}", pips));
                }
            }
            StopLossRule::AtrBased { multiplier } => {
                let (low, high) = ATR_STOP_MULTIPLIER_RANGE;
                if *multiplier < low || *multiplier > high {
                    report.errors.push(format!(
                        "ATR stop multiplier {} outside [{}, {}]",
                        multiplier, low, high
                    ));
                }
            }
            StopLossRule::SwingPoint { lookback } => {
                let (low, high) = SWING_LOOKBACK_RANGE;
                if *lookback < low || *lookback > high {
                    report.errors.push(format!(
                        "Swing lookback {} outside [{}, {}] bars",
                        lookback, low, high
                    ));
                }
            }
        }

        if let Some(TakeProfitRule { rr_ratio }) = &rules.take_profit {
            let (low, high) = RR_RATIO_RANGE;
            if *rr_ratio < low || *rr_ratio > high {
                report.errors.push(format!(
                    "Reward-to-risk ratio {} outside [{}, {}]",
                    rr_ratio, low, high
                ));
            }
        }

        if let Some(hours) = rules.max_holding_hours {
            let (low, high) = MAX_HOLDING_HOURS_RANGE;
            if hours < low || hours > high {
                report.errors.push(format!(
                    "Max holding time {} h outside [{}, {}] h",
                    hours, low, high
                ));
            }
        }

        report
    }

    /// Structural checks on a staged partial-exit plan
    pub fn validate_partial_exits(config: &EnhancedPartialExitConfig) -> ExitValidation {
        let mut report = ExitValidation::default();

        if config.levels.is_empty() {
            report
                .errors
                .push("Partial exit plan has no levels".to_string());
            return report;
        }

        for (index, level) in config.levels.iter().enumerate() {
            if level.percent <= Decimal::ZERO || level.percent > Decimal::ONE_HUNDRED {
                report.errors.push(format!(
                    "Level {} percent must be in (0, 100], got {}",
                    index + 1,
                    level.percent
                ));
            }
            if let Some(problem) = Self::check_trigger(&level.trigger) {
                report
                    .errors
                    .push(format!("Level {}: {}", index + 1, problem));
            }
        }

        let total = config.total_percent();
        if total > Decimal::ONE_HUNDRED {
            report.errors.push(format!(
                "Partial exit levels close {}% in total, more than the position",
                total
            ));
        } else if total < PARTIAL_TOTAL_WARN_BELOW {
            report.warnings.push(format!(
                "Partial exit levels close only {}% in total; most of the position has no staged exit",
                total
            ));
        }

        report
    }

    /// Structural checks plus reachability against current market data.
    ///
    /// The plan must contain at least one level that would fire on a
    /// profitable trade under today's volatility; a plan whose every
    /// trigger sits beyond the synthetic excursion can never take profit.
    pub fn validate_partial_exits_against_market(
        config: &EnhancedPartialExitConfig,
        symbol: &SymbolInfo,
        market: &MarketData,
    ) -> ExitValidation {
        let mut report = Self::validate_partial_exits(config);
        if !report.is_valid() {
            return report;
        }

        let Some(atr) = market.atr else {
            report
                .warnings
                .push("No ATR available, skipping exit reachability check".to_string());
            return report;
        };
        if atr <= Decimal::ZERO || symbol.point <= Decimal::ZERO {
            report
                .warnings
                .push("Degenerate ATR or point size, skipping exit reachability check".to_string());
            return report;
        }

        let atr_pips = symbol.price_to_pips(atr);
        let favorable_pips = (FAVORABLE_ATR_MULTIPLE * atr_pips).max(MIN_FAVORABLE_PIPS);

        let reachable = config
            .levels
            .iter()
            .filter(|level| Self::trigger_reachable(&level.trigger, atr_pips, favorable_pips))
            .count();

        if reachable == 0 {
            report.errors.push(format!(
                "No exit level is reachable on a profitable trade ({} pips favorable excursion, {} h hold)",
                favorable_pips, SIMULATED_HOLD_HOURS
            ));
        } else if reachable < config.levels.len() {
            report.warnings.push(format!(
                "Only {} of {} exit levels are reachable under current volatility",
                reachable,
                config.levels.len()
            ));
        }

        report
    }

    /// Combined entry point used during trade validation
    pub fn validate_trade_exits(
        smart: Option<&SmartExitRules>,
        partial: Option<&EnhancedPartialExitConfig>,
        market: Option<(&SymbolInfo, &MarketData)>,
    ) -> ExitValidation {
        let mut report = ExitValidation::default();
        if let Some(rules) = smart {
            report.merge(Self::validate_smart_exit(rules));
        }
        if let Some(config) = partial {
            match market {
                Some((symbol, data)) => report.merge(
                    Self::validate_partial_exits_against_market(config, symbol, data),
                ),
                None => report.merge(Self::validate_partial_exits(config)),
            }
        }
        report
    }

    fn check_trigger(trigger: &ExitTrigger) -> Option<String> {
        match trigger {
            ExitTrigger::ProfitTarget { pips } if *pips <= Decimal::ZERO => {
                Some(format!("profit target must be positive, got {} pips", pips))
            }
            ExitTrigger::TimeElapsed { hours } if *hours == 0 => {
                Some("time trigger must be at least one hour".to_string())
            }
            ExitTrigger::AtrMultiple { multiplier } if *multiplier <= Decimal::ZERO => Some(
                format!("ATR multiple must be positive, got {}", multiplier),
            ),
            ExitTrigger::TrailingStop { distance_pips } if *distance_pips <= Decimal::ZERO => Some(
                format!("trailing distance must be positive, got {} pips", distance_pips),
            ),
            _ => None,
        }
    }

    fn trigger_reachable(trigger: &ExitTrigger, atr_pips: Decimal, favorable_pips: Decimal) -> bool {
        match trigger {
            ExitTrigger::ProfitTarget { pips } => *pips <= favorable_pips,
            ExitTrigger::TimeElapsed { hours } => *hours <= SIMULATED_HOLD_HOURS,
            ExitTrigger::AtrMultiple { multiplier } => *multiplier * atr_pips <= favorable_pips,
            ExitTrigger::TrailingStop { distance_pips } => *distance_pips < favorable_pips,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::PartialExitLevel;
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

    fn level(percent: Decimal, trigger: ExitTrigger) -> PartialExitLevel {
        PartialExitLevel { percent, trigger }
    }

    #[test]
    fn test_smart_exit_within_bounds() {
        let rules = SmartExitRules {
            stop: StopLossRule::AtrBased {
                multiplier: dec!(2),
            },
            take_profit: Some(TakeProfitRule { rr_ratio: dec!(2) }),
            max_holding_hours: Some(48),
        };
        assert!(ExitConfigValidator::validate_smart_exit(&rules).is_valid());
    }

    #[test]
    fn test_smart_exit_rejects_out_of_range_fields() {
        let rules = SmartExitRules {
            stop: StopLossRule::AtrBased {
                multiplier: dec!(7),
            },
            take_profit: Some(TakeProfitRule {
                rr_ratio: dec!(0.1),
            }),
            max_holding_hours: Some(500),
        };
        let report = ExitConfigValidator::validate_smart_exit(&rules);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_smart_exit_swing_lookback_bounds() {
        let rules = SmartExitRules {
            stop: StopLossRule::SwingPoint { lookback: 3 },
            take_profit: None,
            max_holding_hours: None,
        };
        assert!(!ExitConfigValidator::validate_smart_exit(&rules).is_valid());
    }

    #[test]
    fn test_partial_plan_over_100_percent_is_error() {
        let config = EnhancedPartialExitConfig {
            levels: vec![
                level(dec!(60), ExitTrigger::ProfitTarget { pips: dec!(20) }),
                level(dec!(60), ExitTrigger::ProfitTarget { pips: dec!(40) }),
            ],
        };
        let report = ExitConfigValidator::validate_partial_exits(&config);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_partial_plan_under_50_percent_warns() {
        let config = EnhancedPartialExitConfig {
            levels: vec![level(dec!(30), ExitTrigger::ProfitTarget { pips: dec!(20) })],
        };
        let report = ExitConfigValidator::validate_partial_exits(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_partial_plan_rejects_bad_trigger_values() {
        let config = EnhancedPartialExitConfig {
            levels: vec![
                level(dec!(50), ExitTrigger::ProfitTarget { pips: dec!(0) }),
                level(dec!(50), ExitTrigger::TimeElapsed { hours: 0 }),
            ],
        };
        let report = ExitConfigValidator::validate_partial_exits(&config);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_reachable_plan_passes_simulation() {
        // ATR 0.0050 = 50 pips, favorable excursion = 100 pips
        let config = EnhancedPartialExitConfig {
            levels: vec![
                level(dec!(50), ExitTrigger::ProfitTarget { pips: dec!(80) }),
                level(dec!(50), ExitTrigger::TimeElapsed { hours: 12 }),
            ],
        };
        let market = MarketData {
            atr: Some(dec!(0.0050)),
            ..Default::default()
        };

        let report = ExitConfigValidator::validate_partial_exits_against_market(
            &config,
            &eurusd(),
            &market,
        );
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unreachable_plan_is_rejected() {
        // Favorable excursion 100 pips; every trigger sits beyond it
        let config = EnhancedPartialExitConfig {
            levels: vec![
                level(dec!(50), ExitTrigger::ProfitTarget { pips: dec!(500) }),
                level(dec!(50), ExitTrigger::AtrMultiple { multiplier: dec!(8) }),
            ],
        };
        let market = MarketData {
            atr: Some(dec!(0.0050)),
            ..Default::default()
        };

        let report = ExitConfigValidator::validate_partial_exits_against_market(
            &config,
            &eurusd(),
            &market,
        );
        assert!(!report.is_valid());
        assert!(report.errors[0].contains("reachable"));
    }

    #[test]
    fn test_low_volatility_uses_50_pip_floor() {
        // ATR 10 pips: 2 x ATR = 20, the floor lifts the excursion to 50
        let config = EnhancedPartialExitConfig {
            levels: vec![level(dec!(100), ExitTrigger::ProfitTarget { pips: dec!(40) })],
        };
        let market = MarketData {
            atr: Some(dec!(0.0010)),
            ..Default::default()
        };

        let report = ExitConfigValidator::validate_partial_exits_against_market(
            &config,
            &eurusd(),
            &market,
        );
        assert!(report.is_valid());
    }

    #[test]
    fn test_missing_atr_skips_simulation_with_warning() {
        let config = EnhancedPartialExitConfig {
            levels: vec![level(dec!(100), ExitTrigger::ProfitTarget { pips: dec!(500) })],
        };

        let report = ExitConfigValidator::validate_partial_exits_against_market(
            &config,
            &eurusd(),
            &MarketData::default(),
        );
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
