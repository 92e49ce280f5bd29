use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the stop-loss for a smart exit is derived
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopLossRule {
    /// Fixed distance from entry in pips
    FixedPips { pips: Decimal },
    /// ATR-scaled distance from entry
    AtrBased { multiplier: Decimal },
    /// Behind the most recent swing point over a lookback window
    SwingPoint { lookback: u32 },
}

/// Take-profit derived from the stop distance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeProfitRule {
    /// Reward-to-risk ratio, e.g. 2.0 = take profit at twice the stop
    /// distance
    pub rr_ratio: Decimal,
}

/// Rule-based exit configuration beyond a fixed-distance stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartExitRules {
    pub stop: StopLossRule,
    pub take_profit: Option<TakeProfitRule>,

    /// Close the trade after this many hours regardless of price
    pub max_holding_hours: Option<u32>,
}

/// What fires a partial exit level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum ExitTrigger {
    /// Close the tranche once the trade is this many pips in profit
    ProfitTarget { pips: Decimal },
    /// Close the tranche after this many hours in the trade
    TimeElapsed { hours: u32 },
    /// Close the tranche once price has moved this many ATRs in favor
    AtrMultiple { multiplier: Decimal },
    /// Close the tranche when price retraces this many pips from the peak
    TrailingStop { distance_pips: Decimal },
}

/// One tranche of a staged exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialExitLevel {
    /// Percent of the position to close when the trigger fires (0-100]
    pub percent: Decimal,

    pub trigger: ExitTrigger,
}

/// Staged (partial) position close plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedPartialExitConfig {
    pub levels: Vec<PartialExitLevel>,
}

impl EnhancedPartialExitConfig {
    /// Sum of all level percentages
    pub fn total_percent(&self) -> Decimal {
        self.levels.iter().map(|l| l.percent).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_percent() {
        let config = EnhancedPartialExitConfig {
            levels: vec![
                PartialExitLevel {
                    percent: dec!(50),
                    trigger: ExitTrigger::ProfitTarget { pips: dec!(20) },
                },
                PartialExitLevel {
                    percent: dec!(30),
                    trigger: ExitTrigger::TimeElapsed { hours: 12 },
                },
            ],
        };
        assert_eq!(config.total_percent(), dec!(80));
    }
}
