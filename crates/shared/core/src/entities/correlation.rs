use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Limits on simultaneous exposure to correlated instruments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationFilter {
    /// Pairwise correlation above which positions count as conflicting
    pub threshold: Decimal,

    /// Per-base-currency lot ceiling before the correlation penalty
    pub base_max_lot: Decimal,

    /// Hard cap on correlated positions per base currency
    pub max_correlated_positions: u32,
}

/// What the analyzer recommends for a proposed signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationAction {
    /// No conflicting exposure, trade as planned
    Proceed,
    /// Conflicting exposure exists, trade smaller
    ReduceSize,
    /// Exposure is saturated, skip the trade
    Skip,
}

/// An open position that correlates with the proposed symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictingPosition {
    pub ticket: u64,
    pub symbol: String,
    pub correlation: Decimal,
}

/// Analyzer verdict for a proposed signal against existing exposure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAssessment {
    /// Skip the trade entirely
    pub should_skip: bool,

    /// Open positions correlated beyond the filter threshold
    pub conflicting_positions: Vec<ConflictingPosition>,

    /// Recommended course of action
    pub recommended_action: CorrelationAction,

    /// Suggested smaller size when the action is `ReduceSize`
    pub adjusted_position_size: Option<Decimal>,

    /// Analyzer confidence in the verdict (0-1)
    pub confidence: Decimal,

    /// Human-readable explanation
    pub reason: String,
}

/// Symmetric pairwise correlation lookup.
///
/// Keys are stored with the pair sorted so (A, B) and (B, A) resolve to
/// the same entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    entries: HashMap<String, Decimal>,
}

impl CorrelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &str, b: &str) -> String {
        if a <= b {
            format!("{}|{}", a, b)
        } else {
            format!("{}|{}", b, a)
        }
    }

    /// Record the correlation between two symbols
    pub fn set(&mut self, a: &str, b: &str, correlation: Decimal) {
        self.entries.insert(Self::key(a, b), correlation);
    }

    /// Correlation between two symbols, if known
    pub fn get(&self, a: &str, b: &str) -> Option<Decimal> {
        if a == b {
            return Some(Decimal::ONE);
        }
        self.entries.get(&Self::key(a, b)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_matrix_is_symmetric() {
        let mut matrix = CorrelationMatrix::new();
        matrix.set("EURUSD", "GBPUSD", dec!(0.85));

        assert_eq!(matrix.get("EURUSD", "GBPUSD"), Some(dec!(0.85)));
        assert_eq!(matrix.get("GBPUSD", "EURUSD"), Some(dec!(0.85)));
        assert_eq!(matrix.get("EURUSD", "USDJPY"), None);
    }

    #[test]
    fn test_self_correlation_is_one() {
        let matrix = CorrelationMatrix::new();
        assert_eq!(matrix.get("EURUSD", "EURUSD"), Some(Decimal::ONE));
    }
}
