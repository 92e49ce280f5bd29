//! Correlation-aware exposure limiting.
//!
//! A built-in analyzer that scores a proposed symbol against open
//! positions using a pairwise correlation matrix, with a shared-base-
//! currency fallback for pairs the matrix does not know. Implements the
//! same `CorrelationAnalyzer` port an external service would, so the
//! engine does not care which one it is wired to.

use aegis_core::{
    ConflictingPosition, CorrelationAction, CorrelationAssessment, CorrelationFilter,
    CorrelationMatrix, Position,
};
use aegis_ports::{CorrelationAnalyzer, PortResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Assumed correlation for an unknown pair sharing a base currency
const SHARED_BASE_CORRELATION: Decimal = dec!(0.75);

/// Per-conflict reduction of the base lot ceiling
const PENALTY_PER_CONFLICT: Decimal = dec!(0.2);

/// Reduction cap: at least 20% of the base ceiling always remains
const PENALTY_CAP: Decimal = dec!(0.8);

/// First three characters of a forex-style symbol, e.g. "EUR" of
/// "EURUSD". Symbols shorter than that are their own base.
pub fn base_currency(symbol: &str) -> &str {
    if symbol.len() >= 3 { &symbol[..3] } else { symbol }
}

/// Lot ceiling once `conflicts` correlated positions are already open:
/// `base_max_lot * (1 - min(0.8, conflicts * 0.2))`.
pub fn correlated_size_limit(filter: &CorrelationFilter, conflicts: usize) -> Decimal {
    let penalty = (Decimal::from(conflicts as u64) * PENALTY_PER_CONFLICT).min(PENALTY_CAP);
    filter.base_max_lot * (Decimal::ONE - penalty)
}

/// Lot ceilings per base currency given the open position set.
///
/// Each base currency with open positions maps to the ceiling a new
/// position in that currency would face.
pub fn position_limits(
    positions: &[Position],
    filter: &CorrelationFilter,
) -> std::collections::HashMap<String, Decimal> {
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for position in positions {
        *counts
            .entry(base_currency(&position.symbol).to_string())
            .or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(base, count)| (base, correlated_size_limit(filter, count)))
        .collect()
}

/// Matrix-backed correlation analyzer
#[derive(Debug, Default)]
pub struct MatrixCorrelationAnalyzer {
    matrix: CorrelationMatrix,
}

impl MatrixCorrelationAnalyzer {
    pub fn new(matrix: CorrelationMatrix) -> Self {
        Self { matrix }
    }

    fn correlation(&self, a: &str, b: &str) -> Option<Decimal> {
        if let Some(value) = self.matrix.get(a, b) {
            return Some(value);
        }
        if base_currency(a) == base_currency(b) {
            return Some(SHARED_BASE_CORRELATION);
        }
        None
    }
}

#[async_trait]
impl CorrelationAnalyzer for MatrixCorrelationAnalyzer {
    async fn analyze_signal(
        &self,
        symbol: &str,
        existing_positions: &[Position],
        filter: &CorrelationFilter,
    ) -> PortResult<CorrelationAssessment> {
        let conflicting: Vec<ConflictingPosition> = existing_positions
            .iter()
            .filter_map(|position| {
                let correlation = self.correlation(symbol, &position.symbol)?;
                if correlation.abs() >= filter.threshold {
                    Some(ConflictingPosition {
                        ticket: position.ticket,
                        symbol: position.symbol.clone(),
                        correlation,
                    })
                } else {
                    None
                }
            })
            .collect();

        let conflicts = conflicting.len();
        let assessment = if conflicts == 0 {
            CorrelationAssessment {
                should_skip: false,
                conflicting_positions: conflicting,
                recommended_action: CorrelationAction::Proceed,
                adjusted_position_size: None,
                confidence: dec!(0.90),
                reason: format!("No open position correlates with {}", symbol),
            }
        } else if conflicts as u32 >= filter.max_correlated_positions {
            CorrelationAssessment {
                should_skip: true,
                conflicting_positions: conflicting,
                recommended_action: CorrelationAction::Skip,
                adjusted_position_size: None,
                confidence: dec!(0.85),
                reason: format!(
                    "{} correlated positions already open (cap {})",
                    conflicts, filter.max_correlated_positions
                ),
            }
        } else {
            let limit = correlated_size_limit(filter, conflicts);
            CorrelationAssessment {
                should_skip: false,
                conflicting_positions: conflicting,
                recommended_action: CorrelationAction::ReduceSize,
                adjusted_position_size: Some(limit),
                confidence: dec!(0.80),
                reason: format!(
                    "{} correlated positions open, size limited to {} lots",
                    conflicts, limit
                ),
            }
        };

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::TradeDirection;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn filter() -> CorrelationFilter {
        CorrelationFilter {
            threshold: dec!(0.7),
            base_max_lot: dec!(10),
            max_correlated_positions: 5,
        }
    }

    fn position(ticket: u64, symbol: &str) -> Position {
        Position {
            ticket,
            symbol: symbol.to_string(),
            direction: TradeDirection::Buy,
            lot_size: dec!(1),
            open_price: dec!(1.1000),
            current_price: dec!(1.1000),
            profit: Decimal::ZERO,
            swap: Decimal::ZERO,
            open_time: Utc::now(),
        }
    }

    #[test]
    fn test_base_currency() {
        assert_eq!(base_currency("EURUSD"), "EUR");
        assert_eq!(base_currency("EU"), "EU");
    }

    #[test]
    fn test_size_limit_three_conflicts() {
        // 10 * (1 - 3 * 0.2) = 4
        assert_eq!(correlated_size_limit(&filter(), 3), dec!(4.0));
    }

    #[test]
    fn test_position_limits_per_base_currency() {
        let positions = vec![
            position(1, "EURUSD"),
            position(2, "EURJPY"),
            position(3, "EURGBP"),
            position(4, "USDJPY"),
        ];

        let limits = position_limits(&positions, &filter());
        assert_eq!(limits.get("EUR"), Some(&dec!(4.0)));
        assert_eq!(limits.get("USD"), Some(&dec!(8.0)));
    }

    #[test]
    fn test_size_limit_penalty_is_capped() {
        // 6 conflicts would be a 1.2 penalty, capped at 0.8
        assert_eq!(correlated_size_limit(&filter(), 6), dec!(2.0));
    }

    #[tokio::test]
    async fn test_no_conflicts_proceeds() {
        let analyzer = MatrixCorrelationAnalyzer::default();
        let positions = vec![position(1, "USDJPY")];

        let assessment = analyzer
            .analyze_signal("EURUSD", &positions, &filter())
            .await
            .unwrap();

        assert!(!assessment.should_skip);
        assert_eq!(assessment.recommended_action, CorrelationAction::Proceed);
        assert!(assessment.conflicting_positions.is_empty());
    }

    #[tokio::test]
    async fn test_matrix_conflict_reduces_size() {
        let mut matrix = CorrelationMatrix::new();
        matrix.set("EURUSD", "GBPUSD", dec!(0.85));
        let analyzer = MatrixCorrelationAnalyzer::new(matrix);
        let positions = vec![position(1, "GBPUSD")];

        let assessment = analyzer
            .analyze_signal("EURUSD", &positions, &filter())
            .await
            .unwrap();

        assert_eq!(assessment.recommended_action, CorrelationAction::ReduceSize);
        assert_eq!(assessment.adjusted_position_size, Some(dec!(8.0)));
        assert_eq!(assessment.conflicting_positions.len(), 1);
    }

    #[tokio::test]
    async fn test_shared_base_currency_counts_as_conflict() {
        let analyzer = MatrixCorrelationAnalyzer::default();
        let positions = vec![position(1, "EURJPY"), position(2, "EURGBP")];

        let assessment = analyzer
            .analyze_signal("EURUSD", &positions, &filter())
            .await
            .unwrap();

        assert_eq!(assessment.conflicting_positions.len(), 2);
        assert_eq!(assessment.adjusted_position_size, Some(dec!(6.0)));
    }

    #[tokio::test]
    async fn test_saturated_exposure_skips() {
        let analyzer = MatrixCorrelationAnalyzer::default();
        let positions: Vec<Position> = (0..5)
            .map(|i| position(i, &format!("EURJP{}", i)))
            .collect();

        let assessment = analyzer
            .analyze_signal("EURUSD", &positions, &filter())
            .await
            .unwrap();

        assert!(assessment.should_skip);
        assert_eq!(assessment.recommended_action, CorrelationAction::Skip);
    }
}
