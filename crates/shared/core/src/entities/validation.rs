use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Suggested safe alternative for a rejected quantitative limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAdjustment {
    /// Suggested lot size that fits within the breached limit
    pub lot_size: Decimal,

    /// Which limit produced the suggestion
    pub reason: String,
}

/// Result of validating a proposed trade.
///
/// `valid` always equals `errors.is_empty()` - use the constructors and
/// `push_*` methods instead of assembling the struct by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub adjusted_params: Option<TradeAdjustment>,
}

impl ValidationResult {
    /// A passing result with no findings
    pub fn pass() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            adjusted_params: None,
        }
    }

    /// A failing result with a single blocking error
    pub fn reject(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![error.into()],
            warnings: Vec::new(),
            adjusted_params: None,
        }
    }

    /// Append a blocking error
    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.valid = false;
    }

    /// Append an advisory warning
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Record a suggested adjustment, keeping the smallest lot size when
    /// several limits produce suggestions
    pub fn suggest(&mut self, adjustment: TradeAdjustment) {
        match &self.adjusted_params {
            Some(existing) if existing.lot_size <= adjustment.lot_size => {}
            _ => self.adjusted_params = Some(adjustment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_tracks_errors() {
        let mut result = ValidationResult::pass();
        assert!(result.valid);

        result.push_warning("spread is wide");
        assert!(result.valid);

        result.push_error("lot size above maximum");
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_reject_constructor() {
        let result = ValidationResult::reject("trading session closed");
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["trading session closed".to_string()]);
    }

    #[test]
    fn test_suggest_keeps_smallest_lot() {
        let mut result = ValidationResult::pass();
        result.suggest(TradeAdjustment {
            lot_size: dec!(2.0),
            reason: "max lot".to_string(),
        });
        result.suggest(TradeAdjustment {
            lot_size: dec!(0.5),
            reason: "risk percent".to_string(),
        });
        result.suggest(TradeAdjustment {
            lot_size: dec!(1.0),
            reason: "correlation".to_string(),
        });

        assert_eq!(result.adjusted_params.unwrap().lot_size, dec!(0.5));
    }
}
