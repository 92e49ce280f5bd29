mod account;
mod correlation;
mod exit;
mod market;
mod position;
mod regime;
mod risk;
mod sizing;
mod symbol;
mod trade;
mod validation;

pub use account::AccountInfo;
pub use correlation::{
    ConflictingPosition, CorrelationAction, CorrelationAssessment, CorrelationFilter,
    CorrelationMatrix,
};
pub use exit::{
    EnhancedPartialExitConfig, ExitTrigger, PartialExitLevel, SmartExitRules, StopLossRule,
    TakeProfitRule,
};
pub use market::{DynamicRiskConfig, MarketData, SessionConfig, TradingSession};
pub use position::{Position, TradeDirection};
pub use regime::{MarketRegime, RegimeAssessment, RegimeDetectionConfig};
pub use risk::{RiskExposure, RiskParameters, RiskViolation, ViolationKind, ViolationSeverity};
pub use sizing::{PositionSizingConfig, PositionSizingResult};
pub use symbol::SymbolInfo;
pub use trade::{TradeParams, TradeResult};
pub use validation::{TradeAdjustment, ValidationResult};
