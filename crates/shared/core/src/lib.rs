//! Aegis Core Domain
//!
//! Pure domain types for the Aegis risk management engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;

// Re-export commonly used types at crate root
pub use entities::{
    // Account / market snapshots
    AccountInfo,
    ConflictingPosition,
    CorrelationAction,
    // Correlation types
    CorrelationAssessment,
    CorrelationFilter,
    CorrelationMatrix,
    DynamicRiskConfig,
    EnhancedPartialExitConfig,
    ExitTrigger,
    MarketData,
    // Regime types
    MarketRegime,
    PartialExitLevel,
    // Core trading entities
    Position,
    // Sizing types
    PositionSizingConfig,
    PositionSizingResult,
    RegimeAssessment,
    RegimeDetectionConfig,
    // Risk state
    RiskExposure,
    RiskParameters,
    RiskViolation,
    SessionConfig,
    // Exit configuration
    SmartExitRules,
    StopLossRule,
    SymbolInfo,
    TakeProfitRule,
    TradeAdjustment,
    TradeDirection,
    TradeParams,
    TradeResult,
    TradingSession,
    // Validation output
    ValidationResult,
    ViolationKind,
    ViolationSeverity,
};
