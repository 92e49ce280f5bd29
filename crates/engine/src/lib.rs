//! Aegis Risk Management Engine
//!
//! Decides, for each proposed trade, whether it is allowed, what size it
//! should be, and what the account's current risk exposure is; performs
//! best-effort emergency liquidation of all open positions.
//!
//! ```text
//! SymbolInfo / AccountInfo / Positions        (read-only ports)
//!          │
//!          ▼
//!  PositionSizer ──► ExposureMonitor ──► TradeValidator ──► ValidationResult
//!                                              │
//!                                              ▼
//!                                    EmergencyController ──► broker closes
//! ```
//!
//! Everything upstream of the ports is request-scoped and mostly pure;
//! the one place genuine concurrency matters is the emergency close,
//! which fans position closes out through a bounded worker pool.

pub mod config;
pub mod correlation;
pub mod emergency;
pub mod engine;
pub mod error;
pub mod exit_rules;
pub mod exposure;
pub mod params;
pub mod regime;
pub mod sizing;
pub mod validator;

// Re-export main types
pub use config::{EmergencyConfig, EngineConfig};
pub use correlation::{MatrixCorrelationAnalyzer, correlated_size_limit, position_limits};
pub use emergency::{CloseFailure, EmergencyCloseReport, EmergencyController};
pub use engine::{EnginePorts, RiskEngine};
pub use error::{Result, RiskError};
pub use exit_rules::{ExitConfigValidator, ExitValidation};
pub use exposure::{ExposureMonitor, allows_new_position};
pub use params::{InMemoryParameterStore, ParameterService};
pub use regime::{RegimeRiskProfile, regime_profile};
pub use sizing::PositionSizer;
pub use validator::{FailurePolicy, Gate, TradeValidator};
