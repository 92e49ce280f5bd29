use aegis_core::{CorrelationAssessment, CorrelationFilter, MarketData, Position, RegimeAssessment};
use async_trait::async_trait;

use crate::error::PortResult;

/// External correlation analysis consumed through a narrow interface
#[async_trait]
pub trait CorrelationAnalyzer: Send + Sync {
    /// Assess a proposed signal against existing open exposure
    async fn analyze_signal(
        &self,
        symbol: &str,
        existing_positions: &[Position],
        filter: &CorrelationFilter,
    ) -> PortResult<CorrelationAssessment>;
}

/// External market regime classifier
#[async_trait]
pub trait RegimeDetector: Send + Sync {
    /// Classify the current regime for a symbol and timeframe
    async fn detect_regime(
        &self,
        symbol: &str,
        timeframe: &str,
        market: &MarketData,
    ) -> PortResult<RegimeAssessment>;
}
