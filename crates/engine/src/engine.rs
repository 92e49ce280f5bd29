//! Engine facade.
//!
//! Wires the sizer, validator, exposure monitor, emergency controller
//! and parameter service onto one struct, consuming every collaborator
//! through the port traits.

use crate::config::EngineConfig;
use crate::emergency::{EmergencyCloseReport, EmergencyController};
use crate::error::Result;
use crate::exposure::ExposureMonitor;
use crate::params::ParameterService;
use crate::sizing::PositionSizer;
use crate::validator::TradeValidator;
use aegis_core::{
    PositionSizingConfig, PositionSizingResult, RiskExposure, RiskParameters, SmartExitRules,
    TradeParams, ValidationResult,
};
use aegis_ports::{
    AccountInfoProvider, BrokerExecutionClient, CorrelationAnalyzer, MarketDataProvider,
    PositionStore, RegimeDetector, RiskParameterStore, SymbolInfoProvider,
};
use std::sync::Arc;

/// Every external collaborator the engine needs
#[derive(Clone)]
pub struct EnginePorts {
    pub symbols: Arc<dyn SymbolInfoProvider>,
    pub accounts: Arc<dyn AccountInfoProvider>,
    pub positions: Arc<dyn PositionStore>,
    pub market: Arc<dyn MarketDataProvider>,
    pub broker: Arc<dyn BrokerExecutionClient>,
    pub correlation: Arc<dyn CorrelationAnalyzer>,
    pub regime: Arc<dyn RegimeDetector>,
    pub params: Arc<dyn RiskParameterStore>,
}

pub struct RiskEngine {
    symbols: Arc<dyn SymbolInfoProvider>,
    accounts: Arc<dyn AccountInfoProvider>,
    monitor: Arc<ExposureMonitor>,
    validator: TradeValidator,
    emergency: EmergencyController,
    params: ParameterService,
}

impl RiskEngine {
    pub fn new(ports: EnginePorts, config: EngineConfig) -> Self {
        let monitor = Arc::new(ExposureMonitor::new(
            Arc::clone(&ports.accounts),
            Arc::clone(&ports.positions),
            config.severity_escalation_factor,
        ));
        let validator = TradeValidator::new(
            Arc::clone(&ports.symbols),
            Arc::clone(&ports.positions),
            Arc::clone(&ports.market),
            Arc::clone(&ports.correlation),
            Arc::clone(&ports.regime),
            Arc::clone(&monitor),
            config.clone(),
        );
        let emergency = EmergencyController::new(
            Arc::clone(&ports.positions),
            Arc::clone(&ports.broker),
            config.emergency.clone(),
        );

        Self {
            symbols: ports.symbols,
            accounts: ports.accounts,
            monitor,
            validator,
            emergency,
            params: ParameterService::new(ports.params),
        }
    }

    /// Size a position for the user under the given sizing strategy
    pub async fn calculate_position_size(
        &self,
        user_id: &str,
        symbol: &str,
        config: &PositionSizingConfig,
    ) -> Result<PositionSizingResult> {
        let (account, symbol_info) = tokio::join!(
            self.accounts.account_info(user_id),
            self.symbols.symbol_info(symbol),
        );
        let account = account?;
        let symbol_info = symbol_info?;

        // Equity-based sizing works from equity, everything else from
        // balance
        let capital = match config {
            PositionSizingConfig::AccountEquity { .. } => account.equity,
            _ => account.balance,
        };
        PositionSizer::size_for(config, capital, &symbol_info)
    }

    /// Run a proposed trade (and its optional smart-exit plan) through
    /// the full validation pipeline
    pub async fn validate_trade(
        &self,
        trade: &TradeParams,
        smart_exit: Option<&SmartExitRules>,
    ) -> Result<ValidationResult> {
        let params = self.params.get(&trade.user_id).await?;
        self.validator.validate(trade, smart_exit, &params).await
    }

    /// Whether the user may open another position right now
    pub async fn can_open_position(&self, user_id: &str) -> Result<bool> {
        let params = self.params.get(user_id).await?;
        self.monitor.can_open_position(user_id, &params).await
    }

    /// Current exposure snapshot with any limit violations
    pub async fn risk_exposure(&self, user_id: &str) -> Result<RiskExposure> {
        let params = self.params.get(user_id).await?;
        self.monitor.risk_exposure(user_id, &params).await
    }

    /// Close every open position for the user, best-effort
    pub async fn emergency_close_all(
        &self,
        user_id: &str,
        reason: &str,
    ) -> Result<EmergencyCloseReport> {
        self.emergency.close_all(user_id, reason).await
    }

    /// Effective risk parameters for the user (defaults if never set)
    pub async fn risk_parameters(&self, user_id: &str) -> Result<RiskParameters> {
        self.params.get(user_id).await
    }

    /// Replace the user's risk parameters after validation
    pub async fn set_risk_parameters(&self, user_id: &str, params: RiskParameters) -> Result<()> {
        self.params.set(user_id, params).await
    }
}
