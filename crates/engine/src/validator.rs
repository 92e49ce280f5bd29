//! Trade validation pipeline.
//!
//! Validation is an explicit ordered list of gates, each with a declared
//! failure policy: `Terminal` gates stop the pipeline on failure,
//! `Accumulate` gates record errors and keep going so the caller sees
//! every problem at once, `Advisory` gates only ever warn. Business-rule
//! failures land in the `ValidationResult`; port failures propagate as
//! `RiskError::Dependency` and never masquerade as validation errors.

use crate::config::EngineConfig;
use crate::correlation::{base_currency, position_limits};
use crate::error::Result;
use crate::exit_rules::ExitConfigValidator;
use crate::exposure::{ExposureMonitor, allows_new_position};
use crate::regime::{RegimeRiskProfile, regime_profile};
use crate::sizing::PositionSizer;
use aegis_core::{
    CorrelationAction, MarketData, Position, RiskExposure, RiskParameters, SmartExitRules,
    SymbolInfo, TradeAdjustment, TradeDirection, TradeParams, ValidationResult,
};
use aegis_ports::{
    CorrelationAnalyzer, MarketDataProvider, PositionStore, RegimeDetector, SymbolInfoProvider,
};
use chrono::Utc;
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

/// What a failing gate does to the rest of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Failure stops the pipeline; later gates never run
    Terminal,
    /// Failure is recorded and the pipeline continues
    Accumulate,
    /// Can only warn, never fail
    Advisory,
}

/// One validation gate, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Session,
    Regime,
    Correlation,
    Bounds,
    StopDistance,
    RiskPercent,
    Capacity,
    Advisory,
    ExitConfig,
}

impl Gate {
    /// The pipeline, in execution order
    pub const ORDER: [Gate; 9] = [
        Gate::Session,
        Gate::Regime,
        Gate::Correlation,
        Gate::Bounds,
        Gate::StopDistance,
        Gate::RiskPercent,
        Gate::Capacity,
        Gate::Advisory,
        Gate::ExitConfig,
    ];

    pub fn policy(self) -> FailurePolicy {
        match self {
            Gate::Session | Gate::Regime | Gate::Correlation => FailurePolicy::Terminal,
            Gate::Bounds
            | Gate::StopDistance
            | Gate::RiskPercent
            | Gate::Capacity
            | Gate::ExitConfig => FailurePolicy::Accumulate,
            Gate::Advisory => FailurePolicy::Advisory,
        }
    }
}

/// Everything the gates need, assembled once before the pipeline runs
struct GateContext<'a> {
    trade: &'a TradeParams,
    smart_exit: Option<&'a SmartExitRules>,
    params: &'a RiskParameters,
    symbol: SymbolInfo,
    market: MarketData,
    positions: Vec<Position>,
    exposure: RiskExposure,

    /// Set by the regime gate when detection is active
    profile: Option<RegimeRiskProfile>,

    result: ValidationResult,
}

pub struct TradeValidator {
    symbols: Arc<dyn SymbolInfoProvider>,
    positions: Arc<dyn PositionStore>,
    market: Arc<dyn MarketDataProvider>,
    correlation: Arc<dyn CorrelationAnalyzer>,
    regime: Arc<dyn RegimeDetector>,
    monitor: Arc<ExposureMonitor>,
    config: EngineConfig,
}

impl TradeValidator {
    pub fn new(
        symbols: Arc<dyn SymbolInfoProvider>,
        positions: Arc<dyn PositionStore>,
        market: Arc<dyn MarketDataProvider>,
        correlation: Arc<dyn CorrelationAnalyzer>,
        regime: Arc<dyn RegimeDetector>,
        monitor: Arc<ExposureMonitor>,
        config: EngineConfig,
    ) -> Self {
        Self {
            symbols,
            positions,
            market,
            correlation,
            regime,
            monitor,
            config,
        }
    }

    /// Run the full gate pipeline over a proposed trade and its
    /// optional smart-exit plan
    pub async fn validate(
        &self,
        trade: &TradeParams,
        smart_exit: Option<&SmartExitRules>,
        params: &RiskParameters,
    ) -> Result<ValidationResult> {
        let (symbol, market, positions, exposure) = tokio::join!(
            self.symbols.symbol_info(&trade.symbol),
            self.market.market_data(&trade.symbol),
            self.positions.open_positions(&trade.user_id),
            self.monitor.risk_exposure(&trade.user_id, params),
        );

        let mut ctx = GateContext {
            trade,
            smart_exit,
            params,
            symbol: symbol?,
            market: market?,
            positions: positions?,
            exposure: exposure?,
            profile: None,
            result: ValidationResult::pass(),
        };

        for gate in Gate::ORDER {
            let errors_before = ctx.result.errors.len();
            self.run_gate(gate, &mut ctx).await?;

            let failed = ctx.result.errors.len() > errors_before;
            if failed && gate.policy() == FailurePolicy::Terminal {
                break;
            }
        }

        if ctx.result.valid {
            info!(
                "[VALIDATE] {} {:?} {} lots {} accepted ({} warnings)",
                trade.user_id,
                trade.direction,
                trade.lot_size,
                trade.symbol,
                ctx.result.warnings.len()
            );
        } else {
            warn!(
                "[VALIDATE] {} {:?} {} lots {} rejected: {}",
                trade.user_id,
                trade.direction,
                trade.lot_size,
                trade.symbol,
                ctx.result.errors.join("; ")
            );
        }

        Ok(ctx.result)
    }

    async fn run_gate(&self, gate: Gate, ctx: &mut GateContext<'_>) -> Result<()> {
        match gate {
            Gate::Session => self.gate_session(ctx).await,
            Gate::Regime => self.gate_regime(ctx).await,
            Gate::Correlation => self.gate_correlation(ctx).await,
            Gate::Bounds => {
                Self::gate_bounds(ctx);
                Ok(())
            }
            Gate::StopDistance => {
                Self::gate_stop_distance(ctx);
                Ok(())
            }
            Gate::RiskPercent => {
                Self::gate_risk_percent(ctx);
                Ok(())
            }
            Gate::Capacity => {
                Self::gate_capacity(ctx);
                Ok(())
            }
            Gate::Advisory => self.gate_advisory(ctx).await,
            Gate::ExitConfig => {
                Self::gate_exit_config(ctx);
                Ok(())
            }
        }
    }

    async fn gate_session(&self, ctx: &mut GateContext<'_>) -> Result<()> {
        let Some(session_config) = &ctx.trade.session else {
            return Ok(());
        };

        let active = match ctx.market.session {
            Some(session) => session,
            None => self.market.active_session(Utc::now()).await?,
        };

        if !session_config.allows(active) {
            ctx.result.push_error(format!(
                "Trading {} is not allowed during the {:?} session",
                ctx.trade.symbol, active
            ));
        }
        Ok(())
    }

    async fn gate_regime(&self, ctx: &mut GateContext<'_>) -> Result<()> {
        let Some(regime_config) = &ctx.trade.regime else {
            return Ok(());
        };

        let assessment = self
            .regime
            .detect_regime(&ctx.trade.symbol, &regime_config.timeframe, &ctx.market)
            .await?;

        if assessment.confidence < regime_config.min_confidence {
            ctx.result.push_error(format!(
                "Regime detection confidence {} below required {}",
                assessment.confidence, regime_config.min_confidence
            ));
            return Ok(());
        }

        ctx.result.push_warning(format!(
            "Market regime {:?} (confidence {}), regime limits applied",
            assessment.regime, assessment.confidence
        ));
        ctx.profile = Some(regime_profile(assessment.regime));
        Ok(())
    }

    async fn gate_correlation(&self, ctx: &mut GateContext<'_>) -> Result<()> {
        let Some(filter) = &ctx.trade.correlation else {
            return Ok(());
        };

        let assessment = self
            .correlation
            .analyze_signal(&ctx.trade.symbol, &ctx.positions, filter)
            .await?;

        if assessment.should_skip {
            ctx.result.push_error(assessment.reason);
            return Ok(());
        }

        if assessment.recommended_action == CorrelationAction::ReduceSize {
            if let Some(limit) = assessment.adjusted_position_size {
                if ctx.trade.lot_size > limit {
                    ctx.result.push_warning(assessment.reason.clone());
                    ctx.result.suggest(TradeAdjustment {
                        lot_size: limit,
                        reason: "correlated exposure".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn gate_bounds(ctx: &mut GateContext<'_>) {
        let trade = ctx.trade;

        if trade.lot_size <= Decimal::ZERO {
            ctx.result
                .push_error(format!("Lot size must be positive, got {}", trade.lot_size));
        }
        if trade.entry_price <= Decimal::ZERO {
            ctx.result.push_error(format!(
                "Entry price must be positive, got {}",
                trade.entry_price
            ));
        }
        if trade.lot_size <= Decimal::ZERO || trade.entry_price <= Decimal::ZERO {
            return;
        }

        if trade.lot_size < ctx.symbol.min_lot {
            ctx.result.push_error(format!(
                "Lot size {} below symbol minimum {}",
                trade.lot_size, ctx.symbol.min_lot
            ));
        }
        if trade.lot_size > ctx.symbol.max_lot {
            ctx.result.push_error(format!(
                "Lot size {} above symbol maximum {}",
                trade.lot_size, ctx.symbol.max_lot
            ));
        }

        // User limit, tightened by the active regime
        let mut max_lot = ctx.params.max_lot_size;
        if let Some(profile) = &ctx.profile {
            max_lot = (max_lot * profile.position_size_multiplier).min(profile.max_position_size);
        }
        if trade.lot_size > max_lot {
            ctx.result.push_error(format!(
                "Lot size {} above permitted maximum {}",
                trade.lot_size, max_lot
            ));
            ctx.result.suggest(TradeAdjustment {
                lot_size: max_lot,
                reason: "maximum lot size".to_string(),
            });
        }

        if let Some(filter) = &trade.correlation {
            let limits = position_limits(&ctx.positions, filter);
            if let Some(limit) = limits.get(base_currency(&trade.symbol)) {
                if trade.lot_size > *limit {
                    ctx.result.push_error(format!(
                        "Lot size {} above the {} correlated-currency limit {}",
                        trade.lot_size,
                        base_currency(&trade.symbol),
                        limit
                    ));
                    ctx.result.suggest(TradeAdjustment {
                        lot_size: *limit,
                        reason: "correlated-currency limit".to_string(),
                    });
                }
            }
        }
    }

    fn gate_stop_distance(ctx: &mut GateContext<'_>) {
        let trade = ctx.trade;

        if trade.stop_loss <= Decimal::ZERO {
            ctx.result.push_error(format!(
                "Stop loss must be positive, got {}",
                trade.stop_loss
            ));
            return;
        }

        if !trade.stop_is_protective() {
            let side = match trade.direction {
                TradeDirection::Buy => "below",
                TradeDirection::Sell => "above",
            };
            ctx.result
                .push_error(format!("Stop loss must be {} entry price", side));
            return;
        }

        let stop_pips = ctx.symbol.price_to_pips(trade.stop_distance());
        if stop_pips < ctx.params.min_stop_loss_distance {
            ctx.result.push_error(format!(
                "Stop distance {} pips below minimum {} pips",
                stop_pips, ctx.params.min_stop_loss_distance
            ));
        }
    }

    fn gate_risk_percent(ctx: &mut GateContext<'_>) {
        let trade = ctx.trade;
        let balance = ctx.exposure.balance;
        let stop_pips = ctx.symbol.price_to_pips(trade.stop_distance());
        if balance <= Decimal::ZERO || stop_pips <= Decimal::ZERO {
            return;
        }

        let risk_amount = trade.lot_size * stop_pips * ctx.symbol.pip_value();
        let risk_percent = risk_amount / balance * Decimal::ONE_HUNDRED;
        if risk_percent <= ctx.params.max_risk_per_trade {
            return;
        }

        ctx.result.push_error(format!(
            "Trade risks {:.2}% of balance, above the {}% per-trade limit",
            risk_percent, ctx.params.max_risk_per_trade
        ));

        // Suggest the largest compliant size, through the same sizer the
        // caller would use
        let sized = match (&trade.dynamic_risk, trade.current_atr) {
            (Some(dynamic), Some(atr)) if atr > Decimal::ZERO => PositionSizer::atr_based(
                balance,
                ctx.params.max_risk_per_trade,
                atr,
                dynamic.atr_multiplier,
                &ctx.symbol,
                Some(dynamic),
                None,
            ),
            _ => PositionSizer::fixed_risk(
                balance,
                ctx.params.max_risk_per_trade,
                stop_pips,
                &ctx.symbol,
            ),
        };
        if let Ok(sized) = sized {
            ctx.result.suggest(TradeAdjustment {
                lot_size: sized.position_size,
                reason: "per-trade risk limit".to_string(),
            });
        }
    }

    fn gate_capacity(ctx: &mut GateContext<'_>) {
        if !allows_new_position(&ctx.exposure, ctx.params) {
            ctx.result
                .push_error("Account cannot open new positions under current risk limits");
        }

        if let Some(profile) = &ctx.profile {
            if ctx.exposure.risk_exposure_percent > profile.max_exposure_percent {
                ctx.result.push_error(format!(
                    "Exposure {:.2}% above the regime ceiling {}%",
                    ctx.exposure.risk_exposure_percent, profile.max_exposure_percent
                ));
            }
        }
    }

    async fn gate_advisory(&self, ctx: &mut GateContext<'_>) -> Result<()> {
        if !self
            .market
            .is_within_trading_hours(&ctx.trade.symbol, Utc::now())
            .await?
        {
            ctx.result.push_warning(format!(
                "{} is outside its regular trading hours",
                ctx.trade.symbol
            ));
        }

        let spread = match ctx.market.spread_pips {
            Some(spread) => spread,
            None => self.market.current_spread(&ctx.trade.symbol).await?,
        };
        if spread > self.config.spread_warning_pips {
            ctx.result.push_warning(format!(
                "Spread {} pips above the {}-pip warning threshold",
                spread, self.config.spread_warning_pips
            ));
        }
        Ok(())
    }

    fn gate_exit_config(ctx: &mut GateContext<'_>) {
        let report = ExitConfigValidator::validate_trade_exits(
            ctx.smart_exit,
            ctx.trade.partial_exit.as_ref(),
            Some((&ctx.symbol, &ctx.market)),
        );
        for error in report.errors {
            ctx.result.push_error(error);
        }
        for warning in report.warnings {
            ctx.result.push_warning(warning);
        }
    }
}
