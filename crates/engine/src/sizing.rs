//! Position sizing.
//!
//! Pure numeric conversion from risk tolerance + market distance to a
//! tradable lot size. Every method funnels through the same
//! normalization step (floor to lot step, clamp to broker bounds) and
//! returns a `PositionSizingResult` with advisory warnings; malformed
//! inputs fail with `InvalidInput` before any computation.

use crate::error::{Result, RiskError};
use aegis_core::{
    DynamicRiskConfig, PositionSizingConfig, PositionSizingResult, SessionConfig, SymbolInfo,
    TradeDirection, TradingSession,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Allowed range for the ATR stop multiplier
const ATR_MULTIPLIER_MIN: Decimal = dec!(1);
const ATR_MULTIPLIER_MAX: Decimal = dec!(3);

/// Size reduction applied in high-volatility conditions
const HIGH_VOLATILITY_REDUCTION: Decimal = dec!(0.75);

/// Full-Kelly fraction above which the result is flagged as aggressive
const KELLY_AGGRESSIVE_FRACTION: Decimal = dec!(0.25);

/// Position sizer. Stateless - all inputs arrive per call.
pub struct PositionSizer;

impl PositionSizer {
    /// Fixed-risk-percent sizing against a pip-distance stop.
    ///
    /// `risk_amount = balance * risk_percent / 100`,
    /// `lots = risk_amount / (stop_loss_pips * pip_value)`.
    pub fn fixed_risk(
        balance: Decimal,
        risk_percent: Decimal,
        stop_loss_pips: Decimal,
        symbol: &SymbolInfo,
    ) -> Result<PositionSizingResult> {
        Self::check_balance(balance)?;
        Self::check_percent("risk_percent", risk_percent)?;
        if stop_loss_pips <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "stop_loss_pips must be positive, got {}",
                stop_loss_pips
            )));
        }
        let pip_value = symbol.pip_value();
        if pip_value <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "symbol {} has a non-positive pip value",
                symbol.symbol
            )));
        }

        let risk_amount = balance * risk_percent / Decimal::ONE_HUNDRED;
        let raw = risk_amount / (stop_loss_pips * pip_value);

        let mut warnings = Vec::new();
        let lots = Self::normalize(raw, symbol, &mut warnings);
        let actual_risk = lots * stop_loss_pips * pip_value;

        Ok(PositionSizingResult {
            position_size: lots,
            risk_amount: actual_risk,
            risk_percentage: actual_risk / balance * Decimal::ONE_HUNDRED,
            stop_loss_price: None,
            confidence: dec!(0.90),
            warnings,
        })
    }

    /// ATR-based sizing: the stop distance is `atr * atr_multiplier`
    /// (multiplier clamped to [1, 3]).
    ///
    /// Applies the high-volatility reduction when dynamic risk is
    /// configured and the session aggressiveness multiplier when a
    /// session filter is active.
    pub fn atr_based(
        balance: Decimal,
        risk_percent: Decimal,
        atr: Decimal,
        atr_multiplier: Decimal,
        symbol: &SymbolInfo,
        dynamic_risk: Option<&DynamicRiskConfig>,
        session: Option<(&SessionConfig, TradingSession)>,
    ) -> Result<PositionSizingResult> {
        Self::check_balance(balance)?;
        Self::check_percent("risk_percent", risk_percent)?;
        if atr <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "atr must be positive, got {}",
                atr
            )));
        }

        let mut warnings = Vec::new();
        let multiplier = if atr_multiplier < ATR_MULTIPLIER_MIN {
            warnings.push(format!(
                "ATR multiplier {} below {}, clamped",
                atr_multiplier, ATR_MULTIPLIER_MIN
            ));
            ATR_MULTIPLIER_MIN
        } else if atr_multiplier > ATR_MULTIPLIER_MAX {
            warnings.push(format!(
                "ATR multiplier {} above {}, clamped",
                atr_multiplier, ATR_MULTIPLIER_MAX
            ));
            ATR_MULTIPLIER_MAX
        } else {
            atr_multiplier
        };

        let risk_amount = balance * risk_percent / Decimal::ONE_HUNDRED;
        let stop_distance = atr * multiplier;
        let mut raw = risk_amount / (stop_distance * symbol.contract_size);

        if let Some(config) = dynamic_risk {
            if config.reduce_in_high_volatility && atr > config.high_volatility_threshold {
                raw *= HIGH_VOLATILITY_REDUCTION;
                warnings.push(format!(
                    "High volatility (ATR {} > {}), size reduced to {}x",
                    atr, config.high_volatility_threshold, HIGH_VOLATILITY_REDUCTION
                ));
            }
        }

        if let Some((config, active)) = session {
            raw *= config.multiplier(active);
        }

        let lots = Self::normalize(raw, symbol, &mut warnings);
        let actual_risk = lots * stop_distance * symbol.contract_size;

        Ok(PositionSizingResult {
            position_size: lots,
            risk_amount: actual_risk,
            risk_percentage: actual_risk / balance * Decimal::ONE_HUNDRED,
            stop_loss_price: None,
            confidence: dec!(0.85),
            warnings,
        })
    }

    /// Kelly-criterion sizing from historical win rate and payoff ratio.
    ///
    /// `f = W - (1 - W) / R`. A non-positive edge sizes to zero; the
    /// half-Kelly fraction is traded, with a warning once the full
    /// fraction turns aggressive.
    pub fn kelly(
        balance: Decimal,
        win_rate: Decimal,
        payoff_ratio: Decimal,
        stop_loss_pips: Decimal,
        symbol: &SymbolInfo,
    ) -> Result<PositionSizingResult> {
        Self::check_balance(balance)?;
        if win_rate <= Decimal::ZERO || win_rate >= Decimal::ONE {
            return Err(RiskError::InvalidInput(format!(
                "win_rate must be in (0, 1), got {}",
                win_rate
            )));
        }
        if payoff_ratio <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "payoff_ratio must be positive, got {}",
                payoff_ratio
            )));
        }
        if stop_loss_pips <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "stop_loss_pips must be positive, got {}",
                stop_loss_pips
            )));
        }

        let kelly = win_rate - (Decimal::ONE - win_rate) / payoff_ratio;
        if kelly <= Decimal::ZERO {
            return Ok(PositionSizingResult {
                position_size: Decimal::ZERO,
                risk_amount: Decimal::ZERO,
                risk_percentage: Decimal::ZERO,
                stop_loss_price: None,
                confidence: dec!(0.30),
                warnings: vec![format!(
                    "Kelly fraction {} is non-positive; the edge does not support a position",
                    kelly
                )],
            });
        }

        let mut warnings = Vec::new();
        if kelly > KELLY_AGGRESSIVE_FRACTION {
            warnings.push(format!(
                "Kelly fraction {} is aggressive (> {}), trading half-Kelly",
                kelly, KELLY_AGGRESSIVE_FRACTION
            ));
        }

        // Half-Kelly for variance control
        let risk_amount = balance * kelly / dec!(2);
        let raw = risk_amount / (stop_loss_pips * symbol.pip_value());
        let lots = Self::normalize(raw, symbol, &mut warnings);
        let actual_risk = lots * stop_loss_pips * symbol.pip_value();

        Ok(PositionSizingResult {
            position_size: lots,
            risk_amount: actual_risk,
            risk_percentage: actual_risk / balance * Decimal::ONE_HUNDRED,
            stop_loss_price: None,
            confidence: dec!(0.70),
            warnings,
        })
    }

    /// Volatility-based sizing: risk budget spread over the recent
    /// volatility (price units), so size shrinks as volatility grows.
    pub fn volatility_based(
        balance: Decimal,
        risk_percent: Decimal,
        volatility: Decimal,
        symbol: &SymbolInfo,
    ) -> Result<PositionSizingResult> {
        Self::check_balance(balance)?;
        Self::check_percent("risk_percent", risk_percent)?;
        if volatility <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "volatility must be positive, got {}",
                volatility
            )));
        }

        let risk_amount = balance * risk_percent / Decimal::ONE_HUNDRED;
        let raw = risk_amount / (volatility * symbol.contract_size);

        let mut warnings = Vec::new();
        let lots = Self::normalize(raw, symbol, &mut warnings);
        let actual_risk = lots * volatility * symbol.contract_size;

        Ok(PositionSizingResult {
            position_size: lots,
            risk_amount: actual_risk,
            risk_percentage: actual_risk / balance * Decimal::ONE_HUNDRED,
            stop_loss_price: None,
            confidence: dec!(0.75),
            warnings,
        })
    }

    /// Account-equity sizing: allocate a percent of equity as notional
    /// at the intended entry price.
    pub fn account_equity(
        equity: Decimal,
        equity_percent: Decimal,
        entry_price: Decimal,
        symbol: &SymbolInfo,
    ) -> Result<PositionSizingResult> {
        if equity <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "equity must be positive, got {}",
                equity
            )));
        }
        Self::check_percent("equity_percent", equity_percent)?;
        if entry_price <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "entry_price must be positive, got {}",
                entry_price
            )));
        }

        let notional = equity * equity_percent / Decimal::ONE_HUNDRED;
        let raw = notional / (symbol.contract_size * entry_price);

        let mut warnings = Vec::new();
        let lots = Self::normalize(raw, symbol, &mut warnings);

        Ok(PositionSizingResult {
            position_size: lots,
            risk_amount: notional,
            risk_percentage: equity_percent,
            stop_loss_price: None,
            confidence: dec!(0.80),
            warnings,
        })
    }

    /// Fixed-lot sizing: normalize the requested lot count to the
    /// symbol's step and bounds, nothing else.
    pub fn fixed_lot(lots: Decimal, symbol: &SymbolInfo) -> Result<PositionSizingResult> {
        if lots <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "lots must be positive, got {}",
                lots
            )));
        }

        let mut warnings = Vec::new();
        let normalized = Self::normalize(lots, symbol, &mut warnings);

        Ok(PositionSizingResult {
            position_size: normalized,
            risk_amount: Decimal::ZERO,
            risk_percentage: Decimal::ZERO,
            stop_loss_price: None,
            confidence: dec!(0.60),
            warnings,
        })
    }

    /// ATR-derived stop-loss price: `entry ∓ atr * multiplier`
    /// (minus for Buy, plus for Sell).
    pub fn atr_stop_loss(
        entry_price: Decimal,
        atr: Decimal,
        atr_multiplier: Decimal,
        direction: TradeDirection,
    ) -> Result<Decimal> {
        if entry_price <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "entry_price must be positive, got {}",
                entry_price
            )));
        }
        if atr <= Decimal::ZERO || atr_multiplier <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(
                "atr and atr_multiplier must be positive".to_string(),
            ));
        }

        let distance = atr * atr_multiplier;
        Ok(match direction {
            TradeDirection::Buy => entry_price - distance,
            TradeDirection::Sell => entry_price + distance,
        })
    }

    /// Dispatch on a tagged sizing configuration.
    pub fn size_for(
        config: &PositionSizingConfig,
        balance: Decimal,
        symbol: &SymbolInfo,
    ) -> Result<PositionSizingResult> {
        match config {
            PositionSizingConfig::FixedRisk {
                risk_percent,
                stop_loss_pips,
            } => Self::fixed_risk(balance, *risk_percent, *stop_loss_pips, symbol),
            PositionSizingConfig::AtrBased {
                risk_percent,
                atr,
                atr_multiplier,
            } => Self::atr_based(balance, *risk_percent, *atr, *atr_multiplier, symbol, None, None),
            PositionSizingConfig::Kelly {
                win_rate,
                payoff_ratio,
                stop_loss_pips,
            } => Self::kelly(balance, *win_rate, *payoff_ratio, *stop_loss_pips, symbol),
            PositionSizingConfig::VolatilityBased {
                risk_percent,
                volatility,
            } => Self::volatility_based(balance, *risk_percent, *volatility, symbol),
            PositionSizingConfig::AccountEquity {
                equity_percent,
                entry_price,
            } => Self::account_equity(balance, *equity_percent, *entry_price, symbol),
            PositionSizingConfig::FixedLot { lots } => Self::fixed_lot(*lots, symbol),
        }
    }

    /// Floor to the symbol's lot step, then clamp to its bounds.
    ///
    /// Flooring keeps the realized risk at or below the requested risk;
    /// the minimum-lot clamp is the one case where the result can risk
    /// more than asked, and it warns.
    fn normalize(raw: Decimal, symbol: &SymbolInfo, warnings: &mut Vec<String>) -> Decimal {
        let mut lots = raw;
        if symbol.lot_step > Decimal::ZERO {
            lots = (lots / symbol.lot_step).floor() * symbol.lot_step;
        }
        if lots < symbol.min_lot {
            warnings.push(format!(
                "Computed size {} below minimum lot {}, clamped up",
                lots, symbol.min_lot
            ));
            lots = symbol.min_lot;
        } else if lots > symbol.max_lot {
            warnings.push(format!(
                "Computed size {} above maximum lot {}, clamped down",
                lots, symbol.max_lot
            ));
            lots = symbol.max_lot;
        }
        lots.normalize()
    }

    fn check_balance(balance: Decimal) -> Result<()> {
        if balance <= Decimal::ZERO {
            return Err(RiskError::InvalidInput(format!(
                "balance must be positive, got {}",
                balance
            )));
        }
        Ok(())
    }

    fn check_percent(name: &str, value: Decimal) -> Result<()> {
        if value <= Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(RiskError::InvalidInput(format!(
                "{} must be in (0, 100], got {}",
                name, value
            )));
        }
        Ok(())
    }
}
