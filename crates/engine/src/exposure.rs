//! Account risk exposure monitoring.
//!
//! Builds a `RiskExposure` snapshot from the account and its open
//! positions (fetched in parallel) and checks it against the user's
//! limits. Exposure is the sum of absolute floating P&L, a proxy for
//! at-risk capital rather than distance-to-stop exposure.

use crate::error::Result;
use aegis_core::{
    AccountInfo, Position, RiskExposure, RiskParameters, RiskViolation, ViolationKind,
    ViolationSeverity,
};
use aegis_ports::{AccountInfoProvider, PositionStore};
use chrono::Utc;
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct ExposureMonitor {
    accounts: Arc<dyn AccountInfoProvider>,
    positions: Arc<dyn PositionStore>,

    /// Overshoot factor at which a Critical violation becomes Emergency
    escalation_factor: Decimal,
}

impl ExposureMonitor {
    pub fn new(
        accounts: Arc<dyn AccountInfoProvider>,
        positions: Arc<dyn PositionStore>,
        escalation_factor: Decimal,
    ) -> Self {
        Self {
            accounts,
            positions,
            escalation_factor,
        }
    }

    /// Current exposure snapshot with any limit violations attached
    pub async fn risk_exposure(
        &self,
        user_id: &str,
        params: &RiskParameters,
    ) -> Result<RiskExposure> {
        let (account, positions) = tokio::join!(
            self.accounts.account_info(user_id),
            self.positions.open_positions(user_id)
        );
        let account = account?;
        let positions = positions?;

        let exposure = self.assemble(&account, &positions, params);
        for violation in &exposure.violations {
            warn!(
                "[RISK] {} violation for {}: {} (severity {:?})",
                violation_tag(violation.kind),
                user_id,
                violation.message,
                violation.severity
            );
        }
        Ok(exposure)
    }

    /// Whether a new position may be opened right now
    pub async fn can_open_position(
        &self,
        user_id: &str,
        params: &RiskParameters,
    ) -> Result<bool> {
        let exposure = self.risk_exposure(user_id, params).await?;
        Ok(allows_new_position(&exposure, params))
    }

    fn assemble(
        &self,
        account: &AccountInfo,
        positions: &[Position],
        params: &RiskParameters,
    ) -> RiskExposure {
        let today = Utc::now().date_naive();

        let total_risk_exposure: Decimal =
            positions.iter().map(|p| p.profit.abs()).sum();
        let daily_loss: Decimal = positions
            .iter()
            .filter(|p| p.opened_on(today))
            .map(|p| p.loss())
            .sum();

        let drawdown = account.drawdown();
        let percent_of_balance = |value: Decimal| {
            if account.balance > Decimal::ZERO {
                value / account.balance * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            }
        };
        let risk_exposure_percent = percent_of_balance(total_risk_exposure);
        let daily_loss_percent = percent_of_balance(daily_loss);
        let drawdown_percent = percent_of_balance(drawdown);

        let mut violations = Vec::new();

        if daily_loss_percent > params.max_daily_loss {
            violations.push(RiskViolation {
                kind: ViolationKind::MaxDailyLoss,
                current_value: daily_loss_percent,
                limit: params.max_daily_loss,
                severity: self.escalate(daily_loss_percent, params.max_daily_loss),
                message: format!(
                    "Daily loss {:.2}% exceeds limit {}%",
                    daily_loss_percent, params.max_daily_loss
                ),
            });
        }

        if drawdown_percent > params.max_drawdown {
            violations.push(RiskViolation {
                kind: ViolationKind::MaxDrawdown,
                current_value: drawdown_percent,
                limit: params.max_drawdown,
                severity: self.escalate(drawdown_percent, params.max_drawdown),
                message: format!(
                    "Drawdown {:.2}% exceeds limit {}%",
                    drawdown_percent, params.max_drawdown
                ),
            });
        }

        let open_positions = positions.len() as u32;
        if open_positions >= params.max_positions {
            violations.push(RiskViolation {
                kind: ViolationKind::MaxPositions,
                current_value: Decimal::from(open_positions),
                limit: Decimal::from(params.max_positions),
                severity: ViolationSeverity::Warning,
                message: format!(
                    "{} of {} position slots in use",
                    open_positions, params.max_positions
                ),
            });
        }

        // Budget: every slot at full per-trade risk
        let exposure_budget =
            params.max_risk_per_trade * Decimal::from(params.max_positions);
        if risk_exposure_percent > exposure_budget {
            violations.push(RiskViolation {
                kind: ViolationKind::MaxRiskExposure,
                current_value: risk_exposure_percent,
                limit: exposure_budget,
                severity: ViolationSeverity::Warning,
                message: format!(
                    "Floating exposure {:.2}% exceeds budget {}%",
                    risk_exposure_percent, exposure_budget
                ),
            });
        }

        if account.leverage > params.max_leverage {
            violations.push(RiskViolation {
                kind: ViolationKind::MaxLeverage,
                current_value: Decimal::from(account.leverage),
                limit: Decimal::from(params.max_leverage),
                severity: ViolationSeverity::Critical,
                message: format!(
                    "Account leverage 1:{} exceeds permitted 1:{}",
                    account.leverage, params.max_leverage
                ),
            });
        }

        RiskExposure {
            balance: account.balance,
            total_risk_exposure,
            risk_exposure_percent,
            open_positions,
            daily_loss,
            daily_loss_percent,
            current_drawdown: drawdown,
            drawdown_percent,
            available_margin: account.free_margin,
            limits_exceeded: false,
            violations: Vec::new(),
        }
        .with_violations(violations)
    }

    fn escalate(&self, value: Decimal, limit: Decimal) -> ViolationSeverity {
        if value > limit * self.escalation_factor {
            ViolationSeverity::Emergency
        } else {
            ViolationSeverity::Critical
        }
    }
}

/// Pure admission check against a snapshot already in hand.
///
/// Any recorded violation blocks, whatever its severity.
pub fn allows_new_position(exposure: &RiskExposure, params: &RiskParameters) -> bool {
    exposure.violations.is_empty()
        && exposure.open_positions < params.max_positions
        && exposure.daily_loss_percent < params.max_daily_loss
        && exposure.drawdown_percent < params.max_drawdown
        && exposure.available_margin > Decimal::ZERO
}

fn violation_tag(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::MaxDailyLoss => "MAX_DAILY_LOSS",
        ViolationKind::MaxDrawdown => "MAX_DRAWDOWN",
        ViolationKind::MaxPositions => "MAX_POSITIONS",
        ViolationKind::MaxRiskExposure => "MAX_RISK_EXPOSURE",
        ViolationKind::MaxLeverage => "MAX_LEVERAGE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::TradeDirection;
    use aegis_ports::PortResult;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    struct FixedAccount(AccountInfo);

    #[async_trait]
    impl AccountInfoProvider for FixedAccount {
        async fn account_info(&self, _user_id: &str) -> PortResult<AccountInfo> {
            Ok(self.0.clone())
        }
    }

    struct FixedPositions(Vec<Position>);

    #[async_trait]
    impl PositionStore for FixedPositions {
        async fn open_positions(&self, _user_id: &str) -> PortResult<Vec<Position>> {
            Ok(self.0.clone())
        }
    }

    fn account(balance: Decimal, equity: Decimal) -> AccountInfo {
        AccountInfo {
            balance,
            equity,
            margin: Decimal::ZERO,
            free_margin: equity,
            leverage: 100,
            currency: "USD".to_string(),
        }
    }

    fn position(ticket: u64, profit: Decimal, opened_today: bool) -> Position {
        let open_time = if opened_today {
            Utc::now()
        } else {
            Utc::now() - Duration::days(2)
        };
        Position {
            ticket,
            symbol: "EURUSD".to_string(),
            direction: TradeDirection::Buy,
            lot_size: dec!(1),
            open_price: dec!(1.1000),
            current_price: dec!(1.1000),
            profit,
            swap: Decimal::ZERO,
            open_time,
        }
    }

    fn monitor(account_info: AccountInfo, positions: Vec<Position>) -> ExposureMonitor {
        ExposureMonitor::new(
            Arc::new(FixedAccount(account_info)),
            Arc::new(FixedPositions(positions)),
            dec!(1.5),
        )
    }

    #[tokio::test]
    async fn test_clean_account_has_no_violations() {
        let monitor = monitor(account(dec!(10000), dec!(10000)), vec![]);
        let exposure = monitor
            .risk_exposure("alice", &RiskParameters::default())
            .await
            .unwrap();

        assert!(!exposure.limits_exceeded);
        assert!(exposure.violations.is_empty());
        assert_eq!(exposure.open_positions, 0);
    }

    #[tokio::test]
    async fn test_drawdown_25_percent_is_critical() {
        // balance 10000, equity 7500: drawdown 2500 = 25% > 20% limit,
        // but below the 30% escalation point
        let monitor = monitor(account(dec!(10000), dec!(7500)), vec![]);
        let exposure = monitor
            .risk_exposure("alice", &RiskParameters::default())
            .await
            .unwrap();

        assert_eq!(exposure.current_drawdown, dec!(2500));
        assert_eq!(exposure.drawdown_percent, dec!(25));
        assert!(exposure.limits_exceeded);

        let violation = exposure
            .violations
            .iter()
            .find(|v| v.kind == ViolationKind::MaxDrawdown)
            .unwrap();
        assert_eq!(violation.severity, ViolationSeverity::Critical);
    }

    #[tokio::test]
    async fn test_deep_drawdown_escalates_to_emergency() {
        // drawdown 35% > 1.5 * 20%
        let monitor = monitor(account(dec!(10000), dec!(6500)), vec![]);
        let exposure = monitor
            .risk_exposure("alice", &RiskParameters::default())
            .await
            .unwrap();

        let violation = exposure
            .violations
            .iter()
            .find(|v| v.kind == ViolationKind::MaxDrawdown)
            .unwrap();
        assert_eq!(violation.severity, ViolationSeverity::Emergency);
    }

    #[tokio::test]
    async fn test_daily_loss_counts_only_today() {
        // -700 today (7% > 6% limit), -900 from two days ago ignored
        let positions = vec![
            position(1, dec!(-700), true),
            position(2, dec!(-900), false),
        ];
        let monitor = monitor(account(dec!(10000), dec!(10000)), positions);
        let exposure = monitor
            .risk_exposure("alice", &RiskParameters::default())
            .await
            .unwrap();

        assert_eq!(exposure.daily_loss, dec!(700));
        assert!(
            exposure
                .violations
                .iter()
                .any(|v| v.kind == ViolationKind::MaxDailyLoss)
        );
        // Both positions still count toward floating exposure
        assert_eq!(exposure.total_risk_exposure, dec!(1600));
    }

    #[tokio::test]
    async fn test_position_cap_is_warning_and_blocks_admission() {
        let positions: Vec<Position> =
            (0..5).map(|i| position(i, dec!(10), true)).collect();
        let monitor = monitor(account(dec!(10000), dec!(10000)), positions);
        let params = RiskParameters::default();

        let exposure = monitor.risk_exposure("alice", &params).await.unwrap();
        let violation = exposure
            .violations
            .iter()
            .find(|v| v.kind == ViolationKind::MaxPositions)
            .unwrap();
        assert_eq!(violation.severity, ViolationSeverity::Warning);

        assert!(!allows_new_position(&exposure, &params));
        assert!(!monitor.can_open_position("alice", &params).await.unwrap());
    }

    #[tokio::test]
    async fn test_exposure_budget_warning_blocks_admission() {
        // One position 15% in profit: floating exposure 15% exceeds the
        // 2% x 5 = 10% budget. Warning severity, but still no new trades.
        let monitor = monitor(
            account(dec!(10000), dec!(11500)),
            vec![position(1, dec!(1500), true)],
        );
        let params = RiskParameters::default();

        let exposure = monitor.risk_exposure("alice", &params).await.unwrap();
        let violation = exposure
            .violations
            .iter()
            .find(|v| v.kind == ViolationKind::MaxRiskExposure)
            .unwrap();
        assert_eq!(violation.severity, ViolationSeverity::Warning);

        assert!(!allows_new_position(&exposure, &params));
        assert!(!monitor.can_open_position("alice", &params).await.unwrap());
    }

    #[tokio::test]
    async fn test_excess_leverage_is_critical() {
        let mut info = account(dec!(10000), dec!(10000));
        info.leverage = 500;
        let monitor = monitor(info, vec![]);
        let params = RiskParameters::default();

        let exposure = monitor.risk_exposure("alice", &params).await.unwrap();
        let violation = exposure
            .violations
            .iter()
            .find(|v| v.kind == ViolationKind::MaxLeverage)
            .unwrap();
        assert_eq!(violation.severity, ViolationSeverity::Critical);
        assert!(!allows_new_position(&exposure, &params));
    }

    #[tokio::test]
    async fn test_healthy_account_can_open() {
        let monitor = monitor(
            account(dec!(10000), dec!(9900)),
            vec![position(1, dec!(-100), true)],
        );
        assert!(
            monitor
                .can_open_position("alice", &RiskParameters::default())
                .await
                .unwrap()
        );
    }
}
