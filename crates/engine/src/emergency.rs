//! Emergency liquidation.
//!
//! Closes every open position for a user, best-effort: closes fan out
//! through a semaphore-bounded worker pool with a per-call timeout, every
//! ticket gets exactly one recorded outcome, and nothing is rolled back.
//! A partially failed run surfaces as `RiskError::PartialClose` carrying
//! the full report, because the closes that did succeed are real fills.

use crate::config::EmergencyConfig;
use crate::error::{Result, RiskError};
use aegis_core::{Position, TradeResult};
use aegis_ports::{BrokerExecutionClient, PositionStore};
use log::{error, info};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// One close that did not go through
#[derive(Debug, Clone)]
pub struct CloseFailure {
    pub ticket: u64,
    pub reason: String,
}

/// Outcome of an emergency close run
#[derive(Debug, Clone, Default)]
pub struct EmergencyCloseReport {
    /// Positions the run set out to close
    pub attempted: usize,

    /// Successful closes as reported by the broker
    pub closed: Vec<TradeResult>,

    /// Closes that failed, timed out, or were never issued
    pub failures: Vec<CloseFailure>,

    /// Realized P&L summed over the successful closes
    pub total_pnl: Decimal,
}

impl EmergencyCloseReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Comma-separated failed tickets for log and error messages
    pub fn failed_tickets(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.ticket.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct EmergencyController {
    positions: Arc<dyn PositionStore>,
    broker: Arc<dyn BrokerExecutionClient>,
    config: EmergencyConfig,
}

impl EmergencyController {
    pub fn new(
        positions: Arc<dyn PositionStore>,
        broker: Arc<dyn BrokerExecutionClient>,
        config: EmergencyConfig,
    ) -> Self {
        Self {
            positions,
            broker,
            config,
        }
    }

    /// Close every open position for the user
    pub async fn close_all(&self, user_id: &str, reason: &str) -> Result<EmergencyCloseReport> {
        self.close_all_with_deadline(user_id, reason, None).await
    }

    /// Close every open position, refusing to issue new closes past the
    /// deadline. In-flight closes still run to completion; positions
    /// whose close was never issued are recorded as failures.
    pub async fn close_all_with_deadline(
        &self,
        user_id: &str,
        reason: &str,
        deadline: Option<Instant>,
    ) -> Result<EmergencyCloseReport> {
        let positions = self.positions.open_positions(user_id).await?;

        if positions.is_empty() {
            info!(
                "[EMERGENCY] Close-all for {} ({}): no open positions",
                user_id, reason
            );
            return Ok(EmergencyCloseReport::default());
        }

        info!(
            "[EMERGENCY] Close-all for {} ({}): closing {} positions, {} in flight max",
            user_id,
            reason,
            positions.len(),
            self.config.max_in_flight
        );

        let attempted = positions.len();
        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut tasks: JoinSet<std::result::Result<TradeResult, CloseFailure>> = JoinSet::new();

        // Task id -> ticket, so even a lost task names its position
        let mut task_tickets = HashMap::new();
        for position in positions {
            let ticket = position.ticket;
            let handle = tasks.spawn(Self::close_one(
                Arc::clone(&self.broker),
                Arc::clone(&semaphore),
                position,
                self.config.close_timeout,
                deadline,
            ));
            task_tickets.insert(handle.id(), ticket);
        }

        let mut report = EmergencyCloseReport {
            attempted,
            ..Default::default()
        };
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(result)) => {
                    report.total_pnl += result.profit;
                    report.closed.push(result);
                }
                Ok(Err(failure)) => report.failures.push(failure),
                Err(join_error) => report.failures.push(CloseFailure {
                    ticket: task_tickets.get(&join_error.id()).copied().unwrap_or(0),
                    reason: format!("close task failed: {}", join_error),
                }),
            }
        }

        info!(
            "[EMERGENCY] Close-all for {} finished: {}/{} closed, realized P&L {}",
            user_id,
            report.closed.len(),
            report.attempted,
            report.total_pnl
        );

        if report.is_complete() {
            Ok(report)
        } else {
            error!(
                "[EMERGENCY] {} of {} closes FAILED for {} (tickets: {}); manual intervention required",
                report.failures.len(),
                report.attempted,
                user_id,
                report.failed_tickets()
            );
            Err(RiskError::PartialClose { report })
        }
    }

    async fn close_one(
        broker: Arc<dyn BrokerExecutionClient>,
        semaphore: Arc<Semaphore>,
        position: Position,
        close_timeout: std::time::Duration,
        deadline: Option<Instant>,
    ) -> std::result::Result<TradeResult, CloseFailure> {
        let ticket = position.ticket;
        let _permit = semaphore.acquire_owned().await.map_err(|_| CloseFailure {
            ticket,
            reason: "close pool shut down".to_string(),
        })?;

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(CloseFailure {
                    ticket,
                    reason: "deadline reached before close was issued".to_string(),
                });
            }
        }

        match tokio::time::timeout(
            close_timeout,
            broker.close_position(ticket, position.lot_size),
        )
        .await
        {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(port_error)) => Err(CloseFailure {
                ticket,
                reason: port_error.to_string(),
            }),
            Err(_) => Err(CloseFailure {
                ticket,
                reason: format!("close timed out after {:?}", close_timeout),
            }),
        }
    }
}
