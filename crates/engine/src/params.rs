//! Per-user risk parameter management.
//!
//! `ParameterService` fronts a `RiskParameterStore` with lazy defaults:
//! the first read for a user yields `RiskParameters::default()` without
//! writing it back, and every write is validated before it reaches the
//! store. Parameters are never deleted.

use crate::error::{Result, RiskError};
use aegis_core::RiskParameters;
use aegis_ports::{PortResult, RiskParameterStore};
use async_trait::async_trait;
use dashmap::DashMap;
use log::info;
use std::sync::Arc;

/// Store-backed parameter service with lazy defaults
pub struct ParameterService {
    store: Arc<dyn RiskParameterStore>,
}

impl ParameterService {
    pub fn new(store: Arc<dyn RiskParameterStore>) -> Self {
        Self { store }
    }

    /// Effective parameters for a user. Users that never configured
    /// anything get the defaults.
    pub async fn get(&self, user_id: &str) -> Result<RiskParameters> {
        Ok(self.store.get(user_id).await?.unwrap_or_default())
    }

    /// Replace a user's parameters. Rejects invalid limits before the
    /// store sees them.
    pub async fn set(&self, user_id: &str, params: RiskParameters) -> Result<()> {
        if let Err(reason) = params.validate() {
            return Err(RiskError::InvalidInput(reason));
        }
        self.store.put(user_id, params.clone()).await?;
        info!(
            "[RISK] Parameters updated for {}: risk/trade {}%, daily loss {}%, drawdown {}%, max positions {}",
            user_id,
            params.max_risk_per_trade,
            params.max_daily_loss,
            params.max_drawdown,
            params.max_positions
        );
        Ok(())
    }
}

/// DashMap-backed parameter store for tests and simulation.
///
/// The entry API serializes concurrent writers per user id.
#[derive(Default)]
pub struct InMemoryParameterStore {
    entries: DashMap<String, RiskParameters>,
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RiskParameterStore for InMemoryParameterStore {
    async fn get(&self, user_id: &str) -> PortResult<Option<RiskParameters>> {
        Ok(self.entries.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, user_id: &str, params: RiskParameters) -> PortResult<()> {
        self.entries.insert(user_id.to_string(), params);
        Ok(())
    }
}
