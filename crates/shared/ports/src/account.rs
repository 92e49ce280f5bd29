use aegis_core::{AccountInfo, Position};
use async_trait::async_trait;

use crate::error::PortResult;

/// Read-only access to broker account state
#[async_trait]
pub trait AccountInfoProvider: Send + Sync {
    /// Current account snapshot for a user
    async fn account_info(&self, user_id: &str) -> PortResult<AccountInfo>;
}

/// Read-only access to the user's open positions
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// All currently open positions for a user
    async fn open_positions(&self, user_id: &str) -> PortResult<Vec<Position>>;
}
