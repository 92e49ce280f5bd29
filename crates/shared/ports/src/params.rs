use aegis_core::RiskParameters;
use async_trait::async_trait;

use crate::error::PortResult;

/// Durable storage for per-user risk parameters.
///
/// Implementations must serialize concurrent writers for the same user
/// (per-key locking or a transactional backend) so read-modify-write
/// updates are not lost. The bundled in-memory adapter does this through
/// DashMap's entry API; production deployments back this port with a
/// key-value or row store keyed by user id.
#[async_trait]
pub trait RiskParameterStore: Send + Sync {
    /// Stored parameters for a user, if any were ever set
    async fn get(&self, user_id: &str) -> PortResult<Option<RiskParameters>>;

    /// Insert or replace the parameters for a user
    async fn put(&self, user_id: &str, params: RiskParameters) -> PortResult<()>;
}
