use aegis_core::TradeResult;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::PortResult;

/// Order execution against the broker.
///
/// The risk engine only ever closes positions; opening them is the
/// order pipeline's job.
#[async_trait]
pub trait BrokerExecutionClient: Send + Sync {
    /// Close (part of) a position by ticket.
    ///
    /// `volume` is the lot size to close; pass the position's full size
    /// for a complete close.
    async fn close_position(&self, ticket: u64, volume: Decimal) -> PortResult<TradeResult>;
}
