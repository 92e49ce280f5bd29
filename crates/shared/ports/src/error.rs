use thiserror::Error;

/// Failures crossing a port boundary.
///
/// These are transport/dependency failures, not business-rule outcomes:
/// a rejected trade is data, a broker that cannot be reached is a
/// `PortError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Unknown symbol: {0}")]
    SymbolNotFound(String),

    #[error("Unknown account: {0}")]
    AccountNotFound(String),

    #[error("Broker rejected close of ticket {ticket}: {reason}")]
    CloseRejected { ticket: u64, reason: String },

    #[error("Call timed out: {0}")]
    Timeout(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

pub type PortResult<T> = std::result::Result<T, PortError>;
