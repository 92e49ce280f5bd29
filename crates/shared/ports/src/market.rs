use aegis_core::{MarketData, SymbolInfo, TradingSession};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::PortResult;

/// Instrument contract specifications
#[async_trait]
pub trait SymbolInfoProvider: Send + Sync {
    /// Contract specification for a symbol
    async fn symbol_info(&self, symbol: &str) -> PortResult<SymbolInfo>;
}

/// Live market context: ATR, volatility, spread, sessions, swing points
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current market snapshot for a symbol
    async fn market_data(&self, symbol: &str) -> PortResult<MarketData>;

    /// Current bid-ask spread in pips
    async fn current_spread(&self, symbol: &str) -> PortResult<Decimal>;

    /// Is the symbol inside its regular trading hours at the given time?
    async fn is_within_trading_hours(&self, symbol: &str, at: DateTime<Utc>) -> PortResult<bool>;

    /// Which trading session is active at the given time
    async fn active_session(&self, at: DateTime<Utc>) -> PortResult<TradingSession>;
}
