//! Aegis Ports
//!
//! Port definitions (traits) for the Aegis risk engine.
//! These define the boundaries between domain logic and infrastructure:
//! the engine depends only on these abstractions and stays unit-testable
//! without a broker, database, or market feed behind it.

mod account;
mod analysis;
mod broker;
mod error;
mod market;
mod params;

pub use account::{AccountInfoProvider, PositionStore};
pub use analysis::{CorrelationAnalyzer, RegimeDetector};
pub use broker::BrokerExecutionClient;
pub use error::{PortError, PortResult};
pub use market::{MarketDataProvider, SymbolInfoProvider};
pub use params::RiskParameterStore;
