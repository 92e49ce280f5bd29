//! Engine error taxonomy.
//!
//! Business-rule failures are data (`ValidationResult.errors`,
//! `RiskViolation`s), never errors. Errors are reserved for malformed
//! sizing inputs, failing dependencies, and partially-failed emergency
//! closes - the cases that need caller or operator action.

use crate::emergency::EmergencyCloseReport;
use aegis_ports::PortError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    /// Malformed primitive argument to a sizing function; rejected
    /// synchronously with no partial computation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A broker/account/analyzer call failed. Propagated, never folded
    /// into validation errors.
    #[error("Dependency failure: {0}")]
    Dependency(#[from] PortError),

    /// One or more closes failed during an emergency liquidation. The
    /// successful closes are not rolled back; the report carries every
    /// per-ticket outcome.
    #[error(
        "Emergency close finished with {failed} of {attempted} closes failed (tickets: {tickets})",
        failed = .report.failures.len(),
        attempted = .report.attempted,
        tickets = .report.failed_tickets()
    )]
    PartialClose { report: EmergencyCloseReport },
}

pub type Result<T> = std::result::Result<T, RiskError>;
