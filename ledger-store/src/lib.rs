//! Read-only data access for the cash and payroll forecasting engine
//!
//! Provides:
//! - A pooled PostgreSQL connection wrapper (`LedgerPool`)
//! - Typed row structs for every ledger table shape, parsed at the boundary
//! - The `LedgerReader` trait the forecasting service is written against
//! - A timed query gateway: every read is wrapped in a wall-clock timeout
//!   and driver errors are classified (table-missing vs. everything else)

pub mod connection;
pub mod error;
pub mod models;
pub mod query;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use query::*;
