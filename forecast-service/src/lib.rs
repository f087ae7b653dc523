//! Cash & Payroll Forecasting Service
//!
//! Read-only, fault-tolerant forecasting over the ledger store:
//! - Weekly incoming-cash projection blending open invoices, AR aging
//!   recovery, and historical receipt velocity
//! - Exact invoice-driven projection with late-payment cure and
//!   already-paid netting
//! - Customer-level payroll allocation across direct labor, contractors,
//!   and allocated corporate salaries with an explicit unallocated bucket
//!
//! Missing source tables degrade the affected component to a neutral value
//! with a note in the result; genuine database failures abort the call.

pub mod aging;
pub mod config;
pub mod envelope;
pub mod error;
pub mod invoices;
pub mod models;
pub mod payroll;
pub mod service;
pub mod validate;
pub mod velocity;

pub use config::*;
pub use envelope::*;
pub use error::*;
pub use models::*;
pub use service::*;
