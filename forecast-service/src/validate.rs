// Argument validation: raw wire shapes into typed queries, before any I/O
use crate::error::{ForecastError, ForecastResult};
use crate::models::{IncomingCashArgs, InvoicePlanArgs, PayrollArgs};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Validated arguments for the weekly incoming-cash forecast.
#[derive(Debug, Clone, Copy)]
pub struct IncomingCashQuery {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub as_of: NaiveDate,
    pub use_invoices: bool,
}

/// Validated arguments for the invoice-driven projection.
#[derive(Debug, Clone, Copy)]
pub struct InvoicePlanQuery {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub as_of: NaiveDate,
    pub include_late: bool,
}

/// Validated arguments for the payroll rollup.
#[derive(Debug, Clone, Copy)]
pub struct PayrollQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub include_contractors: bool,
}

/// Check the `YYYY-MM-DD` shape, then parse to a real calendar date.
/// Shape and calendar validity fail the same way: `invalid_input` naming
/// the field.
fn parse_date(field: &str, raw: &str) -> ForecastResult<NaiveDate> {
    if !DATE_SHAPE.is_match(raw) {
        return Err(ForecastError::invalid_input(
            field,
            format!("{field} must match YYYY-MM-DD, got {raw:?}"),
        ));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ForecastError::invalid_input(field, format!("{field}: {raw:?} is not a calendar date"))
    })
}

fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
    default: NaiveDate,
) -> ForecastResult<NaiveDate> {
    match raw {
        Some(s) => parse_date(field, s),
        None => Ok(default),
    }
}

impl IncomingCashArgs {
    /// Ordering of `weekStart`/`weekEnd` is the caller's contract and is
    /// deliberately not enforced. Absent `asOfDate` defaults to `weekEnd`
    /// so repeated calls stay deterministic.
    pub fn validate(&self) -> ForecastResult<IncomingCashQuery> {
        let week_start = parse_date("weekStart", &self.week_start)?;
        let week_end = parse_date("weekEnd", &self.week_end)?;
        let as_of = parse_optional_date("asOfDate", self.as_of_date.as_deref(), week_end)?;
        Ok(IncomingCashQuery {
            week_start,
            week_end,
            as_of,
            use_invoices: self.use_invoices.unwrap_or(true),
        })
    }
}

impl InvoicePlanArgs {
    pub fn validate(&self) -> ForecastResult<InvoicePlanQuery> {
        let week_start = parse_date("weekStart", &self.week_start)?;
        let week_end = parse_date("weekEnd", &self.week_end)?;
        let as_of = parse_optional_date("asOfDate", self.as_of_date.as_deref(), week_end)?;
        Ok(InvoicePlanQuery {
            week_start,
            week_end,
            as_of,
            include_late: self.include_late.unwrap_or(true),
        })
    }
}

impl PayrollArgs {
    pub fn validate(&self) -> ForecastResult<PayrollQuery> {
        Ok(PayrollQuery {
            start: parse_date("startDate", &self.start_date)?,
            end: parse_date("endDate", &self.end_date)?,
            include_contractors: self.include_contractors.unwrap_or(true),
        })
    }
}
