// Public argument and report shapes
use crate::config::{BlendWeights, RecoveryCurve};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Arguments for the weekly incoming-cash forecast.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingCashArgs {
    pub week_start: String,
    pub week_end: String,
    pub as_of_date: Option<String>,
    pub use_invoices: Option<bool>,
}

/// Arguments for the invoice-driven projection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePlanArgs {
    pub week_start: String,
    pub week_end: String,
    pub include_late: Option<bool>,
    pub as_of_date: Option<String>,
}

/// Arguments for the customer payroll rollup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollArgs {
    pub start_date: String,
    pub end_date: String,
    pub include_contractors: Option<bool>,
}

/// The reported date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Component figures behind a blended forecast. `None` means the signal
/// was unavailable, which is distinct from a zero estimate.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastComponents {
    pub invoices_due: Option<Decimal>,
    pub aging_forecast: Decimal,
    pub historical_receipts_blend: Option<Decimal>,
}

/// One entry of the concentration-risk payer ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPayer {
    pub customer: String,
    pub amount_due: Decimal,
}

/// Output of `incoming_cash_this_week`.
#[derive(Debug, Clone, Serialize)]
pub struct IncomingCashReport {
    pub period: Period,
    pub expected_collections: Decimal,
    pub components: ForecastComponents,
    pub recovery_curve: RecoveryCurve,
    pub blend: BlendWeights,
    pub top_payers_due: Vec<TopPayer>,
    pub risk_flags: Vec<String>,
    pub notes: Vec<String>,
}

/// Per-invoice detail carried by the invoice projection.
///
/// `expected_probability` is fixed at 1.0: no line-level collection
/// discount is applied; discounting happens only through the past-due
/// cure term.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceLine {
    pub invoice_id: String,
    pub customer: String,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub expected_probability: f64,
}

/// Adjustment breakdown for the invoice projection.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceAdjustments {
    pub past_due_cure: Decimal,
    pub already_paid: Decimal,
}

/// Output of `expected_cash_from_invoicing`.
#[derive(Debug, Clone, Serialize)]
pub struct InvoicePlanReport {
    pub period: Period,
    pub expected_from_invoices: Decimal,
    pub invoices: Vec<InvoiceLine>,
    pub adjustments: InvoiceAdjustments,
    pub notes: Vec<String>,
}

/// One customer's payroll rollup row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerPayroll {
    pub customer_key: String,
    pub customer_name: Option<String>,
    pub direct_labor: Decimal,
    pub contractors: Decimal,
    pub corporate_salaries_allocated: Decimal,
    pub total_payroll: Decimal,
}

/// Column-wise company totals across all customer rows. Excludes the
/// unallocated bucket, which is reported separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollTotals {
    pub direct_labor: Decimal,
    pub contractors: Decimal,
    pub corporate_salaries_allocated: Decimal,
    pub total: Decimal,
}

/// Company-level remainder that could not be attributed to a customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnallocatedOpex {
    pub corporate_salaries: Decimal,
}

/// Output of `payroll_by_customer`.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollReport {
    pub period: Period,
    pub rows: Vec<CustomerPayroll>,
    pub totals: PayrollTotals,
    pub unallocated_opex: UnallocatedOpex,
    pub notes: Vec<String>,
}
