// Invoice-exact estimation helpers (pure)
use crate::models::{InvoiceLine, TopPayer};
use ledger_store::{InvoiceRow, PaymentRow};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// How many payers the concentration ranking reports.
pub const TOP_PAYER_LIMIT: usize = 5;

/// Display key for an invoice's payer.
fn payer_label(row: &InvoiceRow) -> String {
    row.customer_name
        .clone()
        .or_else(|| row.customer_id.clone())
        .unwrap_or_else(|| "unassigned".to_string())
}

/// Sum of all matched invoice amounts (unrounded).
pub fn invoices_total(rows: &[InvoiceRow]) -> Decimal {
    rows.iter().map(|r| r.amount).sum()
}

/// Top payers by total amount due, largest first, ties broken by name so
/// output is deterministic. Amounts are rounded for reporting.
pub fn top_payers(rows: &[InvoiceRow]) -> Vec<TopPayer> {
    let mut by_payer: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        *by_payer.entry(payer_label(row)).or_insert(Decimal::ZERO) += row.amount;
    }
    let mut ranked: Vec<TopPayer> = by_payer
        .into_iter()
        .map(|(customer, amount_due)| TopPayer {
            customer,
            amount_due,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.amount_due
            .cmp(&a.amount_due)
            .then_with(|| a.customer.cmp(&b.customer))
    });
    ranked.truncate(TOP_PAYER_LIMIT);
    for payer in &mut ranked {
        payer.amount_due = payer
            .amount_due
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    }
    ranked
}

/// Per-invoice report lines. `expected_probability` stays fixed at 1.0.
pub fn invoice_lines(rows: &[InvoiceRow]) -> Vec<InvoiceLine> {
    rows.iter()
        .map(|row| InvoiceLine {
            invoice_id: row.invoice_id.clone(),
            customer: payer_label(row),
            due_date: row.due_date,
            amount: row
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            expected_probability: 1.0,
        })
        .collect()
}

/// Sum of payments that reference any of the matched invoices
/// (unrounded). The store already filtered to the matched ids.
pub fn already_paid(payments: &[PaymentRow]) -> Decimal {
    payments.iter().map(|p| p.amount).sum()
}
