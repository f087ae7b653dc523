// Forecasting service: validation -> gateway reads -> estimators -> reports
use crate::aging::{self, AgingSummary};
use crate::config::ForecastConfig;
use crate::error::ForecastResult;
use crate::invoices;
use crate::models::{
    ForecastComponents, IncomingCashArgs, IncomingCashReport, InvoiceAdjustments,
    InvoicePlanArgs, InvoicePlanReport, PayrollArgs, PayrollReport, Period, TopPayer,
};
use crate::payroll::PayrollAllocation;
use crate::validate::{IncomingCashQuery, InvoicePlanQuery};
use crate::velocity;
use ledger_store::LedgerReader;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Share thresholds behind both risk flags.
fn risk_threshold() -> Decimal {
    Decimal::new(35, 2)
}

/// The forecasting module's public surface. Stateless per call: the
/// injected reader is the only collaborator, and every sub-read within a
/// call runs sequentially under the configured timeout.
pub struct ForecastService<R: LedgerReader> {
    reader: R,
    config: ForecastConfig,
}

impl<R: LedgerReader> ForecastService<R> {
    pub fn new(reader: R, config: ForecastConfig) -> Self {
        Self { reader, config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Weekly incoming-cash forecast blending open invoices, AR aging
    /// recovery, and historical receipt velocity.
    pub async fn incoming_cash_this_week(
        &self,
        args: &IncomingCashArgs,
    ) -> ForecastResult<IncomingCashReport> {
        let query = args.validate()?;
        self.incoming_cash(query).await
    }

    async fn incoming_cash(&self, query: IncomingCashQuery) -> ForecastResult<IncomingCashReport> {
        let mut notes = Vec::new();

        // The aging summary is always computed: it is the fallback base
        // and it seeds the risk flags even when invoices succeed.
        let summary = self.fetch_aging(query.as_of, &mut notes).await?;
        let aging_forecast = summary.recovery_forecast(&self.config.recovery_curve);

        let (invoices_due, top_payers_due) = if query.use_invoices {
            match self
                .reader
                .open_invoices_due(query.week_start, query.week_end)
                .await
            {
                Ok(rows) => (
                    Some(invoices::invoices_total(&rows)),
                    invoices::top_payers(&rows),
                ),
                Err(e) if e.is_table_missing() => {
                    warn!(table = "invoices", "table missing, falling back to aging forecast");
                    notes.push(
                        "invoices table is missing; using the AR aging forecast as the base figure"
                            .to_string(),
                    );
                    (None, Vec::new())
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            (None, Vec::new())
        };

        let (lookback_from, _) = velocity::lookback_window(query.week_start);
        let historical = match self
            .reader
            .payments_between(lookback_from, query.week_start)
            .await
        {
            Ok(rows) => Some(velocity::projected_collections(
                &rows,
                query.week_start,
                query.week_end,
            )),
            Err(e) if e.is_table_missing() => {
                warn!(table = "payments", "table missing, no historical signal");
                notes.push("payments table is missing; no historical receipt signal".to_string());
                None
            }
            Err(e) => return Err(e.into()),
        };

        let base = invoices_due.unwrap_or(aging_forecast);
        let expected = match historical {
            None => base,
            Some(history) => {
                base * self.config.blend.invoices_or_aging + history * self.config.blend.history
            }
        };

        let risk_flags = self.risk_flags(&summary, base, &top_payers_due);

        info!(
            week_start = %query.week_start,
            week_end = %query.week_end,
            expected = %round2(expected),
            "incoming cash forecast complete"
        );

        Ok(IncomingCashReport {
            period: Period {
                start: query.week_start,
                end: query.week_end,
            },
            expected_collections: round2(expected),
            components: ForecastComponents {
                invoices_due: invoices_due.map(round2),
                aging_forecast: round2(aging_forecast),
                historical_receipts_blend: historical.map(round2),
            },
            recovery_curve: self.config.recovery_curve.clone(),
            blend: self.config.blend.clone(),
            top_payers_due,
            risk_flags,
            notes,
        })
    }

    /// Exact invoice-driven projection: matched open invoices, net of
    /// payments already received, plus an optional past-due cure.
    pub async fn expected_cash_from_invoicing(
        &self,
        args: &InvoicePlanArgs,
    ) -> ForecastResult<InvoicePlanReport> {
        let query = args.validate()?;

        let rows = match self
            .reader
            .open_invoices_due(query.week_start, query.week_end)
            .await
        {
            Ok(rows) => rows,
            Err(e) if e.is_table_missing() => return self.invoice_fallback(query).await,
            Err(e) => return Err(e.into()),
        };

        let mut notes = Vec::new();
        let base = invoices::invoices_total(&rows);
        let lines = invoices::invoice_lines(&rows);

        let invoice_ids: Vec<String> = rows.iter().map(|r| r.invoice_id.clone()).collect();
        let already_paid = if invoice_ids.is_empty() {
            Decimal::ZERO
        } else {
            match self.reader.payments_for_invoices(&invoice_ids).await {
                Ok(payments) => invoices::already_paid(&payments),
                Err(e) if e.is_table_missing() => {
                    warn!(table = "payments", "table missing, already-paid treated as 0");
                    notes.push(
                        "payments table is missing; already-paid deduction treated as 0"
                            .to_string(),
                    );
                    Decimal::ZERO
                }
                Err(e) => return Err(e.into()),
            }
        };

        let past_due_cure = if query.include_late {
            let summary = self.fetch_aging(query.as_of, &mut notes).await?;
            summary.past_due_cure(&self.config.recovery_curve)
        } else {
            Decimal::ZERO
        };

        let expected = base + past_due_cure - already_paid;

        info!(
            week_start = %query.week_start,
            week_end = %query.week_end,
            invoices = lines.len(),
            expected = %round2(expected),
            "invoice cash projection complete"
        );

        Ok(InvoicePlanReport {
            period: Period {
                start: query.week_start,
                end: query.week_end,
            },
            expected_from_invoices: round2(expected),
            invoices: lines,
            adjustments: InvoiceAdjustments {
                past_due_cure: round2(past_due_cure),
                already_paid: round2(already_paid),
            },
            notes,
        })
    }

    /// Customer payroll rollup across direct labor, contractors, and
    /// allocated corporate salaries.
    pub async fn payroll_by_customer(&self, args: &PayrollArgs) -> ForecastResult<PayrollReport> {
        let query = args.validate()?;
        let mut notes = Vec::new();
        let mut allocation = PayrollAllocation::new();

        match self.reader.labor_costs(query.start, query.end).await {
            Ok(rows) => allocation.add_labor(&rows),
            Err(e) if e.is_table_missing() => {
                warn!(table = "labor_costs", "table missing, direct labor degraded to 0");
                notes.push("labor_costs table is missing; direct labor reported as 0".to_string());
            }
            Err(e) => return Err(e.into()),
        }

        if query.include_contractors {
            match self.reader.contractor_costs(query.start, query.end).await {
                Ok(rows) => allocation.add_contractors(&rows),
                Err(e) if e.is_table_missing() => {
                    warn!(table = "contractor_costs", "table missing, contractors degraded to 0");
                    notes.push(
                        "contractor_costs table is missing; contractor cost reported as 0"
                            .to_string(),
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        match self
            .reader
            .salary_expense_lines(query.start, query.end)
            .await
        {
            Ok(rows) => allocation.add_salaries(&rows),
            Err(e) if e.is_table_missing() => {
                warn!(table = "expense_lines", "table missing, salaries degraded to 0");
                notes.push(
                    "expense_lines table is missing; corporate salaries reported as 0".to_string(),
                );
            }
            Err(e) => return Err(e.into()),
        }

        let (rows, totals, unallocated_opex) = allocation.finish();

        info!(
            start = %query.start,
            end = %query.end,
            customers = rows.len(),
            total = %totals.total,
            "payroll rollup complete"
        );

        Ok(PayrollReport {
            period: Period {
                start: query.start,
                end: query.end,
            },
            rows,
            totals,
            unallocated_opex,
            notes,
        })
    }

    /// Read and summarize the aging snapshot, degrading to an empty
    /// summary when the table or the snapshot itself is absent.
    async fn fetch_aging(
        &self,
        as_of: chrono::NaiveDate,
        notes: &mut Vec<String>,
    ) -> ForecastResult<AgingSummary> {
        match self.reader.aging_snapshot(as_of).await {
            Ok(rows) => {
                let summary = aging::summarize(&rows);
                if summary.snapshot_date.is_none() {
                    warn!(as_of = %as_of, "no AR aging snapshot at or before date");
                    notes.push("no AR aging snapshot found".to_string());
                }
                Ok(summary)
            }
            Err(e) if e.is_table_missing() => {
                warn!(table = "ar_aging", "table missing, aging forecast degraded to 0");
                notes.push("ar_aging table is missing; aging forecast treated as 0".to_string());
                Ok(AgingSummary::empty())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The planner's degraded path: invoices are gone entirely, so the
    /// blended forecast (without invoices) stands in for the invoice
    /// figure.
    async fn invoice_fallback(&self, query: InvoicePlanQuery) -> ForecastResult<InvoicePlanReport> {
        warn!(table = "invoices", "table missing, substituting blended forecast");
        let inner = self
            .incoming_cash(IncomingCashQuery {
                week_start: query.week_start,
                week_end: query.week_end,
                as_of: query.as_of,
                use_invoices: false,
            })
            .await?;

        let mut notes = inner.notes;
        notes.push(
            "invoices table is missing; figure substituted from the aging/history cash forecast"
                .to_string(),
        );

        Ok(InvoicePlanReport {
            period: inner.period,
            expected_from_invoices: inner.expected_collections,
            invoices: Vec::new(),
            adjustments: InvoiceAdjustments {
                past_due_cure: Decimal::ZERO,
                already_paid: Decimal::ZERO,
            },
            notes,
        })
    }

    fn risk_flags(
        &self,
        summary: &AgingSummary,
        base: Decimal,
        top_payers: &[TopPayer],
    ) -> Vec<String> {
        let mut flags = Vec::new();

        // Zero AR suppresses the share flag rather than dividing by zero.
        let total_ar = summary.total();
        if total_ar > Decimal::ZERO && summary.late_balance() / total_ar > risk_threshold() {
            flags.push("High 60+/90+ share".to_string());
        }

        // A ratio against a non-positive base is meaningless, and an
        // empty payer list means there is nothing to concentrate.
        if base > Decimal::ZERO {
            if let Some(largest) = top_payers.first() {
                if largest.amount_due > base * risk_threshold() {
                    flags.push("Payer concentration > 35%".to_string());
                }
            }
        }

        flags
    }
}
