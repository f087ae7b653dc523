// Customer payroll allocation fold (pure)
use crate::models::{CustomerPayroll, PayrollTotals, UnallocatedOpex};
use ledger_store::PayrollComponentRow;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

const UNASSIGNED_KEY: &str = "unassigned";

#[derive(Debug, Default, Clone)]
struct Accum {
    name: Option<String>,
    direct_labor: Decimal,
    contractors: Decimal,
    salaries: Decimal,
}

/// Accumulates the three payroll sources into per-customer rows plus the
/// company-wide unallocated salary bucket. Rows are created lazily on
/// first sight; a `BTreeMap` keyed by customer keeps output order
/// deterministic.
#[derive(Debug, Default)]
pub struct PayrollAllocation {
    by_customer: BTreeMap<String, Accum>,
    unallocated_salaries: Decimal,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl PayrollAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, row: &PayrollComponentRow) -> &mut Accum {
        let key = row
            .customer_id
            .clone()
            .or_else(|| row.customer_name.clone())
            .unwrap_or_else(|| UNASSIGNED_KEY.to_string());
        let acc = self.by_customer.entry(key).or_default();
        if acc.name.is_none() {
            acc.name.clone_from(&row.customer_name);
        }
        acc
    }

    pub fn add_labor(&mut self, rows: &[PayrollComponentRow]) {
        for row in rows {
            let amount = row.amount;
            self.entry(row).direct_labor += amount;
        }
    }

    pub fn add_contractors(&mut self, rows: &[PayrollComponentRow]) {
        for row in rows {
            let amount = row.amount;
            self.entry(row).contractors += amount;
        }
    }

    /// Salary lines with neither customer id nor name never create a
    /// customer row; they accumulate into the unallocated bucket.
    pub fn add_salaries(&mut self, rows: &[PayrollComponentRow]) {
        for row in rows {
            if row.customer_id.is_none() && row.customer_name.is_none() {
                self.unallocated_salaries += row.amount;
            } else {
                let amount = row.amount;
                self.entry(row).salaries += amount;
            }
        }
    }

    /// Finish the fold: rounded customer rows in key order, column-wise
    /// company totals (excluding the unallocated bucket), and the
    /// unallocated remainder.
    pub fn finish(self) -> (Vec<CustomerPayroll>, PayrollTotals, UnallocatedOpex) {
        let mut total_labor = Decimal::ZERO;
        let mut total_contractors = Decimal::ZERO;
        let mut total_salaries = Decimal::ZERO;

        let rows: Vec<CustomerPayroll> = self
            .by_customer
            .into_iter()
            .map(|(key, acc)| {
                total_labor += acc.direct_labor;
                total_contractors += acc.contractors;
                total_salaries += acc.salaries;
                CustomerPayroll {
                    customer_key: key,
                    customer_name: acc.name,
                    direct_labor: round2(acc.direct_labor),
                    contractors: round2(acc.contractors),
                    corporate_salaries_allocated: round2(acc.salaries),
                    total_payroll: round2(acc.direct_labor + acc.contractors + acc.salaries),
                }
            })
            .collect();

        let totals = PayrollTotals {
            direct_labor: round2(total_labor),
            contractors: round2(total_contractors),
            corporate_salaries_allocated: round2(total_salaries),
            total: round2(total_labor + total_contractors + total_salaries),
        };
        let unallocated = UnallocatedOpex {
            corporate_salaries: round2(self.unallocated_salaries),
        };
        (rows, totals, unallocated)
    }
}
