// AR aging recovery estimator (pure)
use crate::config::RecoveryCurve;
use ledger_store::{AgingBucket, AgingRow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Bucket totals of the single most recent snapshot at or before the
/// requested date. `snapshot_date` is `None` when no snapshot exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AgingSummary {
    pub snapshot_date: Option<NaiveDate>,
    pub current: Decimal,
    pub days30: Decimal,
    pub days60: Decimal,
    pub days90: Decimal,
}

impl AgingSummary {
    pub fn empty() -> Self {
        Self {
            snapshot_date: None,
            current: Decimal::ZERO,
            days30: Decimal::ZERO,
            days60: Decimal::ZERO,
            days90: Decimal::ZERO,
        }
    }

    /// Total outstanding receivable across all buckets.
    pub fn total(&self) -> Decimal {
        self.current + self.days30 + self.days60 + self.days90
    }

    /// Combined 60+ and 90+ balance, the numerator of the overdue-share
    /// risk flag.
    pub fn late_balance(&self) -> Decimal {
        self.days60 + self.days90
    }

    /// Probability-weighted cash forecast over all buckets.
    pub fn recovery_forecast(&self, curve: &RecoveryCurve) -> Decimal {
        self.current * curve.current
            + self.days30 * curve.days30
            + self.days60 * curve.days60
            + self.days90 * curve.days90
    }

    /// Expected collections from overdue buckets only. Used as the
    /// invoice planner's late-payment cure term.
    pub fn past_due_cure(&self, curve: &RecoveryCurve) -> Decimal {
        self.days30 * curve.days30 + self.days60 * curve.days60 + self.days90 * curve.days90
    }
}

/// Fold snapshot rows into bucket totals. Only rows belonging to the
/// newest `as_of_date` present are counted; the store already restricted
/// rows to `as_of_date <= as_of`.
pub fn summarize(rows: &[AgingRow]) -> AgingSummary {
    let Some(snapshot_date) = rows.iter().map(|r| r.as_of_date).max() else {
        return AgingSummary::empty();
    };

    let mut summary = AgingSummary {
        snapshot_date: Some(snapshot_date),
        ..AgingSummary::empty()
    };
    for row in rows.iter().filter(|r| r.as_of_date == snapshot_date) {
        match row.bucket {
            AgingBucket::Current => summary.current += row.balance,
            AgingBucket::Days30 => summary.days30 += row.balance,
            AgingBucket::Days60 => summary.days60 += row.balance,
            AgingBucket::Days90 => summary.days90 += row.balance,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(bucket: AgingBucket, balance: i64, as_of: NaiveDate) -> AgingRow {
        AgingRow {
            bucket,
            balance: Decimal::from(balance),
            as_of_date: as_of,
        }
    }

    #[test]
    fn empty_rows_give_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.snapshot_date, None);
        assert_eq!(summary.total(), Decimal::ZERO);
    }

    #[test]
    fn only_newest_snapshot_counts() {
        let old = date(2026, 8, 1);
        let new = date(2026, 8, 20);
        let rows = vec![
            row(AgingBucket::Current, 9_999, old),
            row(AgingBucket::Current, 1_000, new),
            row(AgingBucket::Days30, 400, new),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.snapshot_date, Some(new));
        assert_eq!(summary.current, Decimal::from(1_000));
        assert_eq!(summary.days30, Decimal::from(400));
        assert_eq!(summary.days60, Decimal::ZERO);
    }

    #[test]
    fn duplicate_buckets_accumulate() {
        let day = date(2026, 8, 20);
        let rows = vec![
            row(AgingBucket::Days60, 100, day),
            row(AgingBucket::Days60, 50, day),
        ];
        assert_eq!(summarize(&rows).days60, Decimal::from(150));
    }

    #[test]
    fn recovery_forecast_applies_default_curve() {
        let day = date(2026, 8, 20);
        let rows = vec![
            row(AgingBucket::Current, 1_000, day),
            row(AgingBucket::Days30, 400, day),
            row(AgingBucket::Days60, 100, day),
            row(AgingBucket::Days90, 200, day),
        ];
        let forecast = summarize(&rows).recovery_forecast(&RecoveryCurve::default());
        // 1000*0.70 + 400*0.25 + 100*0.10 + 200*0.05
        assert_eq!(forecast, Decimal::new(82_000, 2));
    }

    #[test]
    fn past_due_cure_skips_current() {
        let day = date(2026, 8, 20);
        let rows = vec![
            row(AgingBucket::Current, 5_000, day),
            row(AgingBucket::Days30, 400, day),
            row(AgingBucket::Days60, 100, day),
        ];
        let cure = summarize(&rows).past_due_cure(&RecoveryCurve::default());
        // 400*0.25 + 100*0.10
        assert_eq!(cure, Decimal::new(11_000, 2));
    }
}
