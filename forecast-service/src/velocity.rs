// Historical receipt velocity estimator (pure)
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use ledger_store::PaymentRow;
use rust_decimal::Decimal;

/// Days of payment history fed into the trailing average.
pub const LOOKBACK_DAYS: i64 = 56;

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Count Mon-Fri days in the closed range `[from, to]`. An inverted
/// range counts zero.
pub fn business_days(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut count = 0;
    let mut day = from;
    while day <= to {
        if is_business_day(day) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// The lookback window `[week_start - 56d, week_start)` as a closed range.
pub fn lookback_window(week_start: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        week_start - Duration::days(LOOKBACK_DAYS),
        week_start - Duration::days(1),
    )
}

/// Project the trailing average daily collection rate onto the target
/// window: sum the lookback payments, divide by lookback business days,
/// multiply by target business days.
pub fn projected_collections(
    payments: &[PaymentRow],
    week_start: NaiveDate,
    week_end: NaiveDate,
) -> Decimal {
    let total: Decimal = payments.iter().map(|p| p.amount).sum();
    let (lb_from, lb_to) = lookback_window(week_start);
    let lookback_days = business_days(lb_from, lb_to);
    if lookback_days == 0 {
        return Decimal::ZERO;
    }
    let avg_daily = total / Decimal::from(lookback_days);
    avg_daily * Decimal::from(business_days(week_start, week_end))
}
