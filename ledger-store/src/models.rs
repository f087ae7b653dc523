// Typed row projections for the ledger tables
//
// Every row is parsed into an explicit struct at the store boundary; a row
// the models do not accept surfaces as `StoreError::RowDecode`, never as a
// silent zero.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// AR aging bucket, decoded from the snapshot's text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AgingBucket {
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "30")]
    Days30,
    #[serde(rename = "60")]
    Days60,
    #[serde(rename = "90")]
    Days90,
}

impl FromStr for AgingBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "30" => Ok(Self::Days30),
            "60" => Ok(Self::Days60),
            "90" => Ok(Self::Days90),
            other => Err(format!("unknown aging bucket {other:?}")),
        }
    }
}

/// One row of the `ar_aging` snapshot table.
#[derive(Debug, Clone, PartialEq)]
pub struct AgingRow {
    pub bucket: AgingBucket,
    pub balance: Decimal,
    pub as_of_date: NaiveDate,
}

/// One open or closed invoice from the `invoices` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct InvoiceRow {
    pub invoice_id: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub status: String,
}

/// One receipt from the `payments` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub invoice_id: Option<String>,
}

/// One cost line from any of the three payroll sources. Direct labor,
/// contractor, and salary-expense rows all share this projection; salary
/// rows may carry no customer at all.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PayrollComponentRow {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub amount: Decimal,
    pub txn_date: NaiveDate,
}

/// Raw `ar_aging` row before the bucket text is parsed.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RawAgingRow {
    pub bucket: String,
    pub balance: Decimal,
    pub as_of_date: NaiveDate,
}

impl TryFrom<RawAgingRow> for AgingRow {
    type Error = String;

    fn try_from(raw: RawAgingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            bucket: raw.bucket.parse()?,
            balance: raw.balance,
            as_of_date: raw.as_of_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_parses_known_values() {
        assert_eq!("current".parse::<AgingBucket>(), Ok(AgingBucket::Current));
        assert_eq!("30".parse::<AgingBucket>(), Ok(AgingBucket::Days30));
        assert_eq!("60".parse::<AgingBucket>(), Ok(AgingBucket::Days60));
        assert_eq!("90".parse::<AgingBucket>(), Ok(AgingBucket::Days90));
    }

    #[test]
    fn bucket_rejects_unknown_text() {
        assert!("120".parse::<AgingBucket>().is_err());
        assert!("Current".parse::<AgingBucket>().is_err());
        assert!("".parse::<AgingBucket>().is_err());
    }
}
