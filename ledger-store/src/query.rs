// Timed query gateway over the ledger tables
use crate::connection::LedgerPool;
use crate::error::{StoreError, StoreResult};
use crate::models::{AgingRow, InvoiceRow, PaymentRow, PayrollComponentRow, RawAgingRow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// The read surface the forecasting service is written against.
///
/// One method per read shape; implementations own table-shape knowledge
/// (column names, status filters, the salary account match) so callers
/// never see SQL. Production uses `PgLedgerStore`; tests use an in-memory
/// fake.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// All aging snapshot rows with `as_of_date <= as_of`, oldest first.
    /// Snapshot selection (newest date wins) happens in the estimator.
    async fn aging_snapshot(&self, as_of: NaiveDate) -> StoreResult<Vec<AgingRow>>;

    /// Open invoices with a due date inside the closed window.
    async fn open_invoices_due(&self, from: NaiveDate, to: NaiveDate)
        -> StoreResult<Vec<InvoiceRow>>;

    /// Payments received in the half-open window `[from, to)`.
    async fn payments_between(&self, from: NaiveDate, to: NaiveDate)
        -> StoreResult<Vec<PaymentRow>>;

    /// Payments referencing any of the given invoice ids.
    async fn payments_for_invoices(&self, invoice_ids: &[String])
        -> StoreResult<Vec<PaymentRow>>;

    /// Direct-labor cost lines inside the closed window.
    async fn labor_costs(&self, from: NaiveDate, to: NaiveDate)
        -> StoreResult<Vec<PayrollComponentRow>>;

    /// Contractor cost lines inside the closed window.
    async fn contractor_costs(&self, from: NaiveDate, to: NaiveDate)
        -> StoreResult<Vec<PayrollComponentRow>>;

    /// Journal lines against salary expense accounts inside the closed
    /// window. The account match (`ILIKE '%salary%'`) lives here, not in
    /// the allocator.
    async fn salary_expense_lines(&self, from: NaiveDate, to: NaiveDate)
        -> StoreResult<Vec<PayrollComponentRow>>;
}

/// PostgreSQL-backed `LedgerReader` with a per-read wall-clock budget.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: LedgerPool,
    read_timeout: Duration,
}

impl PgLedgerStore {
    pub fn new(pool: LedgerPool, read_timeout: Duration) -> Self {
        Self { pool, read_timeout }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.read_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Run one table read under the timeout and classify any failure.
    /// Dropping the timed-out future cancels the in-flight query and
    /// returns the connection to the pool.
    async fn read_table<T>(
        &self,
        table: &str,
        fut: impl Future<Output = Result<Vec<T>, sqlx::Error>> + Send,
    ) -> StoreResult<Vec<T>> {
        debug!(table, timeout_ms = self.timeout_ms(), "issuing ledger read");
        match tokio::time::timeout(self.read_timeout, fut).await {
            Ok(Ok(rows)) => {
                debug!(table, rows = rows.len(), "ledger read complete");
                Ok(rows)
            }
            Ok(Err(e)) => Err(StoreError::classify(table, e)),
            Err(_) => Err(StoreError::Timeout {
                table: table.to_string(),
                elapsed_ms: self.timeout_ms(),
            }),
        }
    }
}

#[async_trait]
impl LedgerReader for PgLedgerStore {
    async fn aging_snapshot(&self, as_of: NaiveDate) -> StoreResult<Vec<AgingRow>> {
        let raw = self
            .read_table(
                "ar_aging",
                sqlx::query_as::<_, RawAgingRow>(
                    r#"
                    SELECT bucket, balance, as_of_date
                    FROM ar_aging
                    WHERE as_of_date <= $1
                    ORDER BY as_of_date ASC, bucket ASC
                    "#,
                )
                .bind(as_of)
                .fetch_all(self.pool.pool()),
            )
            .await?;

        raw.into_iter()
            .map(|row| {
                AgingRow::try_from(row).map_err(|detail| StoreError::RowDecode {
                    table: "ar_aging".to_string(),
                    detail,
                })
            })
            .collect()
    }

    async fn open_invoices_due(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<InvoiceRow>> {
        self.read_table(
            "invoices",
            sqlx::query_as::<_, InvoiceRow>(
                r#"
                SELECT invoice_id, customer_id, customer_name, due_date, amount, status
                FROM invoices
                WHERE status = 'open' AND due_date >= $1 AND due_date <= $2
                ORDER BY due_date ASC, invoice_id ASC
                "#,
            )
            .bind(from)
            .bind(to)
            .fetch_all(self.pool.pool()),
        )
        .await
    }

    async fn payments_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<PaymentRow>> {
        self.read_table(
            "payments",
            sqlx::query_as::<_, PaymentRow>(
                r#"
                SELECT payment_date, amount, invoice_id
                FROM payments
                WHERE payment_date >= $1 AND payment_date < $2
                ORDER BY payment_date ASC, invoice_id ASC
                "#,
            )
            .bind(from)
            .bind(to)
            .fetch_all(self.pool.pool()),
        )
        .await
    }

    async fn payments_for_invoices(
        &self,
        invoice_ids: &[String],
    ) -> StoreResult<Vec<PaymentRow>> {
        self.read_table(
            "payments",
            sqlx::query_as::<_, PaymentRow>(
                r#"
                SELECT payment_date, amount, invoice_id
                FROM payments
                WHERE invoice_id = ANY($1)
                ORDER BY payment_date ASC, invoice_id ASC
                "#,
            )
            .bind(invoice_ids.to_vec())
            .fetch_all(self.pool.pool()),
        )
        .await
    }

    async fn labor_costs(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<PayrollComponentRow>> {
        self.read_table(
            "labor_costs",
            sqlx::query_as::<_, PayrollComponentRow>(
                r#"
                SELECT customer_id, customer_name, amount, txn_date
                FROM labor_costs
                WHERE txn_date >= $1 AND txn_date <= $2
                ORDER BY txn_date ASC, customer_id ASC
                "#,
            )
            .bind(from)
            .bind(to)
            .fetch_all(self.pool.pool()),
        )
        .await
    }

    async fn contractor_costs(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<PayrollComponentRow>> {
        self.read_table(
            "contractor_costs",
            sqlx::query_as::<_, PayrollComponentRow>(
                r#"
                SELECT customer_id, customer_name, amount, txn_date
                FROM contractor_costs
                WHERE txn_date >= $1 AND txn_date <= $2
                ORDER BY txn_date ASC, customer_id ASC
                "#,
            )
            .bind(from)
            .bind(to)
            .fetch_all(self.pool.pool()),
        )
        .await
    }

    async fn salary_expense_lines(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<PayrollComponentRow>> {
        self.read_table(
            "expense_lines",
            sqlx::query_as::<_, PayrollComponentRow>(
                r#"
                SELECT customer_id, customer_name, amount, txn_date
                FROM expense_lines
                WHERE account_name ILIKE '%salary%' AND txn_date >= $1 AND txn_date <= $2
                ORDER BY txn_date ASC, customer_id ASC
                "#,
            )
            .bind(from)
            .bind(to)
            .fetch_all(self.pool.pool()),
        )
        .await
    }
}
