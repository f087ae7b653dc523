use thiserror::Error;

/// SQLSTATE for `undefined_table` ("relation does not exist").
const UNDEFINED_TABLE: &str = "42P01";

#[derive(Error, Debug)]
pub enum StoreError {
    /// The relation does not exist. Soft condition: callers degrade the
    /// affected component and note it instead of failing the call.
    #[error("table {table} does not exist")]
    TableMissing { table: String },

    /// The read exceeded its wall-clock budget and was cancelled.
    #[error("read of {table} timed out after {elapsed_ms}ms")]
    Timeout { table: String, elapsed_ms: u64 },

    /// A row came back in a shape the models do not accept.
    #[error("malformed row in {table}: {detail}")]
    RowDecode { table: String, detail: String },

    #[error("query against {table} failed: {source}")]
    Query {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("connection failed: {0}")]
    Connection(String),
}

impl StoreError {
    /// Classify a driver error for one table read. An `undefined_table`
    /// SQLSTATE is the soft table-missing condition; a decode failure is a
    /// malformed row; everything else is a hard query failure.
    pub fn classify(table: &str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNDEFINED_TABLE) => {
                Self::TableMissing {
                    table: table.to_string(),
                }
            }
            sqlx::Error::ColumnDecode { index, source } => Self::RowDecode {
                table: table.to_string(),
                detail: format!("column {index}: {source}"),
            },
            sqlx::Error::Decode(source) => Self::RowDecode {
                table: table.to_string(),
                detail: source.to_string(),
            },
            other => Self::Query {
                table: table.to_string(),
                source: other,
            },
        }
    }

    /// True for the soft table-absence condition.
    pub fn is_table_missing(&self) -> bool {
        matches!(self, Self::TableMissing { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
