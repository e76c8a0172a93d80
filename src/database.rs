//! Database gateway abstraction for the factoring ledger
//!
//! The agent talks to the database through the [`DatabaseClient`] trait:
//! one free-form execution entry point plus the small set of canned
//! operations the command surface exposes. Results are always fully
//! materialized before they are returned.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result type for gateway operations
pub type DbResult<T> = Result<T, DatabaseError>;

/// Errors that can occur in the database gateway
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    /// Rejected before any SQL is built. The message lists the valid names.
    #[error("Tabela inválida. Tabelas válidas: {0}")]
    InvalidTable(String),
}

/// A fully materialized result set: ordered column names plus one
/// `serde_json::Value` per cell (`Null` for SQL NULL, nested values for
/// json/jsonb columns).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl QueryRows {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell lookup by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&JsonValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// Outcome of a free-form statement. Read statements materialize rows;
/// write/DDL statements commit and report the affected-row count. Callers
/// discriminate on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(QueryRows),
    Affected(u64),
}

/// Default row limit for the canned listing operations.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Read/write classification by case-insensitive statement prefix.
pub fn is_read_statement(sql: &str) -> bool {
    let head = sql.trim_start().to_uppercase();
    ["SELECT", "SHOW", "DESCRIBE", "EXPLAIN"]
        .iter()
        .any(|kw| head.starts_with(kw))
}

/// Gateway contract between the agent and the relational backend.
///
/// Implementations connect lazily on first use; a failed statement must not
/// tear the connection down. `close` followed by any operation re-establishes
/// the connection from the stored credentials.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Execute a free-form SQL statement.
    async fn execute_query(&mut self, sql: &str) -> DbResult<QueryOutcome>;

    /// Names of the public-schema tables, name-ordered.
    async fn list_tables(&mut self) -> DbResult<Vec<String>>;

    /// Column metadata for one table, in ordinal order.
    async fn describe_table(&mut self, table: &str) -> DbResult<QueryRows>;

    /// Most recent operations, date descending.
    async fn list_operations(&mut self, limit: i64) -> DbResult<QueryRows>;

    /// Open titles, issue date descending.
    async fn list_open_titles(&mut self, limit: i64) -> DbResult<QueryRows>;

    /// Ledger-party records, name ascending.
    async fn list_ledger_parties(&mut self, limit: i64) -> DbResult<QueryRows>;

    /// Count records in one of the three ledger tables. Any other table
    /// name fails with [`DatabaseError::InvalidTable`] before SQL is built.
    async fn count_records(&mut self, table: &str) -> DbResult<QueryRows>;

    /// Count open titles unconditionally.
    async fn count_open_titles(&mut self) -> DbResult<QueryRows>;

    /// Close the connection. A later call reconnects.
    async fn close(&mut self) -> DbResult<()>;
}
