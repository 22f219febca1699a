//! Query executor: transactional execution and outcome classification.
//!
//! The executor owns the connection for exactly one request. Whatever
//! happens inside the transaction, the connection is closed before control
//! returns to the handler.

use log::{info, warn};
use serde_json::{Map, Value};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Column, Connection, Executor, Row, Statement, Transaction};
use std::time::Duration;

/// Classified result of one statement execution, produced once per request
/// and consumed exactly once by the gateway handler.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// Ordered column→value mappings for a statement that returned data.
    RowSet(Vec<Map<String, Value>>),
    /// Rows modified by a write statement; zero is a valid outcome.
    AffectedCount(u64),
    /// Database-level failure, carrying the driver's error text.
    Failure(String),
}

pub struct QueryExecutor {
    query_timeout: Duration,
}

impl QueryExecutor {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }

    /// Run one statement inside a transaction and classify the outcome.
    ///
    /// Commits on success, rolls back on any database error, and closes
    /// the connection on every exit path, including timeouts.
    pub async fn execute(&self, mut conn: AnyConnection, sql: &str) -> ExecutionOutcome {
        let outcome =
            match tokio::time::timeout(self.query_timeout, Self::run_transaction(&mut conn, sql))
                .await
            {
                Ok(outcome) => outcome,
                // The transaction future was dropped mid-flight; the driver
                // rolls back on drop and close() tears the session down.
                Err(_) => ExecutionOutcome::Failure(format!(
                    "statement timed out after {}s",
                    self.query_timeout.as_secs()
                )),
            };

        if let Err(e) = conn.close().await {
            warn!("Failed to close backend connection: {}", e);
        }

        outcome
    }

    async fn run_transaction(conn: &mut AnyConnection, sql: &str) -> ExecutionOutcome {
        let mut tx = match conn.begin().await {
            Ok(tx) => tx,
            Err(e) => return ExecutionOutcome::Failure(e.to_string()),
        };

        match Self::run_statement(&mut tx, sql).await {
            Ok(outcome) => match tx.commit().await {
                Ok(()) => {
                    if let ExecutionOutcome::AffectedCount(count) = outcome {
                        info!("Rows affected: {}", count);
                    }
                    outcome
                }
                Err(e) => ExecutionOutcome::Failure(e.to_string()),
            },
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!("Rollback failed after execution error: {}", rb);
                }
                ExecutionOutcome::Failure(e.to_string())
            }
        }
    }

    /// Prepare the statement and classify by its column metadata: a
    /// statement that produces columns is a row set, even when it yields
    /// zero rows; everything else reports the driver's affected-row count.
    async fn run_statement(
        tx: &mut Transaction<'_, sqlx::Any>,
        sql: &str,
    ) -> Result<ExecutionOutcome, sqlx::Error> {
        let statement = (&mut **tx).prepare(sql).await?;

        if statement.columns().is_empty() {
            let result = statement.query().execute(&mut **tx).await?;
            Ok(ExecutionOutcome::AffectedCount(result.rows_affected()))
        } else {
            let rows = statement.query().fetch_all(&mut **tx).await?;
            Ok(ExecutionOutcome::RowSet(rows.iter().map(row_to_object).collect()))
        }
    }
}

/// Convert a driver row into an ordered column→value mapping.
fn row_to_object(row: &AnyRow) -> Map<String, Value> {
    let mut object = Map::new();
    for column in row.columns() {
        object.insert(column.name().to_string(), column_value(row, column.ordinal()));
    }
    object
}

/// Decode a single column into JSON, trying the Any driver's scalar types
/// in order. NULLs decode as `None` on the first attempt.
fn column_value(row: &AnyRow, index: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return value.map(Value::Bool).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
        // The gateway speaks JSON; binary payloads are rendered lossily.
        return value
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(Value::Null);
    }
    Value::Null
}
