// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle that fires query hooks around every statement.
//!
//! All statements run on tokio-rusqlite's single background thread. Hooks run
//! on that same thread, immediately around the statement, so the measured
//! duration covers the statement alone.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use querylog_core::{QueryContext, QueryError, QueryEvent, QueryHook, QueryLogError};
use rusqlite::types::Value;
use rusqlite::{Row, params_from_iter};
use tracing::debug;

/// Parameter list for statements that take none.
pub const NO_PARAMS: [Value; 0] = [];

/// Map a tokio-rusqlite error into a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> QueryLogError {
    QueryLogError::Storage {
        source: Box::new(e),
    }
}

/// Convert a driver error into the failure carried by a query event.
///
/// `QueryReturnedNoRows` becomes [`QueryError::NoRows`]. SQLite failures keep
/// their error code name (`ConstraintViolation`, `DatabaseBusy`, ...).
pub fn query_error(err: &rusqlite::Error) -> QueryError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => QueryError::NoRows,
        // raised while preparing; `sqlite_error_code` does not look inside it
        rusqlite::Error::SqlInputError { error, .. } => {
            QueryError::driver_with_code(format!("{:?}", error.code), err.to_string())
        }
        other => match other.sqlite_error_code() {
            Some(code) => QueryError::driver_with_code(format!("{code:?}"), other.to_string()),
            None => QueryError::driver(other.to_string()),
        },
    }
}

/// Run `statement` with `hooks` fired around it.
///
/// Before hooks chain the context in registration order. After hooks see the
/// final context and run in reverse order.
fn instrumented<T>(
    hooks: &[Arc<dyn QueryHook>],
    ctx: QueryContext,
    sql: &str,
    statement: impl FnOnce() -> rusqlite::Result<T>,
) -> rusqlite::Result<T> {
    let mut event = QueryEvent::new(sql);
    let ctx = hooks
        .iter()
        .fold(ctx, |ctx, hook| hook.before_query(ctx, &event));

    event.start_time = Instant::now();
    let result = statement();
    if let Err(e) = &result {
        event.err = Some(query_error(e));
    }

    for hook in hooks.iter().rev() {
        hook.after_query(&ctx, &event);
    }
    result
}

/// A SQLite connection whose statements are observed by query hooks.
///
/// Parameters are passed as owned [`Value`]s since statements execute on the
/// connection's background thread.
#[derive(Clone)]
pub struct InstrumentedDatabase {
    conn: tokio_rusqlite::Connection,
    hooks: Arc<[Arc<dyn QueryHook>]>,
}

impl InstrumentedDatabase {
    /// Open (or create) the database file at `path`.
    pub async fn open(
        path: impl AsRef<Path>,
        hooks: Vec<Arc<dyn QueryHook>>,
    ) -> Result<Self, QueryLogError> {
        let path = path.as_ref().to_path_buf();
        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(|e| QueryLogError::Storage {
                source: Box::new(e),
            })?;
        debug!(path = %path.display(), hooks = hooks.len(), "instrumented database opened");
        Ok(Self::from_connection(conn, hooks))
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory(hooks: Vec<Arc<dyn QueryHook>>) -> Result<Self, QueryLogError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| QueryLogError::Storage {
                source: Box::new(e),
            })?;
        Ok(Self::from_connection(conn, hooks))
    }

    /// Wrap an existing connection.
    pub fn from_connection(
        conn: tokio_rusqlite::Connection,
        hooks: Vec<Arc<dyn QueryHook>>,
    ) -> Self {
        Self {
            conn,
            hooks: hooks.into(),
        }
    }

    /// Returns a reference to the underlying connection.
    ///
    /// Statements issued through it bypass the hooks.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Number of registered hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Execute one statement, returning the number of rows changed.
    pub async fn execute<P>(
        &self,
        ctx: QueryContext,
        sql: &str,
        params: P,
    ) -> Result<usize, QueryLogError>
    where
        P: IntoIterator,
        P::Item: Into<Value>,
    {
        let hooks = Arc::clone(&self.hooks);
        let sql = sql.to_string();
        let params: Vec<Value> = params.into_iter().map(Into::into).collect();
        self.conn
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                instrumented(&hooks, ctx, &sql, || {
                    conn.execute(&sql, params_from_iter(params))
                })
            })
            .await
            .map_err(map_tr_err)
    }

    /// Execute a batch of semicolon-separated statements without parameters.
    ///
    /// The batch is observed as a single event.
    pub async fn execute_batch(&self, ctx: QueryContext, sql: &str) -> Result<(), QueryLogError> {
        let hooks = Arc::clone(&self.hooks);
        let sql = sql.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                instrumented(&hooks, ctx, &sql, || conn.execute_batch(&sql))
            })
            .await
            .map_err(map_tr_err)
    }

    /// Fetch at most one row.
    ///
    /// A statement that matches nothing returns `Ok(None)`; hooks see it as a
    /// [`QueryError::NoRows`] event.
    pub async fn query_row<P, T, F>(
        &self,
        ctx: QueryContext,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Option<T>, QueryLogError>
    where
        P: IntoIterator,
        P::Item: Into<Value>,
        T: Send + 'static,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
    {
        let hooks = Arc::clone(&self.hooks);
        let sql = sql.to_string();
        let params: Vec<Value> = params.into_iter().map(Into::into).collect();
        self.conn
            .call(move |conn| -> Result<Option<T>, rusqlite::Error> {
                let result = instrumented(&hooks, ctx, &sql, || {
                    conn.query_row(&sql, params_from_iter(params), map)
                });
                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    /// Fetch every row, mapped through `map`.
    pub async fn query_all<P, T, F>(
        &self,
        ctx: QueryContext,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Vec<T>, QueryLogError>
    where
        P: IntoIterator,
        P::Item: Into<Value>,
        T: Send + 'static,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
    {
        let hooks = Arc::clone(&self.hooks);
        let sql = sql.to_string();
        let params: Vec<Value> = params.into_iter().map(Into::into).collect();
        self.conn
            .call(move |conn| -> Result<Vec<T>, rusqlite::Error> {
                instrumented(&hooks, ctx, &sql, || {
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map(params_from_iter(params), map)?;
                    rows.collect()
                })
            })
            .await
            .map_err(map_tr_err)
    }
}

impl std::fmt::Debug for InstrumentedDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentedDatabase")
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_maps_to_sentinel() {
        assert_eq!(
            query_error(&rusqlite::Error::QueryReturnedNoRows),
            QueryError::NoRows
        );
    }

    #[test]
    fn sqlite_failure_keeps_code_name() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("SELEKT 1", []).unwrap_err();
        let mapped = query_error(&err);
        assert_eq!(mapped.code(), Some("Unknown"));
        assert!(mapped.to_string().contains("syntax error"));
    }

    #[test]
    fn prepare_failure_keeps_code_name() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.prepare("SELECT * FROM missing_table").unwrap_err();
        let mapped = query_error(&err);
        assert_eq!(mapped.code(), Some("Unknown"));
        assert!(mapped.to_string().contains("no such table"));
    }

    #[test]
    fn constraint_failure_is_constraint_violation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY); INSERT INTO t VALUES (1);")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES (1)", []).unwrap_err();
        assert_eq!(query_error(&err).code(), Some("ConstraintViolation"));
    }

    #[test]
    fn non_sqlite_failure_has_no_code() {
        let err = rusqlite::Error::InvalidColumnName("nope".into());
        let mapped = query_error(&err);
        assert!(mapped.code().is_none());
        assert!(!mapped.is_no_rows());
    }

    #[test]
    fn hooks_fire_around_statement_in_order() {
        use querylog_test_utils::{HookCall, RecordingHook};

        let first = RecordingHook::new("first");
        let second = first.sibling("second");
        let hooks: Vec<Arc<dyn QueryHook>> = vec![Arc::new(first.clone()), Arc::new(second)];

        let out = instrumented(&hooks, QueryContext::new(), "SELECT 1", || Ok(1));
        assert_eq!(out.unwrap(), 1);

        let order: Vec<String> = first
            .calls()
            .into_iter()
            .map(|call| match call {
                HookCall::Before { name, .. } => format!("before:{name}"),
                HookCall::After { name, .. } => format!("after:{name}"),
            })
            .collect();
        assert_eq!(
            order,
            ["before:first", "before:second", "after:second", "after:first"]
        );
    }
}
