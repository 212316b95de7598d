//! Guarded single-table operations.
//!
//! Every delete and count the engine issues goes through here. The outcome
//! classification is the central failure-handling rule of the subsystem:
//! missing structure is not a failure, missing rows are not a failure,
//! anything else is.

use super::schema::{Presence, SchemaSnapshot};
use super::CascadeError;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, Value};

/// What a guarded delete did. `Removed` and `Empty` are both successes; the
/// distinction is informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Removed(u64),
    Empty,
    /// The table or column does not exist in this deployment. Equivalent to
    /// success: there is nothing to clean up in structure that is not there.
    Absent,
}

/// Error-text fallback for when the schema snapshot is unknown. Covers the
/// relation/column messages of the backends sea-orm can sit on.
const MISSING_RELATION_PATTERNS: &[&str] = &[
    "does not exist",
    "doesn't exist",
    "no such table",
    "no such column",
    "unknown column",
    "undefined table",
    "undefined column",
];

const MAX_CAUSE_LEN: usize = 200;

pub fn is_missing_relation(message: &str) -> bool {
    let message = message.to_lowercase();
    MISSING_RELATION_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// Cap the cause text carried in a step error so callers can log it without
/// relaying a full driver dump.
pub fn truncate_cause(message: &str) -> String {
    if message.chars().count() <= MAX_CAUSE_LEN {
        message.to_owned()
    } else {
        let mut truncated: String = message.chars().take(MAX_CAUSE_LEN).collect();
        truncated.push_str("...");
        truncated
    }
}

fn classify_failure(table: &'static str, err: sea_orm::DbErr) -> Result<StepOutcome, CascadeError> {
    let message = err.to_string();
    if is_missing_relation(&message) {
        Ok(StepOutcome::Absent)
    } else {
        Err(CascadeError::Step {
            table,
            cause: truncate_cause(&message),
        })
    }
}

/// Delete all rows of `table` whose `column` equals `value`.
///
/// Table and column names come from the static registry, never from input.
pub async fn guarded_delete(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    table: &'static str,
    column: &'static str,
    value: Value,
) -> Result<StepOutcome, CascadeError> {
    if snapshot.has_column(table, column) == Presence::Missing {
        return Ok(StepOutcome::Absent);
    }
    let sql = format!(r#"DELETE FROM "{}" WHERE "{}" = $1"#, table, column);
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), &sql, vec![value]);
    match db.execute(stmt).await {
        Ok(result) => Ok(match result.rows_affected() {
            0 => StepOutcome::Empty,
            n => StepOutcome::Removed(n),
        }),
        Err(err) => classify_failure(table, err),
    }
}

/// Count rows of `table` whose `column` equals `value`, with the same
/// classification as [`guarded_delete`]. `None` means the table is absent.
pub async fn guarded_count(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    table: &'static str,
    column: &'static str,
    value: Value,
) -> Result<Option<i64>, CascadeError> {
    if snapshot.has_column(table, column) == Presence::Missing {
        return Ok(None);
    }
    let sql = format!(
        r#"SELECT COUNT(*) AS count FROM "{}" WHERE "{}" = $1"#,
        table, column
    );
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), &sql, vec![value]);
    match db.query_one(stmt).await {
        Ok(Some(row)) => match row.try_get::<i64>("", "count") {
            Ok(count) => Ok(Some(count)),
            Err(err) => classify_failure(table, err).map(|_| None),
        },
        Ok(None) => Ok(Some(0)),
        Err(err) => classify_failure(table, err).map(|_| None),
    }
}
