//! Blocking-reference scanner.
//!
//! Read-only counts over the dependent-table registry. Used as a pre-flight
//! diagnostic from the ops CLI and as the payload of a finalization failure,
//! so an operator acts on named blockers instead of an opaque error.

use super::registry::DependentTable;
use super::resolver::CascadeTarget;
use super::schema::SchemaSnapshot;
use super::step::guarded_count;
use super::CascadeError;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Non-zero row counts per `table.column`, produced without side effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BlockingReport {
    counts: BTreeMap<String, i64>,
}

impl BlockingReport {
    pub fn record(&mut self, table: &str, column: &str, count: i64) {
        if count > 0 {
            *self.counts.entry(format!("{}.{}", table, column)).or_insert(0) += count;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, table: &str, column: &str) -> i64 {
        self.counts
            .get(&format!("{}.{}", table, column))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl fmt::Display for BlockingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for (key, count) in &self.counts {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, count)?;
            first = false;
        }
        Ok(())
    }
}

/// Count remaining references for every registry entry the target has
/// values for. Absent tables contribute nothing.
pub async fn count_remaining(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    entries: &[DependentTable],
    target: &CascadeTarget,
) -> Result<BlockingReport, CascadeError> {
    let mut report = BlockingReport::default();
    for entry in entries {
        for value in target.values_for(entry.key) {
            if let Some(count) = guarded_count(db, snapshot, entry.table, entry.column, value).await?
            {
                report.record(entry.table, entry.column, count);
            }
        }
    }
    Ok(report)
}
