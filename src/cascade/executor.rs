//! Deletion plan executor.
//!
//! Phases run strictly in order; within a phase the steps are independent by
//! construction, so sequential execution is correct and concurrency would
//! only buy latency. There is no rollback: the first genuine step error
//! aborts the run, and re-invoking the same deletion later resumes it,
//! since every step is idempotent.

use super::registry::Phases;
use super::resolver::CascadeTarget;
use super::schema::SchemaSnapshot;
use super::step::{guarded_delete, StepOutcome};
use super::CascadeError;
use sea_orm::DatabaseConnection;

pub async fn run_phases(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    phases: &Phases,
    target: &CascadeTarget,
) -> Result<(), CascadeError> {
    for (phase_index, phase) in phases.iter().enumerate() {
        for entry in phase {
            let values = target.values_for(entry.key);
            if values.is_empty() {
                log::debug!(
                    "cascade[{}]: skipping {}.{}, no {:?} on this target",
                    phase_index,
                    entry.table,
                    entry.column,
                    entry.key
                );
                continue;
            }
            for value in values {
                match guarded_delete(db, snapshot, entry.table, entry.column, value).await? {
                    StepOutcome::Removed(count) => log::info!(
                        "cascade[{}]: removed {} rows from {}.{}",
                        phase_index,
                        count,
                        entry.table,
                        entry.column
                    ),
                    StepOutcome::Empty => log::debug!(
                        "cascade[{}]: no rows in {}.{}",
                        phase_index,
                        entry.table,
                        entry.column
                    ),
                    StepOutcome::Absent => log::warn!(
                        "cascade[{}]: {} absent in this deployment, skipped",
                        phase_index,
                        entry.table
                    ),
                }
            }
        }
    }
    Ok(())
}
