//! Dependency-ordered entity removal.
//!
//! Deleting a user or a product must take every row that transitively
//! references it along with it, against a schema whose deployed shape can
//! drift from what this code expects (missing tables, partially applied
//! migrations). The engine runs a computed reverse-topological plan of
//! single-table delete steps, each classified as removed / empty / absent,
//! and only treats genuine store errors as failures. Every step is
//! idempotent, so a failed or interrupted cascade is recovered by invoking
//! the same deletion again. No cross-table transaction is taken: the most
//! degraded deployments this has to run against do not guarantee one.

pub mod executor;
pub mod finalizer;
pub mod guard;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod schema;
pub mod step;

pub use guard::init_protected_emails;
pub use registry::{DependentTable, FilterKey};
pub use resolver::CascadeTarget;
pub use scanner::BlockingReport;
pub use schema::{Presence, SchemaSnapshot};
pub use step::StepOutcome;

use crate::orm::{products, users};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CascadeError {
    /// Raised before any mutation; never retried.
    #[error("account '{0}' is protected and cannot be deleted")]
    Protected(String),
    /// A genuine store error on one table. Missing tables and missing rows
    /// never produce this.
    #[error("delete from {table} failed: {cause}")]
    Step { table: &'static str, cause: String },
    /// The root row survived the direct delete, the existence re-check and
    /// the raw fallback. Carries what still references it.
    #[error("could not finalize deletion of {entity} {id}; blocking references: {report}")]
    Finalization {
        entity: &'static str,
        id: i32,
        report: BlockingReport,
    },
    /// The dependency registry does not topologically sort.
    #[error("dependency cycle involving table {0}")]
    Cycle(&'static str),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Remove a user and every row that references it, directly or through the
/// vendor/driver profiles, products and orders it owns.
///
/// A user that is already gone is a successful no-op. A protected account
/// fails with [`CascadeError::Protected`] before anything is touched.
pub async fn delete_user_safely(db: &DatabaseConnection, user_id: i32) -> Result<(), CascadeError> {
    let user = match users::Entity::find_by_id(user_id).one(db).await? {
        Some(user) => user,
        None => {
            log::info!("cascade: user {} already absent, nothing to delete", user_id);
            return Ok(());
        }
    };
    if guard::is_protected(user.email.as_deref()) {
        return Err(CascadeError::Protected(
            user.email.clone().unwrap_or_default(),
        ));
    }

    let snapshot = SchemaSnapshot::load(db).await;
    // Owned ids must be captured before any phase runs; once the owning rows
    // are gone the joins needed to find their children are gone too.
    let target = resolver::resolve_user_target(db, &snapshot, &user).await?;
    let phases = registry::user_phases()?;

    log::info!(
        "cascade: deleting user {} (vendor: {:?}, {} products, {} orders)",
        user_id,
        target.vendor_id,
        target.product_ids.len(),
        target.order_ids.len()
    );
    executor::run_phases(db, &snapshot, phases, &target).await?;
    finalizer::finalize_user(db, &snapshot, &target, user_id).await
}

/// Remove a product and its reviews, cart references and order line items.
pub async fn delete_product_safely(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<(), CascadeError> {
    if products::Entity::find_by_id(product_id)
        .one(db)
        .await?
        .is_none()
    {
        log::info!(
            "cascade: product {} already absent, nothing to delete",
            product_id
        );
        return Ok(());
    }

    let snapshot = SchemaSnapshot::load(db).await;
    let target = CascadeTarget::for_product(product_id);
    let phases = registry::product_phases()?;

    executor::run_phases(db, &snapshot, phases, &target).await?;
    finalizer::finalize_product(db, &snapshot, &target, product_id).await
}

/// Read-only diagnostic: count every row still referencing the user, per
/// table and column. Safe to call repeatedly; an absent user yields an
/// empty report.
pub async fn scan_blocking_references(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<BlockingReport, CascadeError> {
    let user = match users::Entity::find_by_id(user_id).one(db).await? {
        Some(user) => user,
        None => return Ok(BlockingReport::default()),
    };

    let snapshot = SchemaSnapshot::load(db).await;
    let target = resolver::resolve_user_target(db, &snapshot, &user).await?;
    scanner::count_remaining(db, &snapshot, registry::USER_DEPENDENTS, &target).await
}
