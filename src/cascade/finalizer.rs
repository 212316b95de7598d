//! Root finalization.
//!
//! After every dependent phase succeeds, delete the root row itself. A
//! failed direct delete is re-checked against the store (a concurrent
//! deletion or a store-level cascade may have won the race), then retried
//! once through a raw statement that bypasses the entity layer, and only
//! then escalated with a blocking-reference report.

use super::registry::{PRODUCT_DEPENDENTS, USER_DEPENDENTS};
use super::resolver::CascadeTarget;
use super::scanner;
use super::schema::SchemaSnapshot;
use super::CascadeError;
use crate::orm::{products, users};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Statement};

pub async fn finalize_user(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    target: &CascadeTarget,
    user_id: i32,
) -> Result<(), CascadeError> {
    let direct_err = match users::Entity::delete_by_id(user_id).exec(db).await {
        Ok(result) => {
            log::info!(
                "cascade: user {} finalized ({} row)",
                user_id,
                result.rows_affected
            );
            return Ok(());
        }
        Err(err) => err,
    };
    log::warn!(
        "cascade: direct delete of user {} failed: {}",
        user_id,
        direct_err
    );

    if already_gone(users::Entity::find_by_id(user_id).one(db).await) {
        log::info!("cascade: user {} gone after failed delete, treating as success", user_id);
        return Ok(());
    }

    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"DELETE FROM "users" WHERE "id" = $1"#,
        vec![user_id.into()],
    );
    match db.execute(stmt).await {
        Ok(_) => {
            if already_gone(users::Entity::find_by_id(user_id).one(db).await) {
                log::warn!(
                    "cascade: raw fallback removed user {} where the entity delete could not",
                    user_id
                );
                return Ok(());
            }
        }
        Err(err) => log::warn!("cascade: raw fallback for user {} failed: {}", user_id, err),
    }

    let report = scanner::count_remaining(db, snapshot, USER_DEPENDENTS, target)
        .await
        .unwrap_or_default();
    Err(CascadeError::Finalization {
        entity: "user",
        id: user_id,
        report,
    })
}

pub async fn finalize_product(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    target: &CascadeTarget,
    product_id: i32,
) -> Result<(), CascadeError> {
    let direct_err = match products::Entity::delete_by_id(product_id).exec(db).await {
        Ok(result) => {
            log::info!(
                "cascade: product {} finalized ({} row)",
                product_id,
                result.rows_affected
            );
            return Ok(());
        }
        Err(err) => err,
    };
    log::warn!(
        "cascade: direct delete of product {} failed: {}",
        product_id,
        direct_err
    );

    if already_gone(products::Entity::find_by_id(product_id).one(db).await) {
        return Ok(());
    }

    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        r#"DELETE FROM "products" WHERE "id" = $1"#,
        vec![product_id.into()],
    );
    match db.execute(stmt).await {
        Ok(_) => {
            if already_gone(products::Entity::find_by_id(product_id).one(db).await) {
                log::warn!(
                    "cascade: raw fallback removed product {} where the entity delete could not",
                    product_id
                );
                return Ok(());
            }
        }
        Err(err) => log::warn!(
            "cascade: raw fallback for product {} failed: {}",
            product_id,
            err
        ),
    }

    let report = scanner::count_remaining(db, snapshot, PRODUCT_DEPENDENTS, target)
        .await
        .unwrap_or_default();
    Err(CascadeError::Finalization {
        entity: "product",
        id: product_id,
        report,
    })
}

/// An existence re-check only counts when it positively confirms absence; a
/// failed query keeps the pessimistic path.
fn already_gone<M>(lookup: Result<Option<M>, sea_orm::DbErr>) -> bool {
    matches!(lookup, Ok(None))
}
