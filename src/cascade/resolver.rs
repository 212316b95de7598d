//! Sub-cascade resolution.
//!
//! A vendor-type user owns a vendor profile, which owns products; any user
//! may own orders. Those ids must be captured before the first phase runs,
//! because the joins that find them die with the owning rows. Lookups are
//! guarded the same way as delete steps: an absent vendors/products/orders
//! table yields nothing to clean up, not an error.

use super::registry::FilterKey;
use super::schema::{Presence, SchemaSnapshot};
use super::step::{is_missing_relation, truncate_cause};
use super::CascadeError;
use crate::orm::users;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement, Value};

/// The principal plus every owned id the plan's filter keys can ask for.
#[derive(Clone, Debug, Default)]
pub struct CascadeTarget {
    pub user_id: Option<i32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub vendor_id: Option<i32>,
    pub product_ids: Vec<i32>,
    pub order_ids: Vec<i32>,
}

impl CascadeTarget {
    pub fn for_product(product_id: i32) -> Self {
        Self {
            product_ids: vec![product_id],
            ..Default::default()
        }
    }

    /// Concrete filter values for a registry key. Empty means the step has
    /// nothing to match on (no vendor, no orders, no email) and is skipped.
    pub fn values_for(&self, key: FilterKey) -> Vec<Value> {
        match key {
            FilterKey::UserId => self.user_id.into_iter().map(Value::from).collect(),
            FilterKey::UserEmail => self.email.iter().cloned().map(Value::from).collect(),
            FilterKey::UserPhone => self.phone.iter().cloned().map(Value::from).collect(),
            FilterKey::VendorId => self.vendor_id.into_iter().map(Value::from).collect(),
            FilterKey::ProductId => self.product_ids.iter().copied().map(Value::from).collect(),
            FilterKey::OrderId => self.order_ids.iter().copied().map(Value::from).collect(),
        }
    }
}

/// Look up the user's owned vendor profile, its products and the user's
/// orders, before anything is deleted.
pub async fn resolve_user_target(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    user: &users::Model,
) -> Result<CascadeTarget, CascadeError> {
    let vendor_id = select_ids(db, snapshot, "vendors", "user_id", user.id.into())
        .await?
        .into_iter()
        .next();
    let product_ids = match vendor_id {
        Some(vendor_id) => select_ids(db, snapshot, "products", "vendor_id", vendor_id.into()).await?,
        None => Vec::new(),
    };
    let order_ids = select_ids(db, snapshot, "orders", "user_id", user.id.into()).await?;

    Ok(CascadeTarget {
        user_id: Some(user.id),
        email: user.email.clone(),
        phone: user.phone.clone(),
        vendor_id,
        product_ids,
        order_ids,
    })
}

/// `SELECT id FROM table WHERE column = value`, guarded: an absent table is
/// an empty result.
async fn select_ids(
    db: &DatabaseConnection,
    snapshot: &SchemaSnapshot,
    table: &'static str,
    column: &'static str,
    value: Value,
) -> Result<Vec<i32>, CascadeError> {
    if snapshot.has_column(table, column) == Presence::Missing {
        return Ok(Vec::new());
    }
    let sql = format!(r#"SELECT "id" FROM "{}" WHERE "{}" = $1"#, table, column);
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), &sql, vec![value]);
    match db.query_all(stmt).await {
        Ok(rows) => rows
            .iter()
            .map(|row| row.try_get::<i32>("", "id"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| CascadeError::Step {
                table,
                cause: truncate_cause(&err.to_string()),
            }),
        Err(err) => {
            let message = err.to_string();
            if is_missing_relation(&message) {
                Ok(Vec::new())
            } else {
                Err(CascadeError::Step {
                    table,
                    cause: truncate_cause(&message),
                })
            }
        }
    }
}
