//! Global database pool.
//!
//! Initialized once at startup from `DATABASE_URL`; everything else borrows
//! the connection through [`get_db_pool`] or takes a `&DatabaseConnection`
//! argument so tests can supply their own.

use once_cell::sync::OnceCell;
use sea_orm::{Database, DatabaseConnection};

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connect the global pool. Panics if the database is unreachable or if
/// called twice; both are startup defects, not runtime conditions.
pub async fn init_db(database_url: String) {
    let pool = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database.");
    DB_POOL
        .set(pool)
        .expect("init_db() called more than once.");
}

pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL
        .get()
        .expect("get_db_pool() called before init_db().")
}
