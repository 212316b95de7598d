//! Test database setup and management
#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::env;

/// The email every cascade test treats as undeletable. Exported so tests
/// assert against the same value the guard reads.
pub const PROTECTED_TEST_EMAIL: &str = "root@bazari.test";

/// Connect to the test database named by TEST_DATABASE_URL and make sure the
/// marketplace tables exist. Returns None when the variable is unset so the
/// suite degrades to a skip instead of a failure on machines without
/// Postgres.
pub async fn setup_test_database() -> Option<DatabaseConnection> {
    // The guard reads this on first use; set it before any cascade call.
    env::set_var("PROTECTED_EMAILS", PROTECTED_TEST_EMAIL);

    let database_url = env::var("TEST_DATABASE_URL").ok()?;
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    create_schema(&db).await.expect("Failed to create schema");
    Some(db)
}

/// Create the marketplace tables. Deliberately leaves out the optional
/// deployment-specific tables the registry also names (user_preferences,
/// activity_logs, fraud_flags, blacklist), so every run exercises the
/// schema-drift path. Foreign keys are plain NO ACTION: the store does not
/// cascade on our behalf, the engine's ordering has to be right.
async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let ddl = [
        "CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            email VARCHAR(255) UNIQUE,
            phone VARCHAR(32),
            role VARCHAR(16) NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS vendors (
            id SERIAL PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id),
            shop_name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS drivers (
            id SERIAL PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id),
            vehicle VARCHAR(255),
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS products (
            id SERIAL PRIMARY KEY,
            vendor_id INT NOT NULL REFERENCES vendors (id),
            name VARCHAR(255) NOT NULL,
            price_cents INT NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS orders (
            id SERIAL PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id),
            driver_id INT REFERENCES drivers (id),
            status VARCHAR(32) NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS order_items (
            id SERIAL PRIMARY KEY,
            order_id INT NOT NULL REFERENCES orders (id),
            product_id INT NOT NULL REFERENCES products (id),
            quantity INT NOT NULL,
            price_cents INT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS cart_items (
            id SERIAL PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id),
            product_id INT NOT NULL REFERENCES products (id),
            quantity INT NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS reviews (
            id SERIAL PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id),
            product_id INT NOT NULL REFERENCES products (id),
            rating INT NOT NULL,
            body TEXT,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS payments (
            id SERIAL PRIMARY KEY,
            order_id INT NOT NULL REFERENCES orders (id),
            amount_cents INT NOT NULL,
            provider_ref VARCHAR(255),
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS chat_rooms (
            id SERIAL PRIMARY KEY,
            created_by INT NOT NULL REFERENCES users (id),
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS chat_messages (
            id SERIAL PRIMARY KEY,
            room_id INT NOT NULL REFERENCES chat_rooms (id),
            sender_id INT NOT NULL REFERENCES users (id),
            body TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS notifications (
            id SERIAL PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id),
            kind VARCHAR(64) NOT NULL,
            body VARCHAR(255) NOT NULL,
            is_read BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS verification_codes (
            id SERIAL PRIMARY KEY,
            email VARCHAR(255),
            phone VARCHAR(32),
            code VARCHAR(16) NOT NULL,
            expires_at TIMESTAMP NOT NULL,
            created_at TIMESTAMP NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS security_events (
            id SERIAL PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id),
            actor_id INT REFERENCES users (id),
            kind VARCHAR(64) NOT NULL,
            detail TEXT,
            created_at TIMESTAMP NOT NULL
        )",
    ];
    for sql in ddl {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_owned(),
        ))
        .await?;
    }
    Ok(())
}

/// Remove all test data between tests. RESTART IDENTITY resets the id
/// sequences so fixture ids are predictable per test.
pub async fn cleanup_test_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "TRUNCATE TABLE
            security_events,
            verification_codes,
            notifications,
            chat_messages,
            chat_rooms,
            payments,
            reviews,
            cart_items,
            order_items,
            orders,
            products,
            drivers,
            vendors,
            users
        RESTART IDENTITY CASCADE"
            .to_owned(),
    ))
    .await?;
    Ok(())
}

/// Row count helper for post-cascade assertions, bypassing the entity layer.
pub async fn count_rows(
    db: &DatabaseConnection,
    table: &str,
    column: &str,
    value: i32,
) -> Result<i64, DbErr> {
    let sql = format!(
        r#"SELECT COUNT(*) AS count FROM "{}" WHERE "{}" = $1"#,
        table, column
    );
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            &sql,
            vec![value.into()],
        ))
        .await?;
    match row {
        Some(row) => row.try_get::<i64>("", "count"),
        None => Ok(0),
    }
}
