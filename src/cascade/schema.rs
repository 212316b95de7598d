//! Schema presence probe.
//!
//! One read-only query against `information_schema` taken at the start of a
//! cascade. Steps consult the snapshot to distinguish "table never existed
//! here" from a real failure without parsing error text. When the metadata
//! query itself is unavailable the snapshot is unknown and steps fall back
//! to attempting the operation and classifying the resulting error.

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Present,
    Missing,
    Unknown,
}

#[derive(Clone, Debug, Default)]
pub struct SchemaSnapshot {
    columns: Option<HashSet<(String, String)>>,
}

impl SchemaSnapshot {
    /// Probe the live schema. Never fails: an unreadable catalog yields an
    /// unknown snapshot.
    pub async fn load(db: &DatabaseConnection) -> Self {
        let stmt = Statement::from_string(
            db.get_database_backend(),
            "SELECT table_name::text AS table_name, column_name::text AS column_name \
             FROM information_schema.columns WHERE table_schema = current_schema()"
                .to_owned(),
        );
        match db.query_all(stmt).await {
            Ok(rows) => {
                let mut columns = HashSet::with_capacity(rows.len());
                for row in rows {
                    match (
                        row.try_get::<String>("", "table_name"),
                        row.try_get::<String>("", "column_name"),
                    ) {
                        (Ok(table), Ok(column)) => {
                            columns.insert((table, column));
                        }
                        _ => return Self::unknown(),
                    }
                }
                Self {
                    columns: Some(columns),
                }
            }
            Err(err) => {
                log::debug!("schema probe unavailable: {}", err);
                Self::unknown()
            }
        }
    }

    pub fn unknown() -> Self {
        Self { columns: None }
    }

    /// Build a snapshot from explicit (table, column) pairs.
    pub fn from_columns<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            columns: Some(
                pairs
                    .into_iter()
                    .map(|(t, c)| (t.into(), c.into()))
                    .collect(),
            ),
        }
    }

    pub fn has_table(&self, table: &str) -> Presence {
        match &self.columns {
            Some(columns) => {
                if columns.iter().any(|(t, _)| t.as_str() == table) {
                    Presence::Present
                } else {
                    Presence::Missing
                }
            }
            None => Presence::Unknown,
        }
    }

    pub fn has_column(&self, table: &str, column: &str) -> Presence {
        match &self.columns {
            Some(columns) => {
                if columns.contains(&(table.to_owned(), column.to_owned())) {
                    Presence::Present
                } else {
                    Presence::Missing
                }
            }
            None => Presence::Unknown,
        }
    }
}
