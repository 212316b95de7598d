//! Dependent-table registry and phase computation.
//!
//! The dependency knowledge is data: a flat registry of (table, column,
//! filter key) triples plus the foreign-key edges between those tables. The
//! phase order is computed from the edges, not hand-maintained, so a table
//! is only ever processed after every registry table that references it.

use super::CascadeError;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Which value of the cascade target a step filters on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKey {
    UserId,
    /// Alternate key: verification rows carry no user id.
    UserEmail,
    UserPhone,
    VendorId,
    ProductId,
    OrderId,
}

/// One table/column pair holding references to a deletion target.
#[derive(Debug, PartialEq, Eq)]
pub struct DependentTable {
    pub table: &'static str,
    pub column: &'static str,
    pub key: FilterKey,
}

const fn dep(table: &'static str, column: &'static str, key: FilterKey) -> DependentTable {
    DependentTable { table, column, key }
}

/// Every known table/column referencing a user, directly or through its
/// owned vendor, products and orders. Also the fixed registry the
/// blocking-reference scanner counts against. Some of these tables only
/// exist in certain deployments; the guarded step absorbs their absence.
pub static USER_DEPENDENTS: &[DependentTable] = &[
    dep("user_preferences", "user_id", FilterKey::UserId),
    dep("activity_logs", "user_id", FilterKey::UserId),
    dep("security_events", "user_id", FilterKey::UserId),
    dep("security_events", "actor_id", FilterKey::UserId),
    dep("fraud_flags", "user_id", FilterKey::UserId),
    dep("blacklist", "user_id", FilterKey::UserId),
    dep("reviews", "product_id", FilterKey::ProductId),
    dep("cart_items", "product_id", FilterKey::ProductId),
    dep("order_items", "product_id", FilterKey::ProductId),
    dep("products", "vendor_id", FilterKey::VendorId),
    dep("reviews", "user_id", FilterKey::UserId),
    dep("order_items", "order_id", FilterKey::OrderId),
    dep("payments", "order_id", FilterKey::OrderId),
    dep("orders", "user_id", FilterKey::UserId),
    dep("cart_items", "user_id", FilterKey::UserId),
    dep("chat_messages", "sender_id", FilterKey::UserId),
    dep("chat_rooms", "created_by", FilterKey::UserId),
    dep("notifications", "user_id", FilterKey::UserId),
    dep("verification_codes", "email", FilterKey::UserEmail),
    dep("verification_codes", "phone", FilterKey::UserPhone),
    dep("vendors", "user_id", FilterKey::UserId),
    dep("drivers", "user_id", FilterKey::UserId),
];

/// Tables referencing a product.
pub static PRODUCT_DEPENDENTS: &[DependentTable] = &[
    dep("reviews", "product_id", FilterKey::ProductId),
    dep("cart_items", "product_id", FilterKey::ProductId),
    dep("order_items", "product_id", FilterKey::ProductId),
];

/// (child, parent): rows of `child` hold a foreign key into `parent`, so
/// `child` must be cleared before `parent`.
pub static FK_EDGES: &[(&str, &str)] = &[
    ("reviews", "products"),
    ("cart_items", "products"),
    ("order_items", "products"),
    ("order_items", "orders"),
    ("payments", "orders"),
    ("products", "vendors"),
    ("orders", "drivers"),
    ("chat_messages", "chat_rooms"),
];

pub type Phases = Vec<Vec<&'static DependentTable>>;

/// Layer the registry by longest referencing chain: phase 0 holds tables no
/// registry table references, phase n+1 the tables whose every referencing
/// table sits in phase n or earlier. Fails on a cyclic edge set.
pub fn build_phases(
    entries: &'static [DependentTable],
    edges: &[(&'static str, &'static str)],
) -> Result<Phases, &'static str> {
    let tables: HashSet<&str> = entries.iter().map(|e| e.table).collect();
    let mut depths: HashMap<&'static str, usize> = HashMap::new();

    fn depth_of(
        table: &'static str,
        edges: &[(&'static str, &'static str)],
        tables: &HashSet<&str>,
        depths: &mut HashMap<&'static str, usize>,
        visiting: &mut Vec<&'static str>,
    ) -> Result<usize, &'static str> {
        if let Some(depth) = depths.get(table) {
            return Ok(*depth);
        }
        if visiting.contains(&table) {
            return Err(table);
        }
        visiting.push(table);
        let mut depth = 0;
        for &(child, parent) in edges {
            if parent == table && tables.contains(child) {
                depth = depth.max(depth_of(child, edges, tables, depths, visiting)? + 1);
            }
        }
        visiting.pop();
        depths.insert(table, depth);
        Ok(depth)
    }

    let mut max_depth = 0;
    for entry in entries {
        let mut visiting = Vec::new();
        max_depth = max_depth.max(depth_of(
            entry.table,
            edges,
            &tables,
            &mut depths,
            &mut visiting,
        )?);
    }

    let mut phases: Phases = vec![Vec::new(); max_depth + 1];
    for entry in entries {
        phases[depths[entry.table]].push(entry);
    }
    phases.retain(|phase| !phase.is_empty());
    Ok(phases)
}

static USER_PHASES: Lazy<Result<Phases, &'static str>> =
    Lazy::new(|| build_phases(USER_DEPENDENTS, FK_EDGES));

static PRODUCT_PHASES: Lazy<Result<Phases, &'static str>> =
    Lazy::new(|| build_phases(PRODUCT_DEPENDENTS, FK_EDGES));

pub fn user_phases() -> Result<&'static Phases, CascadeError> {
    USER_PHASES.as_ref().map_err(|table| CascadeError::Cycle(*table))
}

pub fn product_phases() -> Result<&'static Phases, CascadeError> {
    PRODUCT_PHASES
        .as_ref()
        .map_err(|table| CascadeError::Cycle(*table))
}
