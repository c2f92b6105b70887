//! SQLite-backed ledger of checks and their items.
//!
//! The store exclusively owns the persisted rows. Parsers hand it identity-
//! less [`LineItem`]s; ids are assigned here, on insert. Every operation is
//! a single consistent transition; multi-row writes run inside one
//! transaction, so a check is either fully visible or absent.

use chek_core::{LineItem, Money};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::sync::Mutex;

/// A store operation that failed as a whole. Callers must not assume
/// partial success.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

/// Ids assigned when a check was persisted, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCheck {
    pub check_id: i64,
    pub item_ids: Vec<i64>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS checks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    check_id INTEGER NOT NULL REFERENCES checks(id) ON DELETE CASCADE,
    date TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    amount_cents INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_items_date ON items(date);
";

/// The ledger's single shared resource: one SQLite connection behind an
/// async mutex. All mutation goes through these methods.
pub struct LedgerStore {
    conn: Mutex<Connection>,
}

impl LedgerStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        // Cascade from checks to items depends on this pragma.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Persist one ingestion event as a new check owning all of `items`.
    ///
    /// Atomic: the check row and every item row commit together or not at
    /// all. Fresh ids are assigned in input order.
    pub async fn insert_check(&self, items: &[LineItem]) -> Result<SavedCheck, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let created_at = chrono::Local::now().date_naive();
        tx.execute(
            "INSERT INTO checks (created_at) VALUES (?1)",
            params![created_at.to_string()],
        )?;
        let check_id = tx.last_insert_rowid();

        let mut item_ids = Vec::with_capacity(items.len());
        for item in items {
            tx.execute(
                "INSERT INTO items (check_id, date, name, category, amount_cents)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    check_id,
                    item.date.to_string(),
                    item.name,
                    item.category,
                    item.amount.cents()
                ],
            )?;
            item_ids.push(tx.last_insert_rowid());
        }

        tx.commit()?;
        tracing::debug!(check_id, items = item_ids.len(), "check persisted");
        Ok(SavedCheck { check_id, item_ids })
    }

    /// Category totals over the inclusive `[from, to]` date range.
    /// No matching items is an empty map, not an error.
    pub async fn aggregate(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeMap<String, Money>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount_cents) FROM items
             WHERE date BETWEEN ?1 AND ?2 GROUP BY category",
        )?;
        let rows = stmt.query_map(params![from.to_string(), to.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut totals = BTreeMap::new();
        for row in rows {
            let (category, cents) = row?;
            totals.insert(category, Money::from_cents(cents));
        }
        Ok(totals)
    }

    /// Remove a check and, via cascade, every item it owns. `false` means
    /// no such check existed, a reported outcome rather than a failure.
    pub async fn delete_check(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn.execute("DELETE FROM checks WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Remove a single item. The owning check survives even when this
    /// empties it.
    pub async fn delete_item(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Total (check, item) row counts, for operational visibility.
    pub async fn debug_counts(&self) -> Result<(u64, u64), StoreError> {
        let conn = self.conn.lock().await;
        let checks: u64 = conn.query_row("SELECT COUNT(*) FROM checks", [], |r| r.get(0))?;
        let items: u64 = conn.query_row("SELECT COUNT(*) FROM items", [], |r| r.get(0))?;
        Ok((checks, items))
    }
}
