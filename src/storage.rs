// Durable key-value storage for the persisted selection
//
// One slot per namespace, holding a JSON string. Last write wins; two
// processes sharing a database are not reconciled.

use crate::error::Result;
use chrono::Utc;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Key-value slot the store reads once at startup and writes on mutation
pub trait SelectionStorage {
    fn load(&self, namespace: &str) -> Result<Option<String>>;
    fn save(&mut self, namespace: &str, value: &str) -> Result<()>;
}

impl<T: SelectionStorage + ?Sized> SelectionStorage for Box<T> {
    fn load(&self, namespace: &str) -> Result<Option<String>> {
        (**self).load(namespace)
    }

    fn save(&mut self, namespace: &str, value: &str) -> Result<()> {
        (**self).save(namespace, value)
    }
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

/// Backend with no durability, for tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.slots.get(namespace).map(String::as_str)
    }
}

impl SelectionStorage for MemoryStorage {
    fn load(&self, namespace: &str) -> Result<Option<String>> {
        Ok(self.slots.get(namespace).cloned())
    }

    fn save(&mut self, namespace: &str, value: &str) -> Result<()> {
        self.slots.insert(namespace.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// SQLITE BACKEND
// ============================================================================

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and make sure the table exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        setup_database(&conn)?;
        debug!("event=storage_open path={}", path.display());
        Ok(SqliteStorage { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStorage { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drop a namespace entirely (used by `selection reset`)
    pub fn remove(&mut self, namespace: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM kv_store WHERE namespace = ?1", params![namespace])?;
        Ok(removed > 0)
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; in-memory databases report "memory" and that is fine
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            namespace TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl SelectionStorage for SqliteStorage {
    fn load(&self, namespace: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE namespace = ?1",
                params![namespace],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, namespace: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (namespace, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![namespace, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load("ns").unwrap().is_none());

        storage.save("ns", "{}").unwrap();
        assert_eq!(storage.load("ns").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.get("ns"), Some("{}"));
    }

    #[test]
    fn test_sqlite_upsert() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(storage.load("inventory-storage").unwrap().is_none());

        storage.save("inventory-storage", r#"{"a":1}"#).unwrap();
        storage.save("inventory-storage", r#"{"a":2}"#).unwrap();

        assert_eq!(
            storage.load("inventory-storage").unwrap().as_deref(),
            Some(r#"{"a":2}"#)
        );

        let rows: i64 = storage
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_sqlite_namespaces_are_isolated() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        storage.save("one", "1").unwrap();
        storage.save("two", "2").unwrap();

        assert_eq!(storage.load("one").unwrap().as_deref(), Some("1"));
        assert!(storage.remove("one").unwrap());
        assert!(!storage.remove("one").unwrap());
        assert!(storage.load("one").unwrap().is_none());
        assert_eq!(storage.load("two").unwrap().as_deref(), Some("2"));
    }
}
