use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::store::{Slot, StoreError};

pub const DB_FILE: &str = "feesd.sqlite3";

pub fn db_path(workspace: &Path) -> PathBuf {
    workspace.join(DB_FILE)
}

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let conn = Connection::open(db_path(workspace))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_slots(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;

    // Older workspaces created the table before updated_at existed.
    if !table_has_column(&conn, "kv_slots", "updated_at")? {
        conn.execute("ALTER TABLE kv_slots ADD COLUMN updated_at TEXT", [])?;
    }

    Ok(conn)
}

pub fn slot_get(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM kv_slots WHERE key = ?", [key], |r| {
        r.get(0)
    })
    .optional()
}

pub fn slot_set(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO kv_slots(key, value, updated_at) VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        (key, value, &now),
    )?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|n| n == column))
}

/// The durable slot backed by one row of the workspace database.
pub struct SqliteSlot {
    conn: Connection,
    key: String,
}

impl SqliteSlot {
    pub fn new(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn open(workspace: &Path, key: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::new(open_db(workspace)?, key))
    }
}

impl Slot for SqliteSlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        slot_get(&self.conn, &self.key).map_err(|e| StoreError::SlotRead(e.to_string()))
    }

    fn write(&mut self, value: &str) -> Result<(), StoreError> {
        slot_set(&self.conn, &self.key, value).map_err(|e| StoreError::SlotWrite(e.to_string()))
    }
}
