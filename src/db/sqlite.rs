// src/db/sqlite.rs
//! SQLite-backed record store
//!
//! Two tables, indexed the way the app queries them (`moles` by label and
//! gender, `entries` by mole and date). Each row keeps the full record as
//! JSON in `body`, so passthrough fields survive a store round trip, and an
//! `ord` column that preserves the order records were written in.

use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use crate::aliases::StoreKey;
use crate::config::Config;
use crate::db::store::RecordStore;
use crate::error::StoreError;
use crate::model::{Dataset, Mole, MoleEntry};

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS moles (
        id         INTEGER PRIMARY KEY,
        ord        INTEGER NOT NULL,
        label      TEXT NOT NULL,
        gender     TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        body       TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries (
        id      INTEGER PRIMARY KEY,
        ord     INTEGER NOT NULL,
        mole_id INTEGER NOT NULL REFERENCES moles(id) ON DELETE CASCADE,
        date    INTEGER NOT NULL,
        body    TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_moles_label ON moles(label);
    CREATE INDEX IF NOT EXISTS idx_moles_gender ON moles(gender);
    CREATE INDEX IF NOT EXISTS idx_entries_mole_id ON entries(mole_id);
    CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
"#;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the store at `path`. With a key the file is
    /// an SQLCipher database.
    pub fn open(path: impl AsRef<Path>, key: Option<&StoreKey>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Unavailable(format!("{}: {e}", parent.display())))?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        if let Some(key) = key {
            conn.pragma_update(None, "key", key.expose_secret().as_str())?;
        }
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open the store named by the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let key = config.store_key();
        Self::open(config.store_db_path(), key.as_ref())
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn read_moles(&self) -> Result<Vec<Mole>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM moles ORDER BY ord, id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut moles = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let mole: Mole = serde_json::from_str(&body)
                .map_err(|e| StoreError::Decode(format!("mole {id}: {e}")))?;
            moles.push(mole);
        }
        Ok(moles)
    }

    fn read_entries(&self) -> Result<Vec<MoleEntry>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM entries ORDER BY ord, id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let entry: MoleEntry = serde_json::from_str(&body)
                .map_err(|e| StoreError::Decode(format!("entry {id}: {e}")))?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

impl RecordStore for SqliteStore {
    fn read_all_records(&self) -> Result<Dataset, StoreError> {
        // One read transaction so moles and entries come from the same snapshot
        let tx = self.conn.unchecked_transaction()?;
        let moles = self.read_moles()?;
        let entries = self.read_entries()?;
        tx.commit()?;
        Ok(Dataset::new(moles, entries))
    }

    fn replace_all_records(&mut self, dataset: &Dataset) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM entries", [])?;
        tx.execute("DELETE FROM moles", [])?;

        {
            let mut insert_mole = tx.prepare(
                "INSERT INTO moles (id, ord, label, gender, created_at, body)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (ord, mole) in dataset.moles.iter().enumerate() {
                let body = serde_json::to_string(mole)
                    .map_err(|e| StoreError::Decode(format!("mole {}: {e}", mole.id)))?;
                insert_mole.execute(params![
                    mole.id,
                    ord as i64,
                    mole.label,
                    mole.gender.as_str(),
                    mole.created_at,
                    body
                ])?;
            }

            let mut insert_entry = tx.prepare(
                "INSERT INTO entries (id, ord, mole_id, date, body)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (ord, entry) in dataset.entries.iter().enumerate() {
                let body = serde_json::to_string(entry)
                    .map_err(|e| StoreError::Decode(format!("entry {}: {e}", entry.id)))?;
                insert_entry.execute(params![
                    entry.id,
                    ord as i64,
                    entry.mole_id,
                    entry.date,
                    body
                ])?;
            }
        }

        // Dropping `tx` without commit rolls everything back
        tx.commit()?;
        debug!(
            moles = dataset.moles.len(),
            entries = dataset.entries.len(),
            "local store replaced"
        );
        Ok(())
    }
}
