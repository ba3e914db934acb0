use crate::error::{Result, StoreError};
use crate::record::{format_timestamp, ImageKind, StoredRecord};
use chrono::Utc;
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const IMAGE_KEY: &str = "backgroundImage";
const TIMESTAMP_KEY: &str = "lastUpdateTime";
const KIND_KEY: &str = "imageType";

/// Owns the persisted wallpaper record.
pub struct ImageStore {
    conn: Mutex<Connection>,
}

impl ImageStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        log::debug!("Opened wallpaper store at {}", db_path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn()?.execute(
            "CREATE TABLE IF NOT EXISTS background_images (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Overwrite the record with `blob`, stamped with the current time.
    pub fn save(&self, blob: &[u8], is_random: bool) -> Result<()> {
        let now = format_timestamp(Utc::now());
        self.save_at(blob, ImageKind::from_random_flag(is_random), &now)
    }

    /// Overwrite all three fields in one transaction.
    pub fn save_at(&self, blob: &[u8], kind: ImageKind, timestamp: &str) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO background_images (key, value) VALUES (?1, ?2)",
            )?;
            stmt.execute(params![IMAGE_KEY, blob])?;
            stmt.execute(params![TIMESTAMP_KEY, timestamp])?;
            stmt.execute(params![KIND_KEY, kind.as_str()])?;
        }
        tx.commit()?;
        log::info!("Saved {} wallpaper ({} bytes)", kind, blob.len());
        Ok(())
    }

    pub fn load(&self) -> Result<StoredRecord> {
        let conn = self.conn()?;
        Ok(StoredRecord {
            blob: get_value(&conn, IMAGE_KEY)?,
            timestamp: get_value(&conn, TIMESTAMP_KEY)?,
            kind: get_value(&conn, KIND_KEY)?,
        })
    }

    pub fn has_image(&self) -> Result<bool> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM background_images WHERE key = ?1",
                [IMAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Remove all three fields in one transaction.
    pub fn clear(&self) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM background_images WHERE key IN (?1, ?2, ?3)",
            params![IMAGE_KEY, TIMESTAMP_KEY, KIND_KEY],
        )?;
        tx.commit()?;
        log::info!("Cleared stored wallpaper");
        Ok(())
    }
}

fn get_value<T: FromSql>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let value = conn
        .query_row(
            "SELECT value FROM background_images WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}
