use crate::error::{StoreError, StoreResult};
use crate::models::{AdminMetrics, FieldStats, QrRecord};
use crate::store::{SessionStore, StoreKey};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tauri::AppHandle;

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(app_handle: &AppHandle) -> StoreResult<Self> {
        let app_dir = app_handle
            .path()
            .app_data_dir()
            .map_err(|e| StoreError::Backend(format!("no app data dir: {e}")))?;

        std::fs::create_dir_all(&app_dir).map_err(|e| {
            StoreError::Backend(format!("failed to create {}: {e}", app_dir.display()))
        })?;

        let db_path: PathBuf = app_dir.join("field_booking.db");
        Self::open(&db_path)
    }

    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened session database");

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Database {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    pub fn initialize(&self) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            -- One row per client-held value (draft, receipt, signed-in user)
            CREATE TABLE IF NOT EXISTS session_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Completed reservations, kept for the admin metrics
            CREATE TABLE IF NOT EXISTS reservations (
                reservation_id TEXT PRIMARY KEY,
                field_id TEXT NOT NULL,
                field_name TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                total_price REAL NOT NULL,
                paid_at TEXT NOT NULL,
                booked_by TEXT
            );
            ",
        )?;

        Ok(())
    }

    pub fn record_reservation(
        &self,
        receipt: &QrRecord,
        booked_by: Option<&str>,
    ) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT OR IGNORE INTO reservations
                (reservation_id, field_id, field_name, start_time, end_time,
                 total_price, paid_at, booked_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                receipt.reservation_id,
                receipt.resource_id,
                receipt.resource_name,
                receipt.start_time,
                receipt.end_time,
                receipt.total_price,
                receipt.timestamp,
                booked_by,
            ],
        )?;

        Ok(())
    }

    pub fn admin_metrics(&self) -> StoreResult<AdminMetrics> {
        let conn = self.lock()?;

        let (total_reservations, total_revenue): (i64, f64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(total_price), 0) FROM reservations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = conn.prepare(
            "SELECT field_id, MAX(field_name), COUNT(*), COALESCE(SUM(total_price), 0)
             FROM reservations
             GROUP BY field_id
             ORDER BY COUNT(*) DESC, field_id ASC",
        )?;

        let field_stats = stmt
            .query_map([], |row| {
                Ok(FieldStats {
                    field_id: row.get(0)?,
                    field_name: row.get(1)?,
                    reservation_count: row.get(2)?,
                    revenue: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AdminMetrics {
            total_reservations,
            total_revenue,
            field_stats,
        })
    }
}

impl SessionStore for Database {
    fn get(&self, key: StoreKey) -> StoreResult<Option<String>> {
        let conn = self.lock()?;

        let value = conn
            .query_row(
                "SELECT value FROM session_store WHERE key = ?1",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO session_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![key.as_str(), value],
        )?;

        Ok(())
    }

    fn clear(&self, key: StoreKey) -> StoreResult<()> {
        let conn = self.lock()?;

        conn.execute("DELETE FROM session_store WHERE key = ?1", [key.as_str()])?;

        Ok(())
    }

    fn replace(&self, set: StoreKey, value: &str, clear: StoreKey) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO session_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![set.as_str(), value],
        )?;
        tx.execute("DELETE FROM session_store WHERE key = ?1", [clear.as_str()])?;

        tx.commit()?;
        Ok(())
    }
}

use crate::state::AppState;
use tauri::Manager;

pub trait DatabaseExt {
    fn db(&self) -> &Database;
}

impl DatabaseExt for AppHandle {
    fn db(&self) -> &Database {
        self.state::<AppState>().inner().db.as_ref()
    }
}
