mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::*;

const EQUIPMENT_COLUMNS: &str = "id, name, location, notes, status, qrcode_path, created_at";
const HISTORY_COLUMNS: &str = "id, equipment_id, action, user, created_at";

/// Handle to the inventory database.
///
/// Cloning is cheap and every clone shares the same connection. Each
/// operation holds the connection lock only for its own duration.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Equipment operations
    // ============================================================

    pub fn insert_equipment(&self, equipment: &Equipment) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO equipment (id, name, location, notes, status, qrcode_path, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                equipment.id.to_string(),
                &equipment.name,
                &equipment.location,
                &equipment.notes,
                equipment.status.as_str(),
                &equipment.qrcode_path,
                equipment.created_at.to_rfc3339(),
            ),
        )?;
        Ok(())
    }

    pub fn list_equipment(&self) -> Result<Vec<Equipment>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipment ORDER BY name, created_at"
        ))?;

        let equipment = stmt
            .query_map([], equipment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(equipment)
    }

    pub fn get_equipment(&self, id: Uuid) -> Result<Option<Equipment>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        query_equipment(&conn, id)
    }

    /// Fetch an item together with its history, oldest entry first.
    pub fn get_equipment_detail(&self, id: Uuid) -> Result<Option<EquipmentDetail>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let Some(equipment) = query_equipment(&conn, id)? else {
            return Ok(None);
        };
        let history = query_history(&conn, id)?;
        Ok(Some(EquipmentDetail { equipment, history }))
    }

    /// Set the status of an item. Returns `None` if the item does not exist.
    pub fn update_equipment_status(
        &self,
        id: Uuid,
        status: EquipmentStatus,
    ) -> Result<Option<Equipment>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(
            "UPDATE equipment SET status = ? WHERE id = ?",
            (status.as_str(), id.to_string()),
        )?;

        if rows == 0 {
            return Ok(None);
        }

        query_equipment(&conn, id)
    }

    // ============================================================
    // History operations
    // ============================================================

    /// Append a history entry stamped with the current time.
    ///
    /// Returns `None` if the item does not exist. The existence check and the
    /// insert run in one transaction.
    pub fn insert_history_entry(
        &self,
        equipment_id: Uuid,
        input: CreateHistoryInput,
    ) -> Result<Option<HistoryEntry>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM equipment WHERE id = ?",
                [equipment_id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();

        if !exists {
            return Ok(None);
        }

        let now = Utc::now();
        tx.execute(
            "INSERT INTO history (equipment_id, action, user, created_at) VALUES (?, ?, ?, ?)",
            (
                equipment_id.to_string(),
                &input.action,
                &input.user,
                now.to_rfc3339(),
            ),
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Some(HistoryEntry {
            id,
            equipment_id,
            action: input.action,
            user: input.user,
            created_at: now,
        }))
    }

    pub fn get_history(&self, equipment_id: Uuid) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        query_history(&conn, equipment_id)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn query_equipment(conn: &Connection, id: Uuid) -> Result<Option<Equipment>> {
    let equipment = conn
        .query_row(
            &format!("SELECT {EQUIPMENT_COLUMNS} FROM equipment WHERE id = ?"),
            [id.to_string()],
            equipment_from_row,
        )
        .optional()?;
    Ok(equipment)
}

fn query_history(conn: &Connection, equipment_id: Uuid) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HISTORY_COLUMNS} FROM history WHERE equipment_id = ? ORDER BY id"
    ))?;

    let entries = stmt
        .query_map([equipment_id.to_string()], history_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

fn equipment_from_row(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        location: row.get(2)?,
        notes: row.get(3)?,
        status: EquipmentStatus::from_str(&row.get::<_, String>(4)?)
            .unwrap_or(EquipmentStatus::Available),
        qrcode_path: row.get(5)?,
        created_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        equipment_id: parse_uuid(row.get::<_, String>(1)?),
        action: row.get(2)?,
        user: row.get(3)?,
        created_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
