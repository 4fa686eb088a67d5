//! Inventory operations: create, list, fetch, change status, append history.
//!
//! Input is validated here before anything touches storage. Creation is the
//! only operation with a side effect outside the database: the QR image is
//! written first and the row is inserted only if that succeeded, so every
//! stored item has a retrievable code.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::codes::{CodeError, CodeGenerator};
use crate::db::Database;
use crate::models::*;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(String),

    #[error("Equipment not found")]
    NotFound,

    #[error("Invalid status '{0}': expected one of available, issued, lost")]
    InvalidStatus(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error(transparent)]
    Code(#[from] CodeError),
}

pub type Result<T> = std::result::Result<T, InventoryError>;

/// Entry point for all inventory operations.
///
/// Holds the database handle and the code generator. Cloning shares both,
/// so one instance is handed to every request.
#[derive(Clone)]
pub struct Inventory {
    db: Database,
    codes: CodeGenerator,
}

impl Inventory {
    pub fn new(db: Database, codes: CodeGenerator) -> Self {
        Self { db, codes }
    }

    pub fn codes(&self) -> &CodeGenerator {
        &self.codes
    }

    /// Register a new item with status `available`.
    pub fn create(&self, input: CreateEquipmentInput) -> Result<Equipment> {
        let input = validate_create(input)?;

        let id = Uuid::new_v4();
        let qrcode_path = self.codes.generate(id)?;

        let equipment = Equipment {
            id,
            name: input.name,
            location: input.location,
            notes: input.notes,
            status: EquipmentStatus::Available,
            qrcode_path,
            created_at: Utc::now(),
        };

        if let Err(e) = self.db.insert_equipment(&equipment) {
            self.codes.discard(id);
            return Err(e.into());
        }

        tracing::info!("Created equipment {} ({})", equipment.id, equipment.name);
        Ok(equipment)
    }

    pub fn list(&self) -> Result<Vec<Equipment>> {
        Ok(self.db.list_equipment()?)
    }

    /// Look up an item and its history by identifier.
    ///
    /// Identifiers that are not UUIDs cannot exist and are reported as not
    /// found.
    pub fn fetch(&self, id: &str) -> Result<EquipmentDetail> {
        let id = parse_id(id)?;
        self.db
            .get_equipment_detail(id)?
            .ok_or(InventoryError::NotFound)
    }

    /// Move an item to `status`. Any status may follow any other.
    pub fn change_status(&self, id: &str, status: &str) -> Result<Equipment> {
        let status = EquipmentStatus::from_str(status.trim())
            .ok_or_else(|| InventoryError::InvalidStatus(status.to_string()))?;
        let id = parse_id(id)?;

        let equipment = self
            .db
            .update_equipment_status(id, status)?
            .ok_or(InventoryError::NotFound)?;

        tracing::info!("Equipment {} is now {}", id, status.as_str());
        Ok(equipment)
    }

    /// Append a history entry and return the item with its updated history.
    pub fn append_history(&self, id: &str, input: CreateHistoryInput) -> Result<EquipmentDetail> {
        let input = validate_history(input)?;
        let id = parse_id(id)?;

        self.db
            .insert_history_entry(id, input)?
            .ok_or(InventoryError::NotFound)?;

        self.fetch(&id.to_string())
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| InventoryError::NotFound)
}

fn validate_create(input: CreateEquipmentInput) -> Result<CreateEquipmentInput> {
    let name = required("name", &input.name, MAX_NAME_LEN)?;
    let location = required("location", &input.location, MAX_LOCATION_LEN)?;
    let notes = optional("notes", input.notes, MAX_NOTES_LEN)?;

    Ok(CreateEquipmentInput {
        name,
        location,
        notes,
    })
}

fn validate_history(input: CreateHistoryInput) -> Result<CreateHistoryInput> {
    let action = required("action", &input.action, MAX_ACTION_LEN)?;
    let user = optional("user", input.user, MAX_USER_LEN)?;

    Ok(CreateHistoryInput { action, user })
}

fn required(field: &str, value: &str, max_len: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InventoryError::Validation(format!("{} is required", field)));
    }
    check_len(field, value, max_len)?;
    Ok(value.to_string())
}

/// Blank optional values are stored as absent.
fn optional(field: &str, value: Option<String>, max_len: usize) -> Result<Option<String>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_len(field, v, max_len)?;
            Ok(Some(v.to_string()))
        }
    }
}

fn check_len(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.chars().count() > max_len {
        return Err(InventoryError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}
