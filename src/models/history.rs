use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_ACTION_LEN: usize = 255;
pub const MAX_USER_LEN: usize = 255;

/// An append-only log entry recording something that happened to an item.
///
/// Entries are never updated or deleted. `id` increases with every insert,
/// so ordering by it gives the order in which entries were appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub equipment_id: Uuid,
    /// What was done, e.g. "checked out".
    pub action: String,
    /// Who did it, if known.
    pub user: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a history entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateHistoryInput {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user: Option<String>,
}
