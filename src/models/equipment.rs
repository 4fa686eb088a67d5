use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HistoryEntry;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_LOCATION_LEN: usize = 255;
pub const MAX_NOTES_LEN: usize = 2000;

/// A tracked physical item.
///
/// The `id` is assigned once at creation and is embedded in the item's QR
/// code, so it never changes. After creation only `status` is mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub notes: Option<String>,
    pub status: EquipmentStatus,
    /// Path of the generated QR image, relative to the static directory.
    pub qrcode_path: String,
    pub created_at: DateTime<Utc>,
}

/// Where an item currently is.
///
/// - `Available`: on the shelf, can be issued
/// - `Issued`: handed out to someone
/// - `Lost`: missing
///
/// Any status may move to any other; there is no transition table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Available,
    Issued,
    Lost,
}

impl EquipmentStatus {
    pub const ALL: [EquipmentStatus; 3] = [Self::Available, Self::Issued, Self::Lost];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Issued => "issued",
            Self::Lost => "lost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "issued" => Some(Self::Issued),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }

    /// Human-readable label for the web pages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Issued => "Issued",
            Self::Lost => "Lost",
        }
    }

    /// Bootstrap badge colour for the web pages.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Available => "success",
            Self::Issued => "warning",
            Self::Lost => "danger",
        }
    }
}

/// Input for registering a new item.
///
/// Missing `name` or `location` deserialize as empty strings so that both
/// cases are reported through the same validation path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEquipmentInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for changing an item's status.
///
/// The status is kept as a raw string here and parsed by the inventory so
/// that an unknown value is reported as an invalid status rather than a
/// generic body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdateInput {
    #[serde(default)]
    pub status: String,
}

/// An item together with its full history, oldest entry first.
///
/// The `equipment` fields are flattened into the JSON response, with an
/// additional `history` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentDetail {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub history: Vec<HistoryEntry>,
}
