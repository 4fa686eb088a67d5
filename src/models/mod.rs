//! Domain models for the inventory.
//!
//! - [`Equipment`]: a tracked item with a fixed identifier and a mutable
//!   [`EquipmentStatus`].
//! - [`HistoryEntry`]: append-only log of actions taken on an item.
//! - [`EquipmentDetail`]: an item plus its history, as returned by lookups.

mod equipment;
mod history;

pub use equipment::*;
pub use history::*;
