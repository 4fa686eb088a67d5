//! Equipment inventory tracking with scannable QR codes.
//!
//! Items are registered through the web UI or the JSON API, get a UUID and
//! a QR code pointing at their detail page, and carry a status plus an
//! append-only history.

pub mod api;
pub mod codes;
pub mod config;
pub mod db;
pub mod inventory;
pub mod models;
