//! Service package model
//!
//! Packages are owned by the (out-of-scope) package module; the booking
//! engine only ever reads them to capture a snapshot at creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service package entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackage {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub duration_hours: f64,
    pub features: Vec<String>,
    pub service_type: String,
    pub is_active: bool,
}
