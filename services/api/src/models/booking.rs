//! Booking model and request payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::package::ServicePackage;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Rejected,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "inProgress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Terminal statuses have no outbound transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Rejected
        )
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "inProgress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "rejected" => Ok(BookingStatus::Rejected),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status, tracked on the booking but not governed by the
/// transition engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
    PartiallyPaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::PartiallyPaid => "partiallyPaid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            "failed" => Ok(PaymentStatus::Failed),
            "partiallyPaid" => Ok(PaymentStatus::PartiallyPaid),
            other => Err(format!("unknown payment status '{other}'")),
        }
    }
}

/// Immutable copy of the purchased package, captured at booking creation.
/// Later edits or deletion of the live package never rewrite this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSnapshot {
    pub id: Uuid,
    pub name: String,
    pub base_price: f64,
    pub duration_hours: f64,
    pub features: Vec<String>,
    pub description: String,
    pub service_type: String,
    pub is_active: bool,
}

impl From<&ServicePackage> for PackageSnapshot {
    fn from(package: &ServicePackage) -> Self {
        PackageSnapshot {
            id: package.id,
            name: package.name.clone(),
            base_price: package.base_price,
            duration_hours: package.duration_hours,
            features: package.features.clone(),
            description: package.description.clone(),
            service_type: package.service_type.clone(),
            is_active: package.is_active,
        }
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_provider_id: Uuid,
    pub package_id: Uuid,
    pub package_snapshot: PackageSnapshot,
    pub service_type: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
    pub event_type: String,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking creation payload. Carries no `status` field: every booking
/// starts out `pending`, and no caller-supplied value can override that.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBookingRequest {
    pub service_provider_id: Uuid,
    pub package_id: Uuid,
    pub service_type: String,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_location: String,
    pub event_type: String,
    pub total_amount: f64,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

/// Generic field-update payload. Carries no `status` field either: status
/// changes only go through the dedicated transition endpoint, and unknown
/// fields (including `status`) are rejected outright.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBookingRequest {
    pub service_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub event_type: Option<String>,
    pub total_amount: Option<f64>,
    /// `None` when the field was omitted; `Some(None)` when an explicit
    /// JSON null asks to clear the stored value
    #[serde(default, deserialize_with = "double_option")]
    pub special_requests: Option<Option<String>>,
    pub payment_status: Option<PaymentStatus>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

/// Status transition payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}
