use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Stored records ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    /// Price in minor currency units.
    pub price: i64,
    /// Duration in minutes.
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub service_name: String,
    pub price: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub order_id: i64,
    pub created_at: DateTime<Utc>,
}

/// The whole data file: reference services plus every booking ever made.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

// ── Inputs ──

/// Attributes collected by the booking flow, ready to be written.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub service: Service,
    pub start: NaiveDateTime,
}

/// Result of a cancel request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled(Booking),
    AlreadyCanceled(Booking),
    NotFound,
}
