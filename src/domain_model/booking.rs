use super::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: UserId,
    pub destination_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers_count: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingCreate {
    pub destination_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers_count: u32,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
