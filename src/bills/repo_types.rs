use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// One monthly reading/bill. `usage_m3` and `cost_rp` are derived from the
/// two readings at write time and never mutated independently.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub period_month: i32,
    pub period_year: i32,
    pub previous_reading: f64,
    pub current_reading: f64,
    pub usage_m3: f64,
    pub cost_rp: i64,
    pub status: String,
    pub due_date: Option<Date>,
    pub paid_date: Option<Date>,
    pub photo_key: Option<String>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields for a fresh insert; usage and cost already computed by the tariff.
#[derive(Debug)]
pub struct NewBill {
    pub period_month: i32,
    pub period_year: i32,
    pub previous_reading: f64,
    pub current_reading: f64,
    pub usage_m3: f64,
    pub cost_rp: i64,
    pub due_date: Option<Date>,
    pub notes: Option<String>,
}

/// Full-update payload; usage and cost recomputed by the caller.
#[derive(Debug)]
pub struct BillChanges {
    pub period_month: i32,
    pub period_year: i32,
    pub previous_reading: f64,
    pub current_reading: f64,
    pub usage_m3: f64,
    pub cost_rp: i64,
    pub status: String,
    pub due_date: Option<Date>,
    pub paid_date: Option<Date>,
    pub notes: Option<String>,
}
