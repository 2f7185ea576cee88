use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

use crate::bills::repo_types::Bill;
use crate::bills::tariff::format_rupiah;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub period_month: i32,
    pub period_year: i32,
    #[serde(default)]
    pub previous_reading: f64,
    pub current_reading: f64,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBillRequest {
    pub period_month: i32,
    pub period_year: i32,
    #[serde(default)]
    pub previous_reading: f64,
    pub current_reading: f64,
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub paid_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BillResponse {
    pub id: Uuid,
    pub period_month: i32,
    pub period_year: i32,
    pub previous_reading: f64,
    pub current_reading: f64,
    pub usage_m3: f64,
    pub cost_rp: i64,
    pub cost_formatted: String,
    pub status: String,
    pub due_date: Option<String>,
    pub paid_date: Option<String>,
    pub has_photo: bool,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One point of the dashboard usage/cost chart.
#[derive(Debug, Serialize)]
pub struct ChartPoint {
    pub period: String, // "YYYY-MM"
    pub usage: f64,
    pub cost: i64,
}

impl From<Bill> for BillResponse {
    fn from(b: Bill) -> Self {
        Self {
            id: b.id,
            period_month: b.period_month,
            period_year: b.period_year,
            previous_reading: b.previous_reading,
            current_reading: b.current_reading,
            usage_m3: b.usage_m3,
            cost_rp: b.cost_rp,
            cost_formatted: format_rupiah(b.cost_rp),
            status: b.status,
            due_date: b.due_date.map(format_date),
            paid_date: b.paid_date.map(format_date),
            has_photo: b.photo_key.is_some(),
            notes: b.notes,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

pub fn parse_date(s: &str) -> Result<Date, ApiError> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(s, &fmt)
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{s}', expected YYYY-MM-DD")))
}

pub fn format_date(d: Date) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    d.format(&fmt).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn date_parsing_roundtrip() {
        let d = parse_date("2025-07-15").unwrap();
        assert_eq!(d.year(), 2025);
        assert_eq!(d.month(), Month::July);
        assert_eq!(format_date(d), "2025-07-15");
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(parse_date("15/07/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn bill_response_carries_formatted_cost() {
        let now = OffsetDateTime::now_utc();
        let bill = Bill {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            period_month: 7,
            period_year: 2025,
            previous_reading: 100.0,
            current_reading: 135.0,
            usage_m3: 35.0,
            cost_rp: 65_000,
            status: "unpaid".into(),
            due_date: None,
            paid_date: None,
            photo_key: Some("meters/x/y.jpg".into()),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let resp = BillResponse::from(bill);
        assert_eq!(resp.cost_formatted, "Rp 65.000");
        assert!(resp.has_photo);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"usage_m3\":35.0"));
    }
}
