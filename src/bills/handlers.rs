use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    bills::{
        dto::{parse_date, BillResponse, ChartPoint, CreateBillRequest, UpdateBillRequest},
        repo_types::{Bill, BillChanges, NewBill},
        tariff,
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
};

const CHART_PERIODS: i64 = 12;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/bills", get(list_bills))
        .route("/bills/dashboard/stats", get(dashboard_stats))
        .route("/bills/:id", get(get_bill))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/bills", post(create_bill))
        .route("/bills/:id", put(update_bill))
        .route("/bills/:id", delete(delete_bill))
}

fn validate_period(month: i32, year: i32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::BadRequest("period_month must be 1-12".into()));
    }
    if !(2000..=2100).contains(&year) {
        return Err(ApiError::BadRequest("period_year out of range".into()));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_bills(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let bills = Bill::list_by_user(&state.db, user_id).await?;
    Ok(Json(bills.into_iter().map(BillResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_bill(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = Bill::get(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("bill not found".into()))?;
    Ok(Json(bill.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_bill(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    validate_period(payload.period_month, payload.period_year)?;

    let amount = tariff::compute(payload.current_reading, payload.previous_reading)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let due_date = payload.due_date.as_deref().map(parse_date).transpose()?;

    let bill = Bill::insert(
        &state.db,
        user_id,
        NewBill {
            period_month: payload.period_month,
            period_year: payload.period_year,
            previous_reading: payload.previous_reading,
            current_reading: payload.current_reading,
            usage_m3: amount.usage_m3,
            cost_rp: amount.cost_rp,
            due_date,
            notes: payload.notes,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("bill for this period already exists".into())
        } else {
            ApiError::from(e)
        }
    })?;

    info!(
        user_id = %user_id,
        bill_id = %bill.id,
        period = %format!("{}-{:02}", bill.period_year, bill.period_month),
        usage_m3 = bill.usage_m3,
        cost_rp = bill.cost_rp,
        "bill created"
    );
    Ok((StatusCode::CREATED, Json(bill.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_bill(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBillRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    validate_period(payload.period_month, payload.period_year)?;

    let amount = tariff::compute(payload.current_reading, payload.previous_reading)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let due_date = payload.due_date.as_deref().map(parse_date).transpose()?;
    let paid_date = payload.paid_date.as_deref().map(parse_date).transpose()?;

    let bill = Bill::update(
        &state.db,
        user_id,
        id,
        BillChanges {
            period_month: payload.period_month,
            period_year: payload.period_year,
            previous_reading: payload.previous_reading,
            current_reading: payload.current_reading,
            usage_m3: amount.usage_m3,
            cost_rp: amount.cost_rp,
            status: payload.status.unwrap_or_else(|| "unpaid".into()),
            due_date,
            paid_date,
            notes: payload.notes,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("bill for this period already exists".into())
        } else {
            ApiError::from(e)
        }
    })?
    .ok_or_else(|| ApiError::NotFound("bill not found".into()))?;

    info!(user_id = %user_id, bill_id = %bill.id, "bill updated");
    Ok(Json(bill.into()))
}

#[instrument(skip(state))]
pub async fn delete_bill(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Bill::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("bill not found".into()));
    }
    info!(user_id = %user_id, bill_id = %id, "bill deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    let bills = Bill::recent_for_chart(&state.db, user_id, CHART_PERIODS).await?;
    let points = bills
        .into_iter()
        .map(|b| ChartPoint {
            period: format!("{}-{:02}", b.period_year, b.period_month),
            usage: b.usage_m3,
            cost: b.cost_rp,
        })
        .collect();
    Ok(Json(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_bounds() {
        assert!(validate_period(1, 2025).is_ok());
        assert!(validate_period(12, 2025).is_ok());
        assert!(validate_period(0, 2025).is_err());
        assert!(validate_period(13, 2025).is_err());
        assert!(validate_period(6, 1999).is_err());
    }
}
