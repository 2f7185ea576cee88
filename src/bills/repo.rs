use crate::bills::repo_types::{Bill, BillChanges, NewBill};
use sqlx::PgPool;
use uuid::Uuid;

const BILL_COLUMNS: &str = "id, user_id, period_month, period_year, previous_reading, \
     current_reading, usage_m3, cost_rp, status, due_date, paid_date, photo_key, notes, \
     created_at, updated_at";

impl Bill {
    /// All bills for a user, newest period first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Bill>, sqlx::Error> {
        sqlx::query_as::<_, Bill>(&format!(
            r#"
            SELECT {BILL_COLUMNS}
            FROM bills
            WHERE user_id = $1
            ORDER BY period_year DESC, period_month DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<Bill>, sqlx::Error> {
        sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Insert one bill. The unique (user_id, period) constraint surfaces
    /// duplicates as a database error; callers map it to a conflict.
    pub async fn insert(db: &PgPool, user_id: Uuid, new: NewBill) -> Result<Bill, sqlx::Error> {
        sqlx::query_as::<_, Bill>(&format!(
            r#"
            INSERT INTO bills (user_id, period_month, period_year, previous_reading,
                               current_reading, usage_m3, cost_rp, due_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(new.period_month)
        .bind(new.period_year)
        .bind(new.previous_reading)
        .bind(new.current_reading)
        .bind(new.usage_m3)
        .bind(new.cost_rp)
        .bind(new.due_date)
        .bind(new.notes)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        changes: BillChanges,
    ) -> Result<Option<Bill>, sqlx::Error> {
        sqlx::query_as::<_, Bill>(&format!(
            r#"
            UPDATE bills
            SET period_month = $1, period_year = $2, previous_reading = $3,
                current_reading = $4, usage_m3 = $5, cost_rp = $6, status = $7,
                due_date = $8, paid_date = $9, notes = $10, updated_at = now()
            WHERE id = $11 AND user_id = $12
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(changes.period_month)
        .bind(changes.period_year)
        .bind(changes.previous_reading)
        .bind(changes.current_reading)
        .bind(changes.usage_m3)
        .bind(changes.cost_rp)
        .bind(changes.status)
        .bind(changes.due_date)
        .bind(changes.paid_date)
        .bind(changes.notes)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_photo_key(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        photo_key: &str,
    ) -> Result<Option<Bill>, sqlx::Error> {
        sqlx::query_as::<_, Bill>(&format!(
            r#"
            UPDATE bills
            SET photo_key = $1, updated_at = now()
            WHERE id = $2 AND user_id = $3
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(photo_key)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Oldest-first window of recent periods for the usage/cost chart.
    pub async fn recent_for_chart(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Bill>, sqlx::Error> {
        sqlx::query_as::<_, Bill>(&format!(
            r#"
            SELECT {BILL_COLUMNS}
            FROM (
                SELECT {BILL_COLUMNS}
                FROM bills
                WHERE user_id = $1
                ORDER BY period_year DESC, period_month DESC
                LIMIT $2
            ) recent
            ORDER BY period_year ASC, period_month ASC
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await
    }
}
