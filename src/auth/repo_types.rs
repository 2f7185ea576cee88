use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Customer account in the database. Owns zero or more bills; deleting the
/// account cascades to them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, never exposed in JSON
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: OffsetDateTime,
}
