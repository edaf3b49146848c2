use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub profile: Option<Value>,
    pub profile_completed: bool,
    pub assessment_results: Option<Value>,
    pub created_at: DateTime<Utc>,
}
