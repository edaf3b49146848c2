use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AssessmentRow {
    pub user_id: Uuid,
    pub responses: Value,
    pub analysis: Option<Value>,
    pub completed_at: Option<DateTime<Utc>>,
}
