use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::models::AssessmentResult;
use crate::models::assessment::AssessmentRow;
use crate::models::user::UserRow;
use crate::profile::models::UserProfile;
use crate::store::{
    normalize_email, AssessmentRecord, DocumentStore, NewUser, StoreError, UserRecord,
};

/// `DocumentStore` over the `users` and `assessments` tables.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let profile = match row.profile {
            Some(value) => match serde_json::from_value::<UserProfile>(value) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    // An unreadable profile is treated as "not set up yet".
                    warn!("Ignoring unreadable profile for user {}: {e}", row.id);
                    None
                }
            },
            None => None,
        };

        Ok(UserRecord {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            display_name: row.display_name,
            profile_completed: row.profile_completed && profile.is_some(),
            profile,
            assessment_results: row.assessment_results,
            created_at: row.created_at,
        })
    }
}

impl From<AssessmentRow> for AssessmentRecord {
    fn from(row: AssessmentRow) -> Self {
        AssessmentRecord {
            user_id: row.user_id,
            responses: row.responses,
            analysis: row.analysis,
            completed_at: row.completed_at,
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, password_hash, display_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(normalize_email(&user.email))
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                info!("Created user {}", row.id);
                row.try_into()
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn save_profile(&self, user_id: Uuid, profile: &UserProfile) -> Result<(), StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET profile = $2, display_name = $3, profile_completed = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(serde_json::to_value(profile)?)
        .bind(&profile.display_name)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }

    async fn set_assessment_results(
        &self,
        user_id: Uuid,
        results: &AssessmentResult,
    ) -> Result<(), StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET assessment_results = $2, assessment_completed_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(serde_json::to_value(results)?)
        .bind(results.completed_at)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        Ok(())
    }

    async fn get_assessment_record(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AssessmentRecord>, StoreError> {
        Ok(
            sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .map(AssessmentRecord::from),
        )
    }

    async fn put_assessment_record(&self, record: &AssessmentRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO assessments (user_id, responses, analysis, completed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET responses = EXCLUDED.responses,
                analysis = EXCLUDED.analysis,
                completed_at = EXCLUDED.completed_at
            "#,
        )
        .bind(record.user_id)
        .bind(&record.responses)
        .bind(&record.analysis)
        .bind(record.completed_at)
        .execute(&self.pool)
        .await?;

        info!("Stored assessment record for user {}", record.user_id);
        Ok(())
    }
}
