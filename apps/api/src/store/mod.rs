//! Per-user document storage: the user record (profile + normalized result)
//! and the raw assessment record.
//!
//! Every operation touches a single record. There is no cross-record
//! transaction and no optimistic-concurrency check: a retake overwrites the
//! previous result (last write wins).
//!
//! `AppState` holds an `Arc<dyn DocumentStore>`; production uses
//! `PgDocumentStore`, tests use the in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::assessment::models::{AnalysisResult, AssessmentResult, ResponseSet};
use crate::profile::models::UserProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("User {0} not found")]
    UserNotFound(Uuid),
}

/// A user record as read back from the store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub profile: Option<UserProfile>,
    pub profile_completed: bool,
    /// Embedded normalized result. Kept untyped: older records hold other shapes.
    pub assessment_results: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
}

/// The raw record of one submission, keyed by user id.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRecord {
    pub user_id: Uuid,
    pub responses: Value,
    pub analysis: Option<Value>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AssessmentRecord {
    pub fn new(
        user_id: Uuid,
        responses: &ResponseSet,
        analysis: &AnalysisResult,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            user_id,
            responses: serde_json::to_value(responses)?,
            analysis: Some(serde_json::to_value(analysis)?),
            completed_at: Some(completed_at),
        })
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fails with `EmailTaken` when the (case-insensitive) email is in use.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Merges the profile into the user record and marks it completed.
    async fn save_profile(&self, user_id: Uuid, profile: &UserProfile) -> Result<(), StoreError>;

    /// Overwrites the embedded normalized result.
    async fn set_assessment_results(
        &self,
        user_id: Uuid,
        results: &AssessmentResult,
    ) -> Result<(), StoreError>;

    async fn get_assessment_record(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AssessmentRecord>, StoreError>;

    /// Overwrites the raw record for `record.user_id`.
    async fn put_assessment_record(&self, record: &AssessmentRecord) -> Result<(), StoreError>;
}

/// Emails are compared case-insensitively and stored trimmed + lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
