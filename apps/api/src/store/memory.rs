//! In-memory `DocumentStore` used by router and service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::assessment::models::AssessmentResult;
use crate::profile::models::UserProfile;
use crate::store::{
    normalize_email, AssessmentRecord, DocumentStore, NewUser, StoreError, UserRecord,
};

#[derive(Default)]
pub struct MemoryDocumentStore {
    users: Mutex<HashMap<Uuid, UserRecord>>,
    assessments: Mutex<HashMap<Uuid, AssessmentRecord>>,
    /// When set, every write fails with a database error.
    fail_writes: Mutex<bool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes an arbitrary (possibly outdated) document into the embedded
    /// result slot of a user record.
    pub async fn seed_user_results(&self, user_id: Uuid, value: Value) {
        if let Some(user) = self.users.lock().await.get_mut(&user_id) {
            user.assessment_results = Some(value);
        }
    }

    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().await = fail;
    }

    async fn check_writable(&self) -> Result<(), StoreError> {
        if *self.fail_writes.lock().await {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        self.check_writable().await?;
        let email = normalize_email(&user.email);
        let mut users = self.users.lock().await;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::EmailTaken);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            email,
            password_hash: user.password_hash,
            display_name: user.display_name,
            profile: None,
            profile_completed: false,
            assessment_results: None,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let email = normalize_email(email);
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn save_profile(&self, user_id: Uuid, profile: &UserProfile) -> Result<(), StoreError> {
        self.check_writable().await?;
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;
        user.display_name = profile.display_name.clone();
        user.profile = Some(profile.clone());
        user.profile_completed = true;
        Ok(())
    }

    async fn set_assessment_results(
        &self,
        user_id: Uuid,
        results: &AssessmentResult,
    ) -> Result<(), StoreError> {
        self.check_writable().await?;
        let value = serde_json::to_value(results)?;
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;
        user.assessment_results = Some(value);
        Ok(())
    }

    async fn get_assessment_record(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AssessmentRecord>, StoreError> {
        Ok(self.assessments.lock().await.get(&user_id).cloned())
    }

    async fn put_assessment_record(&self, record: &AssessmentRecord) -> Result<(), StoreError> {
        self.check_writable().await?;
        self.assessments
            .lock()
            .await
            .insert(record.user_id, record.clone());
        Ok(())
    }
}
