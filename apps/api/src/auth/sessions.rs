//! Opaque login sessions: random token → user id, with a TTL.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const KEY_PREFIX: &str = "skill-bridge:session:";

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issues a new token for `user_id`.
    async fn create(&self, user_id: Uuid) -> Result<String, SessionStoreError>;

    /// `None` when the token is unknown or expired.
    async fn resolve(&self, token: &str) -> Result<Option<Uuid>, SessionStoreError>;

    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError>;
}

fn session_key(token: &str) -> String {
    format!("{KEY_PREFIX}{token}")
}

/// Redis-backed sessions. Keys expire on their own after `ttl_secs`.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(client: &redis::Client, ttl_secs: u64) -> Result<Self, SessionStoreError> {
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self { conn, ttl_secs })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: Uuid) -> Result<String, SessionStoreError> {
        let token = Uuid::new_v4().simple().to_string();
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(session_key(&token))
            .arg(user_id.to_string())
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Opened session for user {user_id}");
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<Option<Uuid>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(session_key(token))
            .query_async(&mut conn)
            .await?;
        Ok(value.and_then(|v| Uuid::parse_str(&v).ok()))
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(session_key(token))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemorySessionStore;
    use super::*;

    #[test]
    fn test_keys_are_namespaced() {
        assert_eq!(session_key("abc"), "skill-bridge:session:abc");
    }

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::default();
        let user = Uuid::new_v4();
        let token = store.create(user).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), Some(user));
        store.revoke(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }
}
