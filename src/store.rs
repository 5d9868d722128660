//! Session store adapter.
//!
//! The engine owns no session state; everything lives behind this trait,
//! keyed by user id. Production deployments back it with an external
//! key-value store, tests and single-node setups use [`MemorySessionStore`].

use crate::roulette::types::GameSession;
use async_trait::async_trait;
use dashmap::DashMap;

/// Infrastructure failures from the session store. Surfaced to callers as a
/// distinct error kind, never swallowed into default values.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupted session record: {0}")]
    Corrupted(String),

    #[error("failed to encode session record: {0}")]
    Serialization(String),
}

/// Durable per-user session state, keyed by user id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the current session for a user, if one exists.
    async fn get(&self, user_id: u64) -> Result<Option<GameSession>, StoreError>;

    /// Persist a session, replacing any existing record for the same user.
    async fn put(&self, session: &GameSession) -> Result<(), StoreError>;

    /// Remove a user's session. Removing an absent session is not an error.
    async fn delete(&self, user_id: u64) -> Result<(), StoreError>;
}

/// In-memory store over a lock-free map. Records are kept as serialized JSON,
/// matching what an external key-value backend would hold, so the round trip
/// through the wire format is exercised on every access.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: DashMap<u64, Vec<u8>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: u64) -> Result<Option<GameSession>, StoreError> {
        let Some(bytes) = self.records.get(&user_id) else {
            return Ok(None);
        };

        let session: GameSession = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Corrupted(format!("failed to decode session for user {}: {}", user_id, e))
        })?;

        Ok(Some(session))
    }

    async fn put(&self, session: &GameSession) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(session).map_err(|e| {
            StoreError::Serialization(format!(
                "failed to encode session for user {}: {}",
                session.user_id, e
            ))
        })?;

        self.records.insert(session.user_id, bytes);
        Ok(())
    }

    async fn delete(&self, user_id: u64) -> Result<(), StoreError> {
        self.records.remove(&user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roulette::types::GameMode;

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = MemorySessionStore::new();
        let session = GameSession::new(1, 500, GameMode::Normal);

        store.put(&session).await.unwrap();
        let loaded = store.get(1).await.unwrap().unwrap();

        assert_eq!(loaded, session);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemorySessionStore::new();
        assert!(store.get(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = MemorySessionStore::new();
        let mut session = GameSession::new(1, 500, GameMode::Normal);
        store.put(&session).await.unwrap();

        session.balance = 140;
        store.put(&session).await.unwrap();

        let loaded = store.get(1).await.unwrap().unwrap();
        assert_eq!(loaded.balance, 140);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemorySessionStore::new();
        let session = GameSession::new(1, 500, GameMode::Normal);
        store.put(&session).await.unwrap();

        store.delete(1).await.unwrap();
        assert!(store.get(1).await.unwrap().is_none());

        // Deleting again is a no-op, not an error.
        store.delete(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupted_record_surfaces_error() {
        let store = MemorySessionStore::new();
        store.records.insert(7, b"not json".to_vec());

        let err = store.get(7).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
    }
}
