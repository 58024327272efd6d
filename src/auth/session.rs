//! Session state and local persistence.
//!
//! A [`Session`] pairs the bearer token with the user record it authorizes;
//! the two are always set and cleared together. The [`SessionStore`] trait
//! is the seam to the platform's persistent key-value storage: the file
//! implementation is used by applications, the in-memory one by tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::auth::types::User;
use crate::error::Error;

/// A bearer token together with the user it authorizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The bearer token attached to every authenticated request
    pub token: String,

    /// The user record returned at login
    pub user: User,
}

/// Persistent storage for the session.
///
/// Read failures on `load` degrade to "no session"; callers never see a
/// stored-but-unreadable session as an error during startup.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any
    async fn load(&self) -> Result<Option<Session>, Error>;

    /// Persist the session, replacing any previous one
    async fn save(&self, session: &Session) -> Result<(), Error>;

    /// Remove the persisted session
    async fn clear(&self) -> Result<(), Error>;
}

/// File-backed session store holding one JSON document (token + user blob)
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store persisting to the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, Error> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::storage(err)),
        };
        let session = serde_json::from_slice(&bytes)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), Error> {
        let json = serde_json::to_vec(session)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(Error::storage)?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(Error::storage)
    }

    async fn clear(&self) -> Result<(), Error> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::storage(err)),
        }
    }
}

/// In-memory session store for tests
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a session
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, Error> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn save(&self, session: &Session) -> Result<(), Error> {
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "name": "Test User",
            "email": "user@example.com"
        }))
        .unwrap();
        Session {
            token: "test_token".to_string(),
            user,
        }
    }

    #[tokio::test]
    async fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert!(store.load().await.unwrap().is_none());

        store.save(&session()).await.unwrap();
        let restored = store.load().await.unwrap().unwrap();
        assert_eq!(restored.token, "test_token");
        assert_eq!(restored.user.id, "u1");

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // Clearing an already-empty store is fine.
        store.clear().await.unwrap();
    }
}
