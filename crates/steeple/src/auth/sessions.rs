use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Length of generated session identifiers.
const SESSION_ID_LEN: usize = 32;

/// A logged-in session. Expiry is absolute; expired sessions are dropped on
/// the next lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Thread-safe in-process session store with a fixed TTL.
///
/// Sessions live only as long as the process; restarting the server logs
/// everyone out, which is acceptable for a single small deployment.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Creates and stores a new session for the given user.
    pub async fn create(&self, user_id: Uuid) -> Session {
        let session = Session {
            id: generate_session_id(),
            user_id,
            expires_at: Utc::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Looks up a live session. Expired sessions are removed and reported
    /// as absent.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let now = Utc::now();

        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(session) if session.expires_at > now => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(id);
        None
    }

    pub async fn delete(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }
}

fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_session() {
        let store = SessionStore::new(Duration::hours(1));
        let user_id = Uuid::new_v4();

        let session = store.create(user_id).await;
        assert_eq!(session.id.len(), SESSION_ID_LEN);

        let found = store.get(&session.id).await.expect("session present");
        assert_eq!(found.user_id, user_id);
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let store = SessionStore::new(Duration::seconds(-1));
        let session = store.create(Uuid::new_v4()).await;

        assert!(store.get(&session.id).await.is_none());
        // The expired entry is gone, not just hidden.
        assert!(store.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let store = SessionStore::new(Duration::hours(1));
        let session = store.create(Uuid::new_v4()).await;

        store.delete(&session.id).await;
        assert!(store.get(&session.id).await.is_none());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
    }
}
