//! In-memory session storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::{Session, SessionToken};
use crate::error::DashboardError;
use crate::Result;

/// A session together with its bookkeeping.
#[derive(Debug, Clone)]
pub struct StoredSession {
    /// The session handed out on lookup.
    pub session: Session,
    /// Time when the session was stored.
    pub created_at: Instant,
    /// Lifetime after which lookups stop returning it.
    pub ttl: Option<Duration>,
}

impl StoredSession {
    fn new(session: Session, ttl: Option<Duration>) -> Self {
        Self {
            session,
            created_at: Instant::now(),
            ttl,
        }
    }

    /// Whether the session has outlived its TTL.
    pub fn is_expired(&self) -> bool {
        self.ttl
            .map(|ttl| self.created_at.elapsed() >= ttl)
            .unwrap_or(false)
    }
}

/// Thread-safe token → session map.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionToken, StoredSession>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    /// Create an empty store whose sessions never expire.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Create an empty store applying `ttl` to every inserted session.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Store a session under a freshly issued token.
    pub fn insert(&self, session: Session) -> Result<SessionToken> {
        let token = SessionToken::generate();
        self.insert_with_token(token.clone(), session)?;
        Ok(token)
    }

    /// Store a session under a caller-chosen token.
    ///
    /// Returns `true` if an existing session was replaced.
    pub fn insert_with_token(&self, token: SessionToken, session: Session) -> Result<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| DashboardError::LockPoisoned)?;

        Ok(sessions
            .insert(token, StoredSession::new(session, self.ttl))
            .is_some())
    }

    /// Look up a live session.
    ///
    /// Expired entries are reported as absent; they are dropped on the next
    /// [`purge_expired`](Self::purge_expired).
    pub fn get(&self, token: &SessionToken) -> Result<Option<Session>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| DashboardError::LockPoisoned)?;

        Ok(sessions
            .get(token)
            .filter(|stored| !stored.is_expired())
            .map(|stored| stored.session.clone()))
    }

    /// Remove a session from the store.
    pub fn remove(&self, token: &SessionToken) -> Result<Option<Session>> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| DashboardError::LockPoisoned)?;
        Ok(sessions.remove(token).map(|stored| stored.session))
    }

    /// Get the number of stored sessions, expired ones included.
    pub fn count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Drop every expired session.
    ///
    /// Returns the number of sessions removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| DashboardError::LockPoisoned)?;

        let before = sessions.len();
        sessions.retain(|_, stored| !stored.is_expired());
        Ok(before - sessions.len())
    }

    /// Purge expired sessions every `every` on the current Tokio runtime.
    pub fn spawn_purge_task(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                match self.purge_expired() {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!(removed, "purged expired sessions"),
                    Err(e) => {
                        tracing::warn!(error = %e, "stopping session purge");
                        break;
                    }
                }
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;

    fn ana() -> Session {
        Session::for_user(
            SessionUser::new()
                .with_name("Ana")
                .with_email("ana@example.com"),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let store = SessionStore::new();
        let token = store.insert(ana()).unwrap();

        assert_eq!(store.get(&token).unwrap(), Some(ana()));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_get_unknown_token() {
        let store = SessionStore::new();
        let token = SessionToken::new("nope").unwrap();
        assert!(store.get(&token).unwrap().is_none());
    }

    #[test]
    fn test_insert_with_token_replaces() {
        let store = SessionStore::new();
        let token = SessionToken::new("fixed-token").unwrap();

        assert!(!store
            .insert_with_token(token.clone(), Session::anonymous())
            .unwrap());
        assert!(store.insert_with_token(token.clone(), ana()).unwrap());

        assert_eq!(store.get(&token).unwrap(), Some(ana()));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        let token = store.insert(ana()).unwrap();

        assert_eq!(store.remove(&token).unwrap(), Some(ana()));
        assert!(store.get(&token).unwrap().is_none());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_expired_session_is_hidden() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        let token = store.insert(ana()).unwrap();

        assert!(store.get(&token).unwrap().is_none());
        assert_eq!(store.count(), 1);

        assert_eq!(store.purge_expired().unwrap(), 1);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_purge_keeps_live_sessions() {
        let store = SessionStore::with_ttl(Duration::from_secs(3600));
        store.insert(ana()).unwrap();
        store.insert(Session::anonymous()).unwrap();

        assert_eq!(store.purge_expired().unwrap(), 0);
        assert_eq!(store.count(), 2);
    }

    #[tokio::test]
    async fn test_purge_task_runs() {
        let store = Arc::new(SessionStore::with_ttl(Duration::ZERO));
        store.insert(ana()).unwrap();

        let handle = Arc::clone(&store).spawn_purge_task(Duration::from_millis(5));
        for _ in 0..100 {
            if store.count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.abort();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let store = Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.insert(ana()).unwrap())
            })
            .collect();

        let tokens: Vec<SessionToken> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let unique: std::collections::HashSet<_> = tokens.iter().collect();
        assert_eq!(unique.len(), 50);
        assert_eq!(store.count(), 50);
    }
}
