//! Cookie sessions backed by an in-memory token store.
//!
//! Sessions do not survive a restart, matching the single-process
//! deployment model. Tokens are opaque UUIDs; expiry is checked lazily
//! on lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{cookie_value, AuthError, AuthRequest, Authenticator, Identity};

struct Session {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// In-memory session store.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl_minutes: u64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes as i64),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session for `identity`, returning the opaque token.
    pub fn create(&self, identity: Identity) -> String {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(
            token.clone(),
            Session {
                identity,
                expires_at: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its identity. Expired sessions are removed.
    pub fn get(&self, token: &str) -> Option<Identity> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Some(session.identity.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Drop a session. Unknown tokens are ignored.
    pub fn destroy(&self, token: &str) {
        self.sessions.lock().unwrap().remove(token);
    }

    /// Number of live sessions (expired ones may still be counted until
    /// their next lookup).
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Authenticator that resolves a session cookie against the store.
pub struct SessionAuthenticator {
    store: Arc<SessionStore>,
    cookie_name: String,
}

impl SessionAuthenticator {
    pub fn new(store: Arc<SessionStore>, cookie_name: String) -> Self {
        Self { store, cookie_name }
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let cookie_header = request
            .headers
            .get("cookie")
            .ok_or(AuthError::NotAuthenticated)?;

        let token = cookie_value(cookie_header, &self.cookie_name)
            .ok_or(AuthError::NotAuthenticated)?;

        self.store
            .get(token)
            .ok_or_else(|| AuthError::InvalidCredentials("Unknown or expired session".to_string()))
    }

    fn method_name(&self) -> &'static str {
        "session"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity {
            user_id: "u1".to_string(),
            username: "alice".to_string(),
        }
    }

    fn make_request(cookie: Option<&str>) -> AuthRequest {
        let mut headers = HashMap::new();
        if let Some(value) = cookie {
            headers.insert("cookie".to_string(), value.to_string());
        }
        AuthRequest { headers }
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new(60);
        let token = store.create(alice());
        let identity = store.get(&token).unwrap();
        assert_eq!(identity.user_id, "u1");
    }

    #[test]
    fn test_unknown_token() {
        let store = SessionStore::new(60);
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn test_destroy() {
        let store = SessionStore::new(60);
        let token = store.create(alice());
        store.destroy(&token);
        assert!(store.get(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_session_removed_on_lookup() {
        // Zero TTL expires immediately.
        let store = SessionStore::new(0);
        let token = store.create(alice());
        assert!(store.get(&token).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_authenticator_valid_cookie() {
        let store = Arc::new(SessionStore::new(60));
        let token = store.create(alice());
        let auth = SessionAuthenticator::new(store, "sid".to_string());

        let request = make_request(Some(&format!("theme=dark; sid={}", token)));
        let identity = auth.authenticate(&request).await.unwrap();
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticator_missing_cookie() {
        let store = Arc::new(SessionStore::new(60));
        let auth = SessionAuthenticator::new(store, "sid".to_string());

        let result = auth.authenticate(&make_request(None)).await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));

        let result = auth.authenticate(&make_request(Some("theme=dark"))).await;
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_authenticator_stale_token() {
        let store = Arc::new(SessionStore::new(60));
        let auth = SessionAuthenticator::new(store, "sid".to_string());

        let request = make_request(Some("sid=stale-token"));
        let result = auth.authenticate(&request).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[test]
    fn test_method_name() {
        let store = Arc::new(SessionStore::new(60));
        let auth = SessionAuthenticator::new(store, "sid".to_string());
        assert_eq!(auth.method_name(), "session");
    }
}
