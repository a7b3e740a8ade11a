//! In-memory session table. A login issues an opaque token; the Session Gate
//! resolves it back into an [`AuthContext`] on every protected request.

use crate::settings::{DEFAULT_SESSION_TTL_MINUTES, MAX_SESSION_TTL_MINUTES};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "orphanage_session";

/// Authenticated admin for the current request. Passed explicitly into every registry call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthContext {
    pub admin_id: i64,
    pub username: String,
    pub token: String,
}

#[derive(Clone, Debug)]
struct SessionEntry {
    admin_id: i64,
    username: String,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    by_token: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    /// The TTL is clamped to between one minute and one year.
    pub fn new(ttl_minutes: i64) -> Self {
        let ttl = Duration::try_minutes(ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES))
            .unwrap_or_else(|| Duration::minutes(DEFAULT_SESSION_TTL_MINUTES));
        SessionStore {
            ttl,
            by_token: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn issue(&self, admin_id: i64, username: &str) -> AuthContext {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let entry = SessionEntry {
            admin_id,
            username: username.to_string(),
            expires_at: Utc::now().checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        // A poisoned lock only means another request panicked mid-insert; the map is still usable.
        let mut map = self.by_token.write().unwrap_or_else(|e| e.into_inner());
        map.retain(|_, e| e.expires_at > Utc::now());
        map.insert(token.clone(), entry);
        AuthContext {
            admin_id,
            username: username.to_string(),
            token,
        }
    }

    /// Expired tokens are dropped on lookup.
    pub fn resolve(&self, token: &str) -> Option<AuthContext> {
        let now = Utc::now();
        {
            let map = self.by_token.read().unwrap_or_else(|e| e.into_inner());
            match map.get(token) {
                Some(e) if e.expires_at > now => {
                    return Some(AuthContext {
                        admin_id: e.admin_id,
                        username: e.username.clone(),
                        token: token.to_string(),
                    })
                }
                None => return None,
                Some(_) => {}
            }
        }
        self.revoke(token);
        None
    }

    /// Returns whether the token was live.
    pub fn revoke(&self, token: &str) -> bool {
        let mut map = self.by_token.write().unwrap_or_else(|e| e.into_inner());
        map.remove(token).is_some()
    }

    #[cfg(test)]
    fn expire_all(&self) {
        let mut map = self.by_token.write().unwrap_or_else(|e| e.into_inner());
        for e in map.values_mut() {
            e.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_resolve_until_revoked() {
        let store = SessionStore::new(30);
        let ctx = store.issue(1, "admin");
        assert_eq!(store.resolve(&ctx.token), Some(ctx.clone()));
        assert!(store.revoke(&ctx.token));
        assert_eq!(store.resolve(&ctx.token), None);
        assert!(!store.revoke(&ctx.token));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let store = SessionStore::new(30);
        let ctx = store.issue(1, "admin");
        store.expire_all();
        assert_eq!(store.resolve(&ctx.token), None);
    }

    #[test]
    fn oversized_ttl_is_clamped_instead_of_overflowing() {
        let store = SessionStore::new(1_000_000_000_000);
        assert_eq!(store.ttl, Duration::minutes(MAX_SESSION_TTL_MINUTES));
        let ctx = store.issue(1, "admin");
        assert_eq!(store.resolve(&ctx.token), Some(ctx));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let store = SessionStore::new(30);
        assert_eq!(store.resolve("nope"), None);
    }
}
