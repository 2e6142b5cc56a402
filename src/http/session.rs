use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth;
use crate::policy::{Actor, Role};

pub const SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone)]
struct Session {
    user_id: i64,
    role: Role,
    issued_at: DateTime<Utc>,
}

/// Opaque bearer tokens bound to a verified (user, role). Process-local:
/// tokens die with the process, which matches the single-store resource model.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn issue(&self, user_id: i64, role: Role) -> String {
        let token = auth::new_session_token();
        let mut map = self.inner.lock().expect("session store lock poisoned");
        map.insert(
            token.clone(),
            Session {
                user_id,
                role,
                issued_at: Utc::now(),
            },
        );
        token
    }

    /// Resolve a token to the actor it was issued for; expired tokens are
    /// dropped on sight.
    pub fn resolve(&self, token: &str) -> Option<Actor> {
        let mut map = self.inner.lock().expect("session store lock poisoned");
        let expired = match map.get(token) {
            Some(s) => Utc::now() - s.issued_at >= Duration::hours(SESSION_TTL_HOURS),
            None => return None,
        };
        if expired {
            map.remove(token);
            return None;
        }
        map.get(token).map(|s| Actor {
            id: s.user_id,
            role: s.role,
        })
    }

    /// Deleting a user invalidates every session issued to them.
    pub fn revoke_user(&self, user_id: i64) {
        let mut map = self.inner.lock().expect("session store lock poisoned");
        map.retain(|_, s| s.user_id != user_id);
    }
}
