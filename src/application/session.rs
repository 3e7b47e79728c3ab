//! Staff session registry
//!
//! Server-side record of issued login sessions, keyed by the token's
//! `jti`. Logout and expiry remove entries, which force-invalidates the
//! corresponding JWT even before its `exp` claim is reached. A background
//! watcher sweeps out expired sessions on an interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info};

use crate::shared::ShutdownSignal;

/// One issued login session
#[derive(Debug, Clone)]
pub struct StaffSession {
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

/// Registry of live sessions, shared across handlers and the watcher
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, StaffSession>,
}

pub type SharedSessionRegistry = Arc<SessionRegistry>;

impl SessionRegistry {
    pub fn shared() -> SharedSessionRegistry {
        Arc::new(Self::default())
    }

    pub fn insert(&self, token_id: impl Into<String>, session: StaffSession) {
        self.sessions.insert(token_id.into(), session);
    }

    /// Remove a session (logout). Returns whether it existed.
    pub fn remove(&self, token_id: &str) -> bool {
        self.sessions.remove(token_id).is_some()
    }

    /// Whether a session exists and has not expired.
    ///
    /// An expired entry is dropped on sight, so a request arriving after
    /// expiry observes the same state a sweep would have produced.
    pub fn is_active(&self, token_id: &str) -> bool {
        let expired = match self.sessions.get(token_id) {
            Some(session) => session.expires_at <= Utc::now(),
            None => return false,
        };
        if expired {
            self.sessions.remove(token_id);
            return false;
        }
        true
    }

    pub fn get(&self, token_id: &str) -> Option<StaffSession> {
        self.sessions.get(token_id).map(|s| s.clone())
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every session past its expiry. Returns how many were removed.
    pub fn remove_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        before - self.sessions.len()
    }
}

/// Background task sweeping expired sessions out of the registry
pub struct SessionWatcher {
    registry: SharedSessionRegistry,
    sweep_interval: Duration,
}

impl SessionWatcher {
    pub fn new(registry: SharedSessionRegistry, sweep_interval_secs: u64) -> Self {
        Self {
            registry,
            sweep_interval: Duration::from_secs(sweep_interval_secs.max(1)),
        }
    }

    /// Start the sweep loop; stops when the shutdown signal fires.
    pub fn start(&self, shutdown: ShutdownSignal) {
        let registry = self.registry.clone();
        let sweep_interval = self.sweep_interval;

        tokio::spawn(async move {
            info!(
                "Session watcher started (sweep interval: {}s)",
                sweep_interval.as_secs()
            );
            let mut interval = tokio::time::interval(sweep_interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = registry.remove_expired(Utc::now());
                        if removed > 0 {
                            info!("Session watcher removed {} expired session(s)", removed);
                        } else {
                            debug!("Session sweep: nothing expired");
                        }
                    }
                    _ = shutdown.notified().wait() => {
                        info!("Session watcher shutting down");
                        break;
                    }
                }
            }
        });
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn session(expires_in_minutes: i64) -> StaffSession {
        StaffSession {
            user_id: "u-1".to_string(),
            username: "jordan".to_string(),
            role: "staff".to_string(),
            expires_at: Utc::now() + ChronoDuration::minutes(expires_in_minutes),
        }
    }

    #[test]
    fn insert_then_active() {
        let registry = SessionRegistry::default();
        registry.insert("jti-1", session(30));
        assert!(registry.is_active("jti-1"));
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn remove_forces_logout() {
        let registry = SessionRegistry::default();
        registry.insert("jti-1", session(30));
        assert!(registry.remove("jti-1"));
        assert!(!registry.is_active("jti-1"));
        assert!(!registry.remove("jti-1"));
    }

    #[test]
    fn expired_session_is_dropped_on_access() {
        let registry = SessionRegistry::default();
        registry.insert("jti-1", session(-5));
        assert!(!registry.is_active("jti-1"));
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn sweep_removes_only_expired() {
        let registry = SessionRegistry::default();
        registry.insert("dead", session(-1));
        registry.insert("alive", session(60));
        assert_eq!(registry.remove_expired(Utc::now()), 1);
        assert!(registry.is_active("alive"));
    }

    #[tokio::test]
    async fn watcher_stops_on_shutdown() {
        let registry = SessionRegistry::shared();
        let watcher = SessionWatcher::new(registry.clone(), 1);
        let shutdown = ShutdownSignal::new();
        watcher.start(shutdown.clone());
        shutdown.trigger();
        // nothing to assert beyond "does not hang"; give the task a beat
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
