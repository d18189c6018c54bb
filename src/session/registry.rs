use crate::session::machine::SessionState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

pub type SessionId = Uuid;

struct Entry {
    state: SessionState,
    last_seen: Instant,
}

struct Sessions {
    entries: HashMap<SessionId, Entry>,
    last_sweep: Instant,
}

impl Sessions {
    /// Drop every context idle for `idle` or longer; runs at most once per `idle`.
    fn sweep(&mut self, now: Instant, idle: Duration) {
        if now.saturating_duration_since(self.last_sweep) < idle {
            return;
        }
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.last_seen) < idle);
        self.last_sweep = now;
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = self.entries.len(), "evicted idle sessions");
        }
    }

    /// The live state for `id`, refreshing its idle clock. Expired contexts are removed.
    fn live(&mut self, id: SessionId, now: Instant, idle: Duration) -> Option<&mut Entry> {
        let expired = self
            .entries
            .get(&id)
            .is_some_and(|e| now.saturating_duration_since(e.last_seen) >= idle);
        if expired {
            self.entries.remove(&id);
            return None;
        }
        let entry = self.entries.get_mut(&id)?;
        entry.last_seen = now;
        Some(entry)
    }
}

/// Session contexts keyed by the id carried in the client's cookie.
///
/// Only sessions that have left the fresh login state are stored. A context
/// untouched for the idle timeout is evicted and its id reads as logged out.
/// Contexts are read through [`SessionRegistry::snapshot`] and changed through
/// [`SessionRegistry::update`]; the lock is never held across an await.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Sessions>>,
    idle: Duration,
}

impl SessionRegistry {
    pub fn new(idle: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sessions {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            idle,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle
    }

    /// A new id. Nothing is stored until the session's first successful transition.
    pub fn issue_id(&self) -> SessionId {
        Uuid::new_v4()
    }

    /// Copy of the current state; an unknown or expired session reads as logged out.
    pub fn snapshot(&self, id: SessionId) -> SessionState {
        self.snapshot_at(id, Instant::now())
    }

    /// Run `f` against a copy of the session's state and keep the result only if
    /// `f` succeeds. A rejected transition leaves the registry exactly as it was.
    pub fn update<R, E>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut SessionState) -> Result<R, E>,
    ) -> Result<R, E> {
        self.update_at(id, Instant::now(), f)
    }

    /// Log the session out and drop its context, returning who was logged in.
    pub fn logout(&self, id: SessionId) -> Option<String> {
        let mut state = self.lock().entries.remove(&id)?.state;
        let user = state.current_user().map(str::to_string);
        state.logout();
        user
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot_at(&self, id: SessionId, now: Instant) -> SessionState {
        let mut sessions = self.lock();
        sessions
            .live(id, now, self.idle)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    fn update_at<R, E>(
        &self,
        id: SessionId,
        now: Instant,
        f: impl FnOnce(&mut SessionState) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut sessions = self.lock();
        sessions.sweep(now, self.idle);
        let mut state = sessions
            .live(id, now, self.idle)
            .map(|e| e.state.clone())
            .unwrap_or_default();
        let out = f(&mut state)?;
        if state == SessionState::new() {
            sessions.entries.remove(&id);
        } else {
            sessions.entries.insert(
                id,
                Entry {
                    state,
                    last_seen: now,
                },
            );
        }
        Ok(out)
    }

    fn lock(&self) -> MutexGuard<'_, Sessions> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
