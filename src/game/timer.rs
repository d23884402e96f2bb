//! Deferred actions keyed by session token
//!
//! The frame loop owns the clock; callers pass `now` (seconds) in. Nothing
//! here sleeps or spawns. An action is due once `now >= due`, and every
//! action carries the token of the session that scheduled it so a reset can
//! cancel it, and so a consumer can reject one that outlived its session.

use std::fmt;

/// Identifies one level session. A fresh token is issued on every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    /// The token after this one
    pub fn next(self) -> Self {
        SessionToken(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A scheduled action waiting for its due time
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredAction<T> {
    pub token: SessionToken,
    /// Time (seconds) at which the action becomes due
    pub due: f64,
    pub payload: T,
}

/// Pending deferred actions, fired in due-time order
#[derive(Debug)]
pub struct DeferredQueue<T> {
    pending: Vec<DeferredAction<T>>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Schedule `payload` to fire `delay` seconds after `now`
    pub fn schedule(&mut self, token: SessionToken, now: f64, delay: f64, payload: T) {
        self.pending.push(DeferredAction {
            token,
            due: now + delay.max(0.0),
            payload,
        });
    }

    /// Drop every action scheduled by `token`. Returns how many were dropped.
    pub fn cancel(&mut self, token: SessionToken) -> usize {
        let before = self.pending.len();
        self.pending.retain(|a| a.token != token);
        before - self.pending.len()
    }

    #[cfg(test)]
    pub fn is_pending(&self, token: SessionToken) -> bool {
        self.pending.iter().any(|a| a.token == token)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every action due at `now`, earliest first
    pub fn poll(&mut self, now: f64) -> Vec<DeferredAction<T>> {
        let mut ready = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                ready.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        ready.sort_by(|a, b| a.due.total_cmp(&b.due));
        ready
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
