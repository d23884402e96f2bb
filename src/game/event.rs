//! Event System
//!
//! The session does not call into navigation or the view directly. It queues
//! events that the app drains once per frame:
//! 1. A valid pair is clicked → ConnectionEvent
//! 2. The settle delay after the last needed connection elapses → LevelCompleteEvent
//! 3. The app hands the completion to progression and shows the result

use super::connection::ConnectionKey;
use super::timer::SessionToken;
use crate::level::DotColor;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all session events.
pub struct Events {
    /// A new connection was recorded
    pub connection_made: EventQueue<ConnectionEvent>,

    /// The level was completed (fires at most once per session)
    pub level_complete: EventQueue<LevelCompleteEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            connection_made: EventQueue::new(),
            level_complete: EventQueue::new(),
        }
    }

    /// Clear all event queues. Called on session reset.
    pub fn clear_all(&mut self) {
        self.connection_made.clear();
        self.level_complete.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// Two dots were connected
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEvent {
    pub key: ConnectionKey,
    pub color: DotColor,
    /// Connections in the session after this one
    pub total: usize,
}

/// A level session reached completion and the settle delay elapsed
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCompleteEvent {
    pub level_id: String,
    /// Session that completed
    pub session: SessionToken,
    /// Connections made when the signal fired
    pub connections: usize,
}
