//! Level Session
//!
//! The per-level interaction state machine. Turns a stream of dot clicks into
//! validated connections and, once enough connections exist, a single
//! level-complete event.
//!
//! Click protocol:
//! - Idle: a click on a known dot arms it
//! - Armed: a second click either connects (same color, different dot),
//!   or just deselects (same dot, other color, pair already connected)
//!
//! At most one dot is armed at any time. Clicks on ids that are not in the
//! current level are logged and otherwise ignored.
//!
//! Completion is count-based: one connection is expected per color that has
//! two or more dots. Which dots of a color get paired is up to the player.

use crate::level::{DotColor, LevelDefinition};
use crate::math::Vec3;
use super::connection::{ConnectionKey, ConnectionSet};
use super::event::{ConnectionEvent, Events, LevelCompleteEvent};
use super::timer::{DeferredQueue, SessionToken};

/// The dot waiting for a second click
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelection {
    pub id: String,
    pub position: Vec3,
    pub color: DotColor,
}

/// Selection half of the click protocol
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Armed(PendingSelection),
}

impl SelectionState {
    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        matches!(self, SelectionState::Idle)
    }

    pub fn armed(&self) -> Option<&PendingSelection> {
        match self {
            SelectionState::Armed(pending) => Some(pending),
            SelectionState::Idle => None,
        }
    }
}

/// What a single click did
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Id not present in the current level. State unchanged.
    UnknownDot { id: String },
    /// First dot of a pair selected
    Armed { id: String },
    /// The armed dot was clicked again
    Deselected { id: String },
    /// Second dot has a different color than the armed one
    ColorMismatch {
        first: String,
        first_color: DotColor,
        second: String,
        second_color: DotColor,
    },
    /// The pair was connected earlier in this session
    AlreadyConnected { key: ConnectionKey },
    /// New connection recorded. `completes_level` is true for the connection
    /// that reached the completion threshold.
    Connected { key: ConnectionKey, completes_level: bool },
}

/// Completion progress within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    /// Threshold not reached yet
    Pending,
    /// Threshold reached, waiting out the settle delay
    Scheduled,
    /// Level-complete event sent
    Announced,
}

/// What a render segment represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentKind {
    Connection(DotColor),
    /// Zero-length marker at the armed dot
    Highlight,
}

/// A line segment for the renderer to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSegment {
    pub from: Vec3,
    pub to: Vec3,
    pub kind: SegmentKind,
}

/// Interaction state for the active level.
///
/// One instance lives for the whole app; `load` starts a new session on it
/// and throws away everything from the previous one, including a pending
/// completion that has not fired yet.
pub struct LevelSession {
    level: LevelDefinition,
    token: SessionToken,
    selection: SelectionState,
    connections: ConnectionSet,
    /// Connections needed for completion (cached from the level)
    expected: usize,
    completion: Completion,
    /// Pending completion announcements, payload is the level id
    timers: DeferredQueue<String>,
    /// Seconds between the completing connection and the event
    settle_delay: f64,
    /// Outbound events, drained by the app each frame
    pub events: Events,
}

impl LevelSession {
    /// Settle delay used when nothing is configured (seconds)
    pub const DEFAULT_SETTLE_DELAY: f64 = 0.5;

    /// Create an engine with no level loaded
    pub fn new(settle_delay: f64) -> Self {
        Self {
            level: LevelDefinition::new("", "", Vec::new()),
            token: SessionToken::default(),
            selection: SelectionState::Idle,
            connections: ConnectionSet::new(),
            expected: 0,
            completion: Completion::Pending,
            timers: DeferredQueue::new(),
            settle_delay: settle_delay.max(0.0),
            events: Events::new(),
        }
    }

    /// Start a new session for `level`. Re-entering the same level also resets.
    pub fn load(&mut self, level: &LevelDefinition) -> SessionToken {
        self.reset(level.clone());
        tracing::info!(
            "Session {} started: level {} ({} dots, {} connections needed)",
            self.token, level.id, level.dots.len(), self.expected
        );
        self.token
    }

    /// End the current session without starting a playable one
    pub fn end(&mut self) {
        self.reset(LevelDefinition::new("", "", Vec::new()));
    }

    fn reset(&mut self, level: LevelDefinition) {
        let cancelled = self.timers.cancel(self.token);
        if cancelled > 0 {
            tracing::debug!("Session {}: cancelled pending completion", self.token);
        }
        self.token = self.token.next();
        self.expected = level.expected_connections();
        self.level = level;
        self.selection = SelectionState::Idle;
        self.connections.clear();
        self.completion = Completion::Pending;
        self.events.clear_all();
    }

    /// Process one click on the dot with `dot_id`, at time `now` (seconds).
    ///
    /// Position and color come from the level definition, never from the caller.
    pub fn handle_click(&mut self, dot_id: &str, now: f64) -> ClickOutcome {
        let Some(dot) = self.level.dot(dot_id) else {
            tracing::error!(
                "Clicked dot with ID {} not found in level {}",
                dot_id, self.level.id
            );
            return ClickOutcome::UnknownDot { id: dot_id.to_string() };
        };
        let (clicked_color, clicked_position) = (dot.color, dot.position);

        let pending = match std::mem::take(&mut self.selection) {
            SelectionState::Idle => {
                tracing::debug!("First dot selected: {}", dot_id);
                self.selection = SelectionState::Armed(PendingSelection {
                    id: dot_id.to_string(),
                    position: clicked_position,
                    color: clicked_color,
                });
                return ClickOutcome::Armed { id: dot_id.to_string() };
            }
            SelectionState::Armed(pending) => pending,
        };

        // From here on the selection is Idle again, whatever the outcome.
        if pending.id == dot_id {
            tracing::debug!("Cannot connect {} to itself, deselecting", dot_id);
            return ClickOutcome::Deselected { id: pending.id };
        }

        if pending.color != clicked_color {
            tracing::debug!(
                "Cannot connect {} ({}) to {} ({}), colors must match",
                pending.id, pending.color.label(), dot_id, clicked_color.label()
            );
            return ClickOutcome::ColorMismatch {
                first: pending.id,
                first_color: pending.color,
                second: dot_id.to_string(),
                second_color: clicked_color,
            };
        }

        let key = ConnectionKey::new(&pending.id, dot_id);
        if !self.connections.insert(key.clone()) {
            tracing::debug!("Connection {} already exists", key);
            return ClickOutcome::AlreadyConnected { key };
        }

        tracing::info!("Connected {} ({})", key, clicked_color.label());
        self.events.connection_made.send(ConnectionEvent {
            key: key.clone(),
            color: clicked_color,
            total: self.connections.len(),
        });

        let completes_level = self.check_completion(now);
        ClickOutcome::Connected { key, completes_level }
    }

    /// Runs once per newly inserted connection. Schedules the completion
    /// announcement the first time the threshold is met.
    fn check_completion(&mut self, now: f64) -> bool {
        if self.completion != Completion::Pending {
            return false;
        }
        if self.expected == 0 || self.connections.len() < self.expected {
            return false;
        }

        self.completion = Completion::Scheduled;
        self.timers.schedule(self.token, now, self.settle_delay, self.level.id.clone());
        tracing::info!(
            "Level {} complete ({}/{} connections), announcing in {:.0}ms",
            self.level.id, self.connections.len(), self.expected, self.settle_delay * 1000.0
        );
        true
    }

    /// Advance deferred work to `now`. Call once per frame.
    pub fn update(&mut self, now: f64) {
        for action in self.timers.poll(now) {
            if action.token != self.token || action.payload != self.level.id {
                tracing::debug!("Dropping stale completion from session {}", action.token);
                continue;
            }
            if self.completion != Completion::Scheduled {
                continue;
            }

            self.completion = Completion::Announced;
            self.events.level_complete.send(LevelCompleteEvent {
                level_id: action.payload,
                session: action.token,
                connections: self.connections.len(),
            });
        }
    }

    pub fn level(&self) -> &LevelDefinition {
        &self.level
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[cfg(test)]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn expected_connections(&self) -> usize {
        self.expected
    }

    /// Completion threshold reached (announced or still settling)
    #[cfg(test)]
    pub fn is_complete(&self) -> bool {
        self.completion != Completion::Pending
    }

    /// Level-complete event already sent for this session
    #[cfg(test)]
    pub fn is_announced(&self) -> bool {
        self.completion == Completion::Announced
    }

    /// Line segments to draw this frame: one per connection, plus a
    /// zero-length highlight at the armed dot.
    pub fn segments(&self) -> Vec<RenderSegment> {
        let mut segments: Vec<RenderSegment> = self.connections
            .iter()
            .filter_map(|key| {
                let (a, b) = key.endpoints();
                let from = self.level.dot(a)?;
                let to = self.level.dot(b)?;
                Some(RenderSegment {
                    from: from.position,
                    to: to.position,
                    kind: SegmentKind::Connection(from.color),
                })
            })
            .collect();

        if let Some(pending) = self.selection.armed() {
            segments.push(RenderSegment {
                from: pending.position,
                to: pending.position,
                kind: SegmentKind::Highlight,
            });
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DotDescriptor;

    fn dot(id: &str, x: f32, color: DotColor) -> DotDescriptor {
        DotDescriptor::new(id, Vec3::new(x, 0.0, 0.0), color)
    }

    /// {a1: blue, a2: blue, b1: red, b2: red}
    fn two_pairs() -> LevelDefinition {
        LevelDefinition::new("1", "Two Pairs", vec![
            dot("a1", -0.3, DotColor::Blue),
            dot("a2", 0.3, DotColor::Blue),
            dot("b1", -0.1, DotColor::Red),
            dot("b2", 0.1, DotColor::Red),
        ])
    }

    /// Four blue and two red: enough same-color dots for extra connections
    fn crowded() -> LevelDefinition {
        LevelDefinition::new("2", "Crowded", vec![
            dot("c1", 0.0, DotColor::Blue),
            dot("c2", 0.1, DotColor::Blue),
            dot("c3", 0.2, DotColor::Blue),
            dot("c4", 0.3, DotColor::Blue),
            dot("r1", 0.4, DotColor::Red),
            dot("r2", 0.5, DotColor::Red),
        ])
    }

    fn session_with(level: &LevelDefinition) -> LevelSession {
        let mut session = LevelSession::new(0.5);
        session.load(level);
        session
    }

    fn click_pair(session: &mut LevelSession, a: &str, b: &str, now: f64) -> ClickOutcome {
        session.handle_click(a, now);
        session.handle_click(b, now)
    }

    #[test]
    fn test_empty_level_never_completes() {
        let empty = LevelDefinition::new("e", "Empty", Vec::new());
        let mut session = session_with(&empty);

        assert_eq!(
            session.handle_click("anything", 0.0),
            ClickOutcome::UnknownDot { id: "anything".to_string() }
        );
        assert!(session.selection().is_idle());
        session.update(100.0);

        assert!(!session.is_complete());
        assert!(session.events.level_complete.is_empty());
        assert!(session.segments().is_empty());
    }

    #[test]
    fn test_pair_key_is_click_order_independent() {
        let level = two_pairs();

        let mut forward = session_with(&level);
        click_pair(&mut forward, "a1", "a2", 0.0);
        let mut backward = session_with(&level);
        click_pair(&mut backward, "a2", "a1", 0.0);

        assert_eq!(forward.connections().len(), 1);
        assert_eq!(backward.connections().len(), 1);
        assert_eq!(
            forward.connections().iter().next(),
            backward.connections().iter().next()
        );
    }

    #[test]
    fn test_same_pair_twice_is_one_connection() {
        let mut session = session_with(&two_pairs());

        assert!(matches!(click_pair(&mut session, "a1", "a2", 0.0), ClickOutcome::Connected { .. }));
        assert_eq!(
            click_pair(&mut session, "a2", "a1", 0.0),
            ClickOutcome::AlreadyConnected { key: ConnectionKey::new("a1", "a2") }
        );

        assert_eq!(session.connections().len(), 1);
        assert!(session.selection().is_idle());
        assert_eq!(session.events.connection_made.len(), 1);
    }

    #[test]
    fn test_self_click_deselects() {
        let mut session = session_with(&two_pairs());

        assert_eq!(session.handle_click("a1", 0.0), ClickOutcome::Armed { id: "a1".to_string() });
        assert_eq!(session.handle_click("a1", 0.0), ClickOutcome::Deselected { id: "a1".to_string() });

        assert!(session.connections().is_empty());
        assert!(session.selection().is_idle());
    }

    #[test]
    fn test_color_mismatch_deselects_without_connecting() {
        let mut session = session_with(&two_pairs());

        let outcome = click_pair(&mut session, "a1", "b1", 0.0);
        assert!(matches!(
            outcome,
            ClickOutcome::ColorMismatch { first_color: DotColor::Blue, second_color: DotColor::Red, .. }
        ));
        assert!(session.connections().is_empty());
        assert!(session.selection().is_idle());

        // The mismatched second dot is not armed either
        assert_eq!(session.handle_click("b2", 0.0), ClickOutcome::Armed { id: "b2".to_string() });
    }

    #[test]
    fn test_unknown_dot_leaves_armed_selection() {
        let mut session = session_with(&two_pairs());
        session.handle_click("a1", 0.0);

        assert!(matches!(session.handle_click("ghost", 0.0), ClickOutcome::UnknownDot { .. }));
        let armed = session.selection().armed().unwrap();
        assert_eq!(armed.id, "a1");
        assert_eq!(armed.color, DotColor::Blue);
        assert_eq!(armed.position, Vec3::new(-0.3, 0.0, 0.0));

        assert!(matches!(session.handle_click("a2", 0.0), ClickOutcome::Connected { .. }));
    }

    #[test]
    fn test_connections_only_grow_within_session() {
        let mut session = session_with(&crowded());
        let clicks = ["c1", "c2", "c1", "r1", "c3", "c3", "c2", "c1", "c4", "c2", "r1", "r2"];

        let mut last = 0;
        for id in clicks {
            session.handle_click(id, 0.0);
            let now = session.connections().len();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn test_completion_fires_once_after_settle_delay() {
        let mut session = session_with(&two_pairs());
        assert_eq!(session.expected_connections(), 2);

        assert_eq!(
            click_pair(&mut session, "a1", "a2", 1.0),
            ClickOutcome::Connected { key: ConnectionKey::new("a1", "a2"), completes_level: false }
        );
        assert!(!session.is_complete());

        assert_eq!(
            click_pair(&mut session, "b1", "b2", 2.0),
            ClickOutcome::Connected { key: ConnectionKey::new("b1", "b2"), completes_level: true }
        );
        assert!(session.is_complete());

        // Still settling
        session.update(2.25);
        assert!(session.events.level_complete.is_empty());
        assert!(!session.is_announced());

        session.update(2.5);
        let fired: Vec<_> = session.events.level_complete.drain().collect();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].level_id, "1");
        assert_eq!(fired[0].connections, 2);
        assert_eq!(fired[0].session, session.token());

        session.update(10.0);
        assert!(session.events.level_complete.is_empty());
    }

    #[test]
    fn test_redundant_connections_do_not_refire() {
        let mut session = session_with(&crowded());

        click_pair(&mut session, "c1", "c2", 0.0);
        assert!(matches!(
            click_pair(&mut session, "r1", "r2", 0.0),
            ClickOutcome::Connected { completes_level: true, .. }
        ));
        // Extra blue pairing while settling
        assert!(matches!(
            click_pair(&mut session, "c3", "c4", 0.1),
            ClickOutcome::Connected { completes_level: false, .. }
        ));

        session.update(1.0);
        assert_eq!(session.events.level_complete.drain().count(), 1);

        // And after the announcement
        click_pair(&mut session, "c1", "c4", 2.0);
        session.update(5.0);
        assert!(session.events.level_complete.is_empty());
        assert_eq!(session.connections().len(), 4);
    }

    #[test]
    fn test_reload_resets_connections_and_selection() {
        let level = two_pairs();
        let mut session = session_with(&level);
        click_pair(&mut session, "a1", "a2", 0.0);
        session.handle_click("b1", 0.0);
        let first_token = session.token();

        let second_token = session.load(&level);

        assert_ne!(first_token, second_token);
        assert!(session.connections().is_empty());
        assert!(session.selection().is_idle());
        assert!(session.events.connection_made.is_empty());
        assert_eq!(session.handle_click("b2", 0.0), ClickOutcome::Armed { id: "b2".to_string() });
    }

    #[test]
    fn test_completion_from_previous_session_is_dropped() {
        let level = two_pairs();
        let mut session = session_with(&level);
        click_pair(&mut session, "a1", "a2", 0.0);
        click_pair(&mut session, "b1", "b2", 0.0);
        assert!(session.is_complete());

        // Re-enter before the settle delay elapses
        session.load(&level);
        session.update(1.0);

        assert!(session.events.level_complete.is_empty());
        assert!(!session.is_complete());
    }

    #[test]
    fn test_end_discards_session() {
        let mut session = session_with(&two_pairs());
        click_pair(&mut session, "a1", "a2", 0.0);
        click_pair(&mut session, "b1", "b2", 0.0);

        session.end();
        session.update(1.0);

        assert!(session.events.level_complete.is_empty());
        assert!(session.connections().is_empty());
        assert!(matches!(session.handle_click("a1", 2.0), ClickOutcome::UnknownDot { .. }));
    }

    #[test]
    fn test_segments_include_highlight_for_armed_dot() {
        let mut session = session_with(&two_pairs());
        click_pair(&mut session, "a1", "a2", 0.0);
        session.handle_click("b1", 0.0);

        let segments = session.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind, SegmentKind::Connection(DotColor::Blue));
        assert_eq!(segments[0].from, Vec3::new(-0.3, 0.0, 0.0));
        assert_eq!(segments[0].to, Vec3::new(0.3, 0.0, 0.0));
        assert_eq!(segments[1].kind, SegmentKind::Highlight);
        assert_eq!(segments[1].from, segments[1].to);
    }
}
