//! Play state - one level session plus its camera
//!
//! Starting a level resets the interaction session and applies the level's
//! camera framing in the same call, so no click can be processed between
//! the two.

use crate::level::LevelDefinition;
use super::framing::{CameraTransform, FramingController, FramingOutcome};
use super::session::{ClickOutcome, LevelSession};
use super::timer::SessionToken;

pub struct PlayState {
    pub session: LevelSession,
    pub framing: FramingController,
}

impl PlayState {
    pub fn new(settle_delay: f64, initial_camera: CameraTransform) -> Self {
        Self {
            session: LevelSession::new(settle_delay),
            framing: FramingController::new(initial_camera),
        }
    }

    /// Reset the session for `level` and frame its camera
    pub fn start_level(&mut self, level: &LevelDefinition) -> (SessionToken, FramingOutcome) {
        let framing = self.framing.frame(level.camera);
        let token = self.session.load(level);
        (token, framing)
    }

    /// Leave the level; any pending completion is discarded
    pub fn end_level(&mut self) {
        self.session.end();
    }

    pub fn click(&mut self, dot_id: &str, now: f64) -> ClickOutcome {
        self.session.handle_click(dot_id, now)
    }

    pub fn update(&mut self, now: f64) {
        self.session.update(now);
    }

    pub fn camera(&self) -> CameraTransform {
        self.framing.current()
    }
}
