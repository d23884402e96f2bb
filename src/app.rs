//! Application state and screen navigation
//!
//! One screen is active at a time. The level session and the unlocked set
//! outlive screen changes; leaving a level ends its session so a pending
//! completion never fires after the player has left.

use crate::config::GameConfig;
use crate::game::{ClickOutcome, PlayState, ProgressionManager};
use crate::level::{LevelCatalog, LevelDefinition};

/// The available screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    LevelSelect,
    Options,
    InLevel,
}

/// Something the player picked in the UI this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Play,
    Options,
    BackToMenu,
    SelectLevel(String),
    BackToLevels,
    CloseMessage,
}

/// Main application state
pub struct AppState {
    pub screen: Screen,
    pub config: GameConfig,
    pub catalog: LevelCatalog,
    pub progression: ProgressionManager,
    pub play: PlayState,
    /// Modal message (level completion), blocks input while shown
    pub message: Option<String>,
    /// Feedback for the last click, shown in the HUD
    pub status: Option<String>,
}

impl AppState {
    pub fn new(config: GameConfig, catalog: LevelCatalog) -> Self {
        let progression = ProgressionManager::new(&catalog, config.initial_unlocked);
        let play = PlayState::new(config.settle_delay_secs(), config.initial_camera());
        tracing::info!(
            "{} levels, {} unlocked",
            catalog.len(),
            progression.unlocked().len()
        );
        Self {
            screen: Screen::MainMenu,
            config,
            catalog,
            progression,
            play,
            message: None,
            status: None,
        }
    }

    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::Play => self.screen = Screen::LevelSelect,
            AppAction::Options => self.screen = Screen::Options,
            AppAction::BackToMenu => self.screen = Screen::MainMenu,
            AppAction::SelectLevel(id) => {
                self.open_level(&id);
            }
            AppAction::BackToLevels => self.leave_level(),
            AppAction::CloseMessage => self.close_message(),
        }
    }

    /// Start a session for an unlocked level. Returns false if the level is
    /// locked or unknown.
    pub fn open_level(&mut self, id: &str) -> bool {
        if !self.progression.is_unlocked(id) {
            tracing::warn!("Level {} is locked", id);
            return false;
        }
        let Some(level) = self.catalog.get(id) else {
            tracing::warn!("Level {} is not in the catalog", id);
            return false;
        };

        self.play.start_level(level);
        self.screen = Screen::InLevel;
        self.message = None;
        self.status = None;
        true
    }

    /// Back to level select, discarding the session
    pub fn leave_level(&mut self) {
        self.play.end_level();
        self.status = None;
        self.screen = Screen::LevelSelect;
    }

    pub fn close_message(&mut self) {
        self.message = None;
        self.leave_level();
    }

    /// Level currently being played
    #[cfg(test)]
    pub fn current_level(&self) -> Option<&LevelDefinition> {
        match self.screen {
            Screen::InLevel => Some(self.play.session.level()),
            _ => None,
        }
    }

    pub fn click_dot(&mut self, id: &str, now: f64) -> ClickOutcome {
        let outcome = self.play.click(id, now);
        if let Some(status) = describe_click(&outcome) {
            self.status = Some(status);
        }
        outcome
    }

    /// Advance timers and react to session events. Call once per frame.
    pub fn update(&mut self, now: f64) {
        self.play.update(now);

        let expected = self.play.session.expected_connections();
        for event in self.play.session.events.connection_made.drain() {
            self.status = Some(format!(
                "Connected {} ({}/{})",
                event.key, event.total, expected
            ));
        }

        let completed: Vec<_> = self.play.session.events.level_complete.drain().collect();
        for event in completed {
            if event.session != self.play.session.token() {
                continue;
            }
            match self.progression.complete_level(&self.catalog, &event.level_id) {
                Ok(report) => self.message = Some(report.message()),
                Err(e) => tracing::error!("Failed to record completion: {}", e),
            }
        }
    }
}

/// HUD line for a click. Connections are reported from the event stream.
fn describe_click(outcome: &ClickOutcome) -> Option<String> {
    match outcome {
        ClickOutcome::UnknownDot { .. } | ClickOutcome::Connected { .. } => None,
        ClickOutcome::Armed { id } => Some(format!("Selected {}", id)),
        ClickOutcome::Deselected { .. } => Some("Cannot connect a dot to itself".to_string()),
        ClickOutcome::ColorMismatch { first_color, second_color, .. } => Some(format!(
            "Colors must match ({} vs {})",
            first_color.label(),
            second_color.label()
        )),
        ClickOutcome::AlreadyConnected { key } => Some(format!("Connection {} already exists", key)),
    }
}
