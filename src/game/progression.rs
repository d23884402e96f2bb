//! Level progression
//!
//! Tracks which levels are unlocked for the lifetime of the app. Completing
//! a level unlocks the one after it in catalog order. Levels are never
//! re-locked; nothing here is persisted.

use std::collections::BTreeSet;
use thiserror::Error;
use crate::level::LevelCatalog;

/// Levels unlocked at startup when nothing is configured
pub const DEFAULT_INITIAL_UNLOCKED: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ProgressionError {
    #[error("level '{0}' is not in the catalog")]
    UnknownLevel(String),
}

/// Result of completing a level
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReport {
    pub completed_level_id: String,
    /// Level after the completed one, None if it was the last
    pub next_level_id: Option<String>,
    /// The next level was locked before this call
    pub newly_unlocked: bool,
    /// The completed level was the last in the catalog
    pub all_complete: bool,
}

impl CompletionReport {
    /// Player-facing summary
    pub fn message(&self) -> String {
        match (&self.next_level_id, self.newly_unlocked) {
            (None, _) => "Congratulations! All levels completed!".to_string(),
            (Some(next), true) => format!(
                "Level {} completed! Level {} unlocked!",
                self.completed_level_id, next
            ),
            (Some(_), false) => format!("Level {} completed!", self.completed_level_id),
        }
    }
}

/// Owns the unlocked-level set
#[derive(Debug, Clone, Default)]
pub struct ProgressionManager {
    unlocked: BTreeSet<String>,
}

impl ProgressionManager {
    /// Start with the first `initial_unlocked` catalog levels unlocked
    pub fn new(catalog: &LevelCatalog, initial_unlocked: usize) -> Self {
        Self {
            unlocked: catalog.first_ids(initial_unlocked).map(str::to_string).collect(),
        }
    }

    /// Start from an explicit set of unlocked ids
    #[cfg(test)]
    pub fn with_unlocked<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unlocked: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unlocked(&self, level_id: &str) -> bool {
        self.unlocked.contains(level_id)
    }

    pub fn unlocked(&self) -> &BTreeSet<String> {
        &self.unlocked
    }

    /// Record completion of `level_id` and unlock the next level.
    ///
    /// Calling this twice for the same level leaves the set unchanged the
    /// second time and reports `newly_unlocked = false`.
    pub fn complete_level(
        &mut self,
        catalog: &LevelCatalog,
        level_id: &str,
    ) -> Result<CompletionReport, ProgressionError> {
        if catalog.position(level_id).is_none() {
            return Err(ProgressionError::UnknownLevel(level_id.to_string()));
        }

        let Some(next) = catalog.next_after(level_id) else {
            tracing::info!("Level {} completed, all levels complete", level_id);
            return Ok(CompletionReport {
                completed_level_id: level_id.to_string(),
                next_level_id: None,
                newly_unlocked: false,
                all_complete: true,
            });
        };

        let newly_unlocked = self.unlocked.insert(next.id.clone());
        if newly_unlocked {
            tracing::info!("Level {} completed, level {} unlocked", level_id, next.id);
        } else {
            tracing::info!("Level {} completed", level_id);
        }

        Ok(CompletionReport {
            completed_level_id: level_id.to_string(),
            next_level_id: Some(next.id.clone()),
            newly_unlocked,
            all_complete: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelDefinition;

    fn three_levels() -> LevelCatalog {
        LevelCatalog::new(vec![
            LevelDefinition::new("L1", "One", Vec::new()),
            LevelDefinition::new("L2", "Two", Vec::new()),
            LevelDefinition::new("L3", "Three", Vec::new()),
        ])
    }

    #[test]
    fn test_seed_unlocks_first_levels() {
        let catalog = three_levels();
        let progression = ProgressionManager::new(&catalog, 2);
        assert!(progression.is_unlocked("L1"));
        assert!(progression.is_unlocked("L2"));
        assert!(!progression.is_unlocked("L3"));

        let all = ProgressionManager::new(&catalog, 10);
        assert_eq!(all.unlocked().len(), 3);
    }

    #[test]
    fn test_completing_unlocks_next_once() {
        let catalog = three_levels();
        let mut progression = ProgressionManager::with_unlocked(["L1"]);

        let first = progression.complete_level(&catalog, "L1").unwrap();
        assert_eq!(first.next_level_id.as_deref(), Some("L2"));
        assert!(first.newly_unlocked);
        assert!(!first.all_complete);
        assert_eq!(first.message(), "Level L1 completed! Level L2 unlocked!");
        assert_eq!(
            progression.unlocked().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["L1", "L2"]
        );

        // A second call for the same completion is harmless but reports no unlock
        let second = progression.complete_level(&catalog, "L1").unwrap();
        assert_eq!(second.next_level_id.as_deref(), Some("L2"));
        assert!(!second.newly_unlocked);
        assert_eq!(second.message(), "Level L1 completed!");
        assert_eq!(progression.unlocked().len(), 2);
    }

    #[test]
    fn test_last_level_reports_all_complete() {
        let catalog = three_levels();
        let mut progression = ProgressionManager::with_unlocked(["L1", "L3"]);

        let report = progression.complete_level(&catalog, "L3").unwrap();
        assert!(report.all_complete);
        assert!(report.next_level_id.is_none());
        assert!(!report.newly_unlocked);
        assert_eq!(report.message(), "Congratulations! All levels completed!");
        assert_eq!(progression.unlocked().len(), 2);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let catalog = three_levels();
        let mut progression = ProgressionManager::with_unlocked(["L1"]);

        assert_eq!(
            progression.complete_level(&catalog, "L9"),
            Err(ProgressionError::UnknownLevel("L9".to_string()))
        );
        assert_eq!(progression.unlocked().len(), 1);
    }
}
