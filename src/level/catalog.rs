//! Level definitions and the ordered catalog

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use crate::math::Vec3;
use super::{LevelError, load_catalog_from_str};

/// Built-in catalog shipped with the game
pub const BUILTIN_CATALOG: &str = include_str!("../../assets/levels/catalog.ron");

/// Dot color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DotColor {
    Blue,
    Red,
    Green,
    Purple,
    Yellow,
    Orange,
    White,
    Cyan,
    Pink,
}

impl DotColor {
    /// Lowercase display name
    pub fn label(&self) -> &'static str {
        match self {
            DotColor::Blue => "blue",
            DotColor::Red => "red",
            DotColor::Green => "green",
            DotColor::Purple => "purple",
            DotColor::Yellow => "yellow",
            DotColor::Orange => "orange",
            DotColor::White => "white",
            DotColor::Cyan => "cyan",
            DotColor::Pink => "pink",
        }
    }
}

/// A clickable dot in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotDescriptor {
    /// Unique within its level
    pub id: String,
    pub position: Vec3,
    pub color: DotColor,
}

impl DotDescriptor {
    #[cfg(test)]
    pub fn new(id: impl Into<String>, position: Vec3, color: DotColor) -> Self {
        Self { id: id.into(), position, color }
    }
}

/// A single puzzle level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Catalog-unique id
    pub id: String,
    /// Display name shown in menus
    pub name: String,
    /// Dots in definition order
    pub dots: Vec<DotDescriptor>,
    /// Camera position to frame this level from (looks at the origin).
    /// None keeps whatever framing was active before.
    #[serde(default)]
    pub camera: Option<Vec3>,
}

impl LevelDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dots: Vec<DotDescriptor>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dots,
            camera: None,
        }
    }

    #[cfg(test)]
    pub fn with_camera(mut self, camera: Vec3) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Look up a dot by id
    pub fn dot(&self, id: &str) -> Option<&DotDescriptor> {
        self.dots.iter().find(|d| d.id == id)
    }

    /// Number of dots per color
    pub fn color_counts(&self) -> BTreeMap<DotColor, usize> {
        let mut counts = BTreeMap::new();
        for dot in &self.dots {
            *counts.entry(dot.color).or_insert(0) += 1;
        }
        counts
    }

    /// Connections needed to finish the level: one per color with two or more dots.
    pub fn expected_connections(&self) -> usize {
        self.color_counts().values().filter(|&&n| n >= 2).count()
    }
}

/// Ordered, read-only collection of levels.
///
/// Catalog order is progression order: completing a level unlocks the one after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    #[cfg(test)]
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self { levels }
    }

    /// Parse the catalog embedded in the binary
    pub fn builtin() -> Result<Self, LevelError> {
        load_catalog_from_str(BUILTIN_CATALOG)
    }

    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Catalog position of a level
    pub fn position(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.id == id)
    }

    /// The level following `id` in catalog order, if any
    pub fn next_after(&self, id: &str) -> Option<&LevelDefinition> {
        let index = self.position(id)?;
        self.levels.get(index + 1)
    }

    /// Ids of the first `n` levels (fewer if the catalog is shorter)
    pub fn first_ids(&self, n: usize) -> impl Iterator<Item = &str> {
        self.levels.iter().take(n).map(|l| l.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_level() -> LevelDefinition {
        LevelDefinition::new("1", "Sample", vec![
            DotDescriptor::new("a1", Vec3::new(-0.3, 0.0, 0.0), DotColor::Blue),
            DotDescriptor::new("a2", Vec3::new(0.3, 0.0, 0.0), DotColor::Blue),
            DotDescriptor::new("b1", Vec3::new(0.0, 0.3, 0.0), DotColor::Red),
            DotDescriptor::new("b2", Vec3::new(0.0, -0.3, 0.0), DotColor::Red),
            DotDescriptor::new("core", Vec3::ZERO, DotColor::Pink),
        ])
    }

    #[test]
    fn test_expected_connections_skips_single_dot_colors() {
        let level = sample_level();
        assert_eq!(level.expected_connections(), 2);
        assert_eq!(level.color_counts()[&DotColor::Pink], 1);

        let empty = LevelDefinition::new("e", "Empty", Vec::new());
        assert_eq!(empty.expected_connections(), 0);
    }

    #[test]
    fn test_next_after_follows_catalog_order() {
        let catalog = LevelCatalog::new(vec![
            LevelDefinition::new("L1", "One", Vec::new()),
            LevelDefinition::new("L2", "Two", Vec::new()),
        ]);
        assert_eq!(catalog.next_after("L1").map(|l| l.id.as_str()), Some("L2"));
        assert!(catalog.next_after("L2").is_none());
        assert!(catalog.next_after("missing").is_none());
        assert_eq!(catalog.first_ids(5).collect::<Vec<_>>(), vec!["L1", "L2"]);
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.levels()[0].name, "Simple Pair");
        assert_eq!(catalog.levels()[0].expected_connections(), 2);

        // Octahedron: white apexes + cyan equator
        let octahedron = catalog.get("9").unwrap();
        assert_eq!(octahedron.expected_connections(), 2);
        assert!(catalog.levels().iter().all(|l| l.camera.is_some()));
    }
}
