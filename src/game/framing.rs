//! Camera framing for level sessions
//!
//! Each level may carry a camera position hint. On session start the camera
//! moves to that position and looks at the world origin. Without a hint the
//! previous camera stays where it was. Position and target always change
//! together: the controller only ever swaps whole `CameraTransform` values.

use crate::math::Vec3;

/// Camera placement handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
}

impl CameraTransform {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Camera at `position` looking at the world origin
    pub fn looking_at_origin(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }
}

impl Default for CameraTransform {
    /// Straight-on view from +Z, five units out
    fn default() -> Self {
        Self::looking_at_origin(Vec3::new(0.0, 0.0, 5.0))
    }
}

/// Result of framing a level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramingOutcome {
    /// The level's hint was applied
    Applied(CameraTransform),
    /// No usable hint; the previous transform was kept
    Kept(CameraTransform),
}

/// Owns the active camera transform
#[derive(Debug, Clone)]
pub struct FramingController {
    current: CameraTransform,
}

impl FramingController {
    pub fn new(initial: CameraTransform) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> CameraTransform {
        self.current
    }

    /// Apply a level's framing hint.
    ///
    /// A hint at the origin (or with non-finite components) cannot look at
    /// the origin and is treated like no hint.
    pub fn frame(&mut self, hint: Option<Vec3>) -> FramingOutcome {
        match hint {
            Some(position) if position.is_finite() && position.len() > f32::EPSILON => {
                self.current = CameraTransform::looking_at_origin(position);
                tracing::debug!(
                    "Camera framed at ({:.2}, {:.2}, {:.2})",
                    position.x, position.y, position.z
                );
                FramingOutcome::Applied(self.current)
            }
            Some(position) => {
                tracing::warn!(
                    "Ignoring unusable camera hint ({}, {}, {})",
                    position.x, position.y, position.z
                );
                FramingOutcome::Kept(self.current)
            }
            None => FramingOutcome::Kept(self.current),
        }
    }

    /// Replace the transform after user camera movement (orbit/zoom)
    pub fn set_current(&mut self, transform: CameraTransform) {
        self.current = transform;
    }
}
