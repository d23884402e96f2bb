//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Dark background color
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Header/status bar background
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Accent color (cyan)
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

// =============================================================================
// Buttons
// =============================================================================

pub const BUTTON_BG: Color = Color::new(0.196, 0.196, 0.216, 1.0);
pub const BUTTON_HOVER: Color = Color::new(0.235, 0.314, 0.392, 1.0);
pub const BUTTON_PRESSED: Color = Color::new(0.0, 0.55, 0.7, 1.0);
pub const BUTTON_LOCKED: Color = Color::new(0.13, 0.13, 0.15, 1.0);

// =============================================================================
// Message box
// =============================================================================

/// Full-screen dim behind a modal
pub const OVERLAY_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.6);
pub const MODAL_BG: Color = Color::new(0.176, 0.176, 0.196, 1.0);
pub const MODAL_BORDER: Color = Color::new(0.314, 0.314, 0.314, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

/// Screen title size
pub const FONT_SIZE_TITLE: f32 = 40.0;

/// Header/button text size
pub const FONT_SIZE_HEADER: f32 = 22.0;

/// Standard content text size
pub const FONT_SIZE_CONTENT: f32 = 18.0;

/// Small/detail text size
pub const FONT_SIZE_SMALL: f32 = 14.0;
