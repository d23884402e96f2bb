//! Immediate-mode UI for menus and the level HUD
//!
//! Design principles:
//! - Immediate mode (no retained state, rebuilt each frame)
//! - Simple rectangle-based layout
//! - Macroquad integration for rendering

mod input;
mod rect;
pub mod screens;
pub mod theme;
mod widgets;

pub use input::*;
pub use rect::*;
pub use screens::*;
pub use widgets::*;
