//! Game Module
//!
//! The level interaction core. Plain data in, plain data out: nothing here
//! touches macroquad, so every rule is testable without a window.
//!
//! Key concepts:
//! - LevelSession: click protocol, connections, completion detection
//! - DeferredQueue: settle delay before announcing completion, keyed by session
//! - FramingController: camera placement on level start
//! - ProgressionManager: unlocked levels across sessions
//! - Events: decoupled output drained by the app each frame

pub mod connection;
pub mod event;
pub mod framing;
pub mod play;
pub mod progression;
pub mod session;
pub mod timer;

// Re-export the types the app, scene and config use
pub use framing::CameraTransform;
pub use play::PlayState;
pub use progression::{ProgressionManager, DEFAULT_INITIAL_UNLOCKED};
pub use session::{ClickOutcome, LevelSession, SegmentKind};
