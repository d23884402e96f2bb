//! Level module - the read-only level catalog
//!
//! - Dot and level definitions (plain data, serde-friendly)
//! - Ordered catalog with "next level" lookup for progression
//! - RON loading with validation (plain or brotli-compressed)

mod catalog;
mod io;

pub use catalog::*;
pub use io::*;
