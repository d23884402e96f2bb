//! Level catalog loading
//!
//! Uses RON (Rusty Object Notation) for human-readable catalog files.
//! Supports both compressed (brotli) and uncompressed RON files.
//! - Reading: auto-detects format by checking for a plausible RON start
//! - Every load path validates before handing the catalog out

use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use super::{LevelCatalog, LevelDefinition};
use crate::math::Vec3;

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum number of levels in a catalog
    pub const MAX_LEVELS: usize = 256;
    /// Maximum number of dots in one level
    pub const MAX_DOTS: usize = 512;
    /// Maximum length for level ids, dot ids and names
    pub const MAX_STRING_LEN: usize = 128;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Error type for catalog loading
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Check if a coordinate is valid (not NaN or Inf, within bounds)
fn is_valid_coord(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

fn validate_vec3(v: Vec3, context: &str) -> Result<(), String> {
    if !is_valid_coord(v.x) || !is_valid_coord(v.y) || !is_valid_coord(v.z) {
        return Err(format!("{}: invalid coordinates ({}, {}, {})", context, v.x, v.y, v.z));
    }
    Ok(())
}

fn validate_string(s: &str, context: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err(format!("{}: empty", context));
    }
    if s.len() > limits::MAX_STRING_LEN {
        return Err(format!("{}: too long ({} > {})", context, s.len(), limits::MAX_STRING_LEN));
    }
    Ok(())
}

/// Validate a single level
fn validate_level(level: &LevelDefinition, level_idx: usize) -> Result<(), String> {
    let context = format!("level[{}]", level_idx);

    validate_string(&level.id, &format!("{} id", context))?;
    validate_string(&level.name, &format!("{} name", context))?;

    if level.dots.len() > limits::MAX_DOTS {
        return Err(format!("{}: too many dots ({} > {})",
            context, level.dots.len(), limits::MAX_DOTS));
    }

    let mut seen = HashSet::new();
    for (i, dot) in level.dots.iter().enumerate() {
        let dot_context = format!("{} dot[{}]", context, i);
        validate_string(&dot.id, &format!("{} id", dot_context))?;
        if !seen.insert(dot.id.as_str()) {
            return Err(format!("{}: duplicate dot id '{}'", dot_context, dot.id));
        }
        validate_vec3(dot.position, &dot_context)?;
    }

    if let Some(camera) = level.camera {
        validate_vec3(camera, &format!("{} camera", context))?;
    }

    Ok(())
}

/// Validate an entire catalog
pub fn validate_catalog(catalog: &LevelCatalog) -> Result<(), LevelError> {
    if catalog.levels.len() > limits::MAX_LEVELS {
        return Err(LevelError::Validation(format!(
            "too many levels ({} > {})", catalog.levels.len(), limits::MAX_LEVELS
        )));
    }

    let mut seen = HashSet::new();
    for (i, level) in catalog.levels.iter().enumerate() {
        validate_level(level, i).map_err(LevelError::Validation)?;
        if !seen.insert(level.id.as_str()) {
            return Err(LevelError::Validation(format!(
                "level[{}]: duplicate level id '{}'", i, level.id
            )));
        }
    }

    Ok(())
}

/// Plain RON starts with a struct paren, a comment, an extension attribute,
/// a struct name or whitespace. Brotli output is binary.
fn looks_like_ron(bytes: &[u8]) -> bool {
    bytes.first()
        .map(|&b| b == b'(' || b == b'/' || b == b'#' || b.is_ascii_alphabetic() || b.is_ascii_whitespace())
        .unwrap_or(false)
}

/// Log a RON parse error with the offending line for context
fn report_parse_error(source: &str, contents: &str, e: &ron::error::SpannedError) {
    tracing::warn!("RON parse error in {}: {}", source, e);
    let pos = e.position;
    let lines: Vec<&str> = contents.lines().collect();
    let line_idx = pos.line.saturating_sub(1);
    if let Some(line) = lines.get(line_idx) {
        tracing::warn!("  Line {}: {}", pos.line, line.trim());
    }
}

/// Parse catalog data from bytes (plain or brotli-compressed RON)
pub fn parse_catalog_data(bytes: &[u8]) -> Result<LevelCatalog, LevelError> {
    let contents = match std::str::from_utf8(bytes) {
        Ok(text) if looks_like_ron(bytes) => text.to_string(),
        _ => {
            let mut decompressed = Vec::new();
            brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
                .map_err(|e| std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("brotli decompression failed: {}", e),
                ))?;
            String::from_utf8(decompressed)
                .map_err(|e| std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("invalid UTF-8 after decompression: {}", e),
                ))?
        }
    };

    load_catalog_from_str(&contents)
}

/// Load a catalog from a RON string (for the embedded catalog or testing)
pub fn load_catalog_from_str(s: &str) -> Result<LevelCatalog, LevelError> {
    let catalog: LevelCatalog = match ron::from_str(s) {
        Ok(c) => c,
        Err(e) => {
            report_parse_error("catalog", s, &e);
            return Err(e.into());
        }
    };

    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Load a catalog file from disk (supports both compressed and uncompressed)
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<LevelCatalog, LevelError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let catalog = parse_catalog_data(&bytes)?;
    tracing::info!("Loaded {} levels from {}", catalog.len(), path.display());
    Ok(catalog)
}
