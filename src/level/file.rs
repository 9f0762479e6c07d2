//! Level loading
//!
//! Levels are stored as human-readable RON:
//!
//! ```ron
//! (
//!     name: "Level 1",
//!     rows: [
//!         "          ",
//!         "   %  ^   ",
//!         "xxxxxxxxxx",
//!     ],
//! )
//! ```
//!
//! Files are validated before use; the built-in level is trusted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation limits for level files
pub mod limits {
    pub const MAX_ROWS: usize = 256;
    pub const MAX_COLUMNS: usize = 1024;
    pub const MAX_NAME_LEN: usize = 64;
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// The stock demo level.
pub const DEFAULT_MAP: [&str; 12] = [
    "                                        ",
    "                                        ",
    "                                        ",
    "                                        ",
    "                                        ",
    "                                        ",
    "      %  =*=%                           ",
    "                                        ",
    "                                        ",
    "            -+             -+           ",
    "            ()      ^   ^  ()           ",
    "xxxxxxxxxxxxxxxxxxxxxxxxxxxxx    xxxxxxx",
];

pub const DEFAULT_LEVEL_NAME: &str = "Level 0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    /// Shown top-right on the HUD
    pub name: String,
    pub rows: Vec<String>,
}

impl Default for LevelDef {
    fn default() -> Self {
        Self {
            name: DEFAULT_LEVEL_NAME.to_string(),
            rows: DEFAULT_MAP.iter().map(|row| row.to_string()).collect(),
        }
    }
}

impl LevelDef {
    /// Widest row, in cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Reject files that are empty or absurdly large. Ragged rows are allowed
/// (short rows simply have fewer tiles) but logged.
pub fn validate_level(level: &LevelDef) -> Result<(), LevelError> {
    if level.name.chars().count() > limits::MAX_NAME_LEN {
        return Err(LevelError::Validation(format!(
            "level name too long ({} > {})",
            level.name.chars().count(),
            limits::MAX_NAME_LEN
        )));
    }
    if level.rows.is_empty() {
        return Err(LevelError::Validation("level has no rows".to_string()));
    }
    if level.rows.len() > limits::MAX_ROWS {
        return Err(LevelError::Validation(format!(
            "too many rows ({} > {})",
            level.rows.len(),
            limits::MAX_ROWS
        )));
    }
    for (i, row) in level.rows.iter().enumerate() {
        let len = row.chars().count();
        if len > limits::MAX_COLUMNS {
            return Err(LevelError::Validation(format!(
                "row {} too wide ({} > {})",
                i,
                len,
                limits::MAX_COLUMNS
            )));
        }
    }

    let width = level.width();
    for (i, row) in level.rows.iter().enumerate() {
        let len = row.chars().count();
        if len != width {
            log::warn!("level '{}': row {} is {} wide, expected {}", level.name, i, len, width);
        }
    }
    Ok(())
}

/// Parse and validate a level from RON text.
pub fn load_level_from_str(s: &str) -> Result<LevelDef, LevelError> {
    let level: LevelDef = ron::from_str(s)?;
    validate_level(&level)?;
    Ok(level)
}

/// Load a level file.
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<LevelDef, LevelError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let level = load_level_from_str(&contents)?;
    log::info!(
        "loaded level '{}' ({}x{}) from {}",
        level.name,
        level.width(),
        level.height(),
        path.as_ref().display()
    );
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_shape() {
        let level = LevelDef::default();
        assert_eq!(level.name, "Level 0");
        assert_eq!(level.height(), 12);
        assert_eq!(level.width(), 40);
        assert!(validate_level(&level).is_ok());
    }

    #[test]
    fn test_load_from_str() {
        let level = load_level_from_str(r#"(name: "Tiny", rows: ["  ^ ", "xxxx"])"#).unwrap();
        assert_eq!(level.name, "Tiny");
        assert_eq!(level.rows, vec!["  ^ ".to_string(), "xxxx".to_string()]);
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let level = LevelDef { name: "ragged".into(), rows: vec!["x".into(), "xxxx".into()] };
        assert!(validate_level(&level).is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let empty = LevelDef { name: "empty".into(), rows: vec![] };
        assert!(matches!(validate_level(&empty), Err(LevelError::Validation(_))));

        let tall = LevelDef { name: "tall".into(), rows: vec![String::new(); limits::MAX_ROWS + 1] };
        assert!(matches!(validate_level(&tall), Err(LevelError::Validation(_))));

        let wide = LevelDef { name: "wide".into(), rows: vec!["x".repeat(limits::MAX_COLUMNS + 1)] };
        assert!(matches!(validate_level(&wide), Err(LevelError::Validation(_))));

        let named = LevelDef { name: "n".repeat(limits::MAX_NAME_LEN + 1), rows: vec!["x".into()] };
        assert!(matches!(validate_level(&named), Err(LevelError::Validation(_))));
    }

    #[test]
    fn test_load_level_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.ron");
        std::fs::write(&path, "(name: \"From disk\", rows: [\"xx\"])").unwrap();
        assert_eq!(load_level(&path).unwrap().name, "From disk");

        std::fs::write(&path, "(name: \"broken\"").unwrap();
        assert!(matches!(load_level(&path), Err(LevelError::Parse(_))));

        assert!(matches!(load_level(dir.path().join("missing.ron")), Err(LevelError::Io(_))));
    }
}
