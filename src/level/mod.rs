//! Levels
//!
//! A level is a name plus a grid of symbols. `tiles` turns the grid into
//! entities through a per-symbol recipe table; `file` loads custom levels
//! from RON.

mod file;
mod tiles;

pub use file::*;
pub use tiles::*;
