//! Data models for directory objects

mod directory;

pub use directory::*;
