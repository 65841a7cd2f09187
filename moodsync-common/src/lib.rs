//! # MoodSync Common Library
//!
//! Shared code for the MoodSync crates including:
//! - Error taxonomy and result alias
//! - TOML configuration loading with layered file resolution
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod time;

pub use config::{FusionSettings, LoggingConfig, TomlConfig};
pub use error::{Error, Result};
