//! Configuration
//!
//! The configuration is loaded once at startup and passed to every
//! component explicitly; there is no global instance.

mod structs;

pub use structs::*;

/// Default configuration file, resolved relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
