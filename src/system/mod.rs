//! System-level modules
//!
//! Process concerns that are not part of request handling.

pub mod logging;

pub use logging::init_logging;
