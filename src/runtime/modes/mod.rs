//! Execution modes
//!
//! - `server`: HTTP server (default)
//! - `migrate`: apply database migrations and exit

pub mod migrate;
pub mod server;

pub use migrate::run_migrate;
pub use server::run_server;
