//! Aurora - referral link redirect service
//!
//! `GET /Aurora/{code}` resolves a referral code against the stored referral
//! links, records a click for active links, and redirects to the booking page
//! with the code attached as a query parameter and a `ref` cookie.
//!
//! # Architecture
//! - `storage`: Referral store trait with SeaORM and PostgREST backends
//! - `services`: Referral resolution and click recording
//! - `api`: HTTP handlers, admin API and middleware
//! - `config`: Configuration loading (TOML + environment)
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging initialization
//! - `cli`: Command-line definitions

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
