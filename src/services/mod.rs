//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the tests; handlers only translate
//! requests and responses.

mod referral;

pub use referral::{ClickContext, ReferralService};
