pub mod admin;
pub mod health;
pub mod referral;

pub use admin::routes::admin_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use referral::{REF_QUERY_PARAM, ReferralRedirectService, referral_routes};
