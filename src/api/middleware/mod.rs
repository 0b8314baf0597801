pub mod auth;
pub mod request_id;

pub use auth::AdminAuth;
pub use request_id::{RequestId, RequestIdMiddleware};
