//! Admin API 服务模块
//!
//! 推荐链接的查询、创建、启停、删除，以及点击记录的查看与删除。

pub mod error_code;
mod helpers;
mod referrals;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{
    error_from_aurora, error_response, json_config, link_error_response, success_response,
};

pub use error_code::ErrorCode;

pub use referrals::{
    create_referral, delete_click, delete_referral, list_referral_clicks, list_referrals,
    update_referral,
};
