//! Admin API 类型定义

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreateReferralRequest {
    pub code: String,
    pub active: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateReferralRequest {
    pub active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ClicksQuery {
    pub limit: Option<u64>,
}

/// 点击列表默认条数
pub const DEFAULT_CLICKS_LIMIT: u64 = 100;
/// 点击列表最大条数
pub const MAX_CLICKS_LIMIT: u64 = 1000;

impl ClicksQuery {
    pub fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_CLICKS_LIMIT)
            .clamp(1, MAX_CLICKS_LIMIT)
    }
}
