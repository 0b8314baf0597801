use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 推荐链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralLink {
    pub id: i64,
    /// 规范写法的推荐码（匹配时大小写不敏感）
    pub code: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// 已记录的推荐点击
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralClick {
    pub id: i64,
    pub referral_id: i64,
    pub code: String,
    pub ip: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

/// 待写入的点击记录，`created_at` 由写入方填充
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReferralClick {
    pub referral_id: i64,
    pub code: String,
    pub ip: String,
    pub user_agent: String,
}
