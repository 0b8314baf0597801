//! 推荐码解析
//!
//! 查询 active 推荐链接 → 尽力记录点击 → 返回最终推荐码。
//! 查询失败直接返回错误；点击写入失败只记日志，不影响结果。

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::errors::Result;
use crate::storage::{NewReferralClick, ReferralLink, ReferralStore};

/// 点击记录所需的请求元数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickContext {
    pub ip: String,
    pub user_agent: String,
}

pub struct ReferralService {
    store: Arc<dyn ReferralStore>,
}

impl ReferralService {
    pub fn new(store: Arc<dyn ReferralStore>) -> Self {
        Self { store }
    }

    /// 解析推荐码
    ///
    /// - 空白输入返回 `None`（不归因）
    /// - 命中 active 链接时返回存储中的规范写法，并写入一条点击记录
    /// - 未命中时返回大写后的输入，不写点击记录
    pub async fn resolve(&self, raw_code: &str, context: ClickContext) -> Result<Option<String>> {
        let code = raw_code.trim();
        if code.is_empty() {
            trace!("Empty referral code, skipping attribution");
            return Ok(None);
        }

        let Some(link) = self.store.find_active(code).await? else {
            debug!("No active referral link for '{}'", code);
            return Ok(Some(code.to_uppercase()));
        };

        self.record_click(&link, context).await;
        Ok(Some(link.code))
    }

    /// 点击写入在独立任务中执行，错误和 panic 都止步于此
    async fn record_click(&self, link: &ReferralLink, context: ClickContext) {
        let store = Arc::clone(&self.store);
        let click = NewReferralClick {
            referral_id: link.id,
            code: link.code.clone(),
            ip: context.ip,
            user_agent: context.user_agent,
        };

        match tokio::spawn(async move { store.record_click(click).await }).await {
            Ok(Ok(())) => trace!("Referral click recorded for {}", link.code),
            Ok(Err(e)) => warn!("Failed to record referral click for {}: {}", link.code, e),
            Err(e) => warn!("Referral click task for {} did not complete: {}", link.code, e),
        }
    }
}
