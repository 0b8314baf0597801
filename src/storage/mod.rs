use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::{ApiKeyKind, StoreBackend, StoreConfig};
use crate::errors::{AuroraError, Result};

pub mod backend;
pub mod models;
pub mod rest;

pub use backend::SeaOrmStorage;
pub use models::{NewReferralClick, ReferralClick, ReferralLink};
pub use rest::RestStore;

/// 推荐链接与点击日志的存储接口
///
/// 查询与写入是两个独立的、非事务的操作；并发请求各自写入自己的点击记录。
#[async_trait]
pub trait ReferralStore: Send + Sync {
    /// 按推荐码（大小写不敏感）查找 active 链接，多条命中时取 id 最小的一条
    async fn find_active(&self, code: &str) -> Result<Option<ReferralLink>>;

    /// 追加一条点击记录
    async fn record_click(&self, click: NewReferralClick) -> Result<()>;

    async fn list_links(&self) -> Result<Vec<ReferralLink>>;

    /// 创建推荐链接，推荐码大小写不敏感地唯一
    async fn create_link(&self, code: &str, active: bool) -> Result<ReferralLink>;

    async fn set_active(&self, id: i64, active: bool) -> Result<ReferralLink>;

    /// 删除推荐链接及其点击记录
    async fn delete_link(&self, id: i64) -> Result<()>;

    /// 最新的点击在前
    async fn list_clicks(&self, referral_id: i64, limit: u64) -> Result<Vec<ReferralClick>>;

    async fn delete_click(&self, id: i64) -> Result<()>;

    async fn health_check(&self) -> Result<()>;

    fn backend_name(&self) -> &str;
}

/// 规范化管理端提交的推荐码
pub fn normalize_new_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AuroraError::validation("Referral code must not be empty"));
    }
    if code.len() > 64 {
        return Err(AuroraError::validation(
            "Referral code must be at most 64 characters",
        ));
    }
    if !is_valid_code_charset(code) {
        return Err(AuroraError::validation(format!(
            "Referral code may only contain letters, digits, '-' and '_': '{}'",
            code
        )));
    }
    Ok(code.to_string())
}

/// 推荐码字符集：ASCII 字母、数字、`-`、`_`
pub fn is_valid_code_charset(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建存储后端（启动时调用一次）
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn ReferralStore>> {
        match config.backend {
            StoreBackend::Database => {
                let backend_type = backend::infer_backend_from_url(&config.database_url)?;
                let storage =
                    SeaOrmStorage::new(&config.database_url, &backend_type, config.pool_size)
                        .await?;
                Ok(Arc::new(storage))
            }
            StoreBackend::Rest => {
                let url = config
                    .rest_url
                    .as_deref()
                    .ok_or_else(|| AuroraError::config("store.rest_url is not set"))?;
                let (key, kind) = config.api_key().ok_or_else(|| {
                    AuroraError::config("store.service_role_key or store.anon_key is not set")
                })?;

                if kind == ApiKeyKind::Anon {
                    warn!(
                        "store.service_role_key not set, falling back to the anonymous key; \
                         admin writes may be rejected by row level security"
                    );
                }

                Ok(Arc::new(RestStore::new(url, key, config.timeout_secs)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_new_code() {
        assert_eq!(normalize_new_code("  SAVE10 ").unwrap(), "SAVE10");
        assert!(normalize_new_code("   ").is_err());
        assert!(normalize_new_code("a b").is_err());
        assert!(normalize_new_code("a/b").is_err());
        assert!(normalize_new_code(&"x".repeat(65)).is_err());
        assert!(normalize_new_code("50%OFF").is_err());
        assert_eq!(normalize_new_code("spring_sale-2").unwrap(), "spring_sale-2");
    }
}
