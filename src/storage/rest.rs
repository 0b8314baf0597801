//! PostgREST 兼容的托管存储
//!
//! 通过 `{base}/rest/v1/{table}` 访问 referral_links / referral_clicks。
//! ureq 是同步客户端，所有请求在 spawn_blocking 中执行。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};
use ureq::Agent;

use crate::errors::{AuroraError, Result};
use crate::storage::{
    NewReferralClick, ReferralClick, ReferralLink, ReferralStore, normalize_new_code,
};

const LINKS_TABLE: &str = "referral_links";
const CLICKS_TABLE: &str = "referral_clicks";
const LINK_COLUMNS: &str = "id,code,active,created_at";
const CLICK_COLUMNS: &str = "id,referral_id,code,ip,user_agent,created_at";

/// 服务地址与访问 key
struct Endpoint {
    base_url: String,
    api_key: String,
}

impl Endpoint {
    fn table_url(&self, table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}/rest/v1/{}", self.base_url, table)
        } else {
            format!("{}/rest/v1/{}?{}", self.base_url, table, query)
        }
    }

    fn authed<B>(&self, req: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        req.header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

/// `ilike` 过滤值：LIKE 通配符转义后整体加双引号
///
/// 双引号内 PostgREST 会再去掉一层 `\\` 转义，所以反斜杠转义两次。
/// `*` 无法转义（PostgREST 总把它当作 `%`），调用方需在本地再比对一次。
pub(crate) fn ilike_exact(code: &str) -> String {
    let pattern = code
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let quoted = pattern.replace('\\', "\\\\").replace('"', "\\\"");
    format!("ilike.{}", urlencoding::encode(&format!("\"{}\"", quoted)))
}

/// 与 `ILIKE` 一致的本地比对（两边转小写）
fn same_code(stored: &str, wanted_lower: &str) -> bool {
    stored.to_lowercase() == wanted_lower
}

pub struct RestStore {
    agent: Agent,
    endpoint: Arc<Endpoint>,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs.max(1))))
            .build()
            .into();

        info!("REST store configured at {}", base_url);

        Self {
            agent,
            endpoint: Arc::new(Endpoint {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            }),
        }
    }

    /// 在阻塞线程池中执行一次 HTTP 调用
    async fn blocking<T, F>(&self, op: &'static str, call: F) -> Result<T>
    where
        F: FnOnce(&Agent, &Endpoint) -> std::result::Result<T, ureq::Error> + Send + 'static,
        T: Send + 'static,
    {
        let agent = self.agent.clone();
        let endpoint = Arc::clone(&self.endpoint);

        tokio::task::spawn_blocking(move || call(&agent, &endpoint))
            .await
            .map_err(|e| AuroraError::remote_store(format!("{} task failed: {}", op, e)))?
            .map_err(|e| AuroraError::remote_store(format!("{} failed: {}", op, e)))
    }

    async fn fetch_links(&self, op: &'static str, query: String) -> Result<Vec<ReferralLink>> {
        self.blocking(op, move |agent, endpoint| {
            let url = endpoint.table_url(LINKS_TABLE, &query);
            endpoint
                .authed(agent.get(&url))
                .call()?
                .into_body()
                .read_json::<Vec<ReferralLink>>()
        })
        .await
    }

    /// 按 id 删除，返回被删除的行
    async fn delete_by_id<T>(&self, op: &'static str, table: &'static str, id: i64) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        self.blocking(op, move |agent, endpoint| {
            let url = endpoint.table_url(table, &format!("id=eq.{}", id));
            endpoint
                .authed(agent.delete(&url))
                .header("Prefer", "return=representation")
                .call()?
                .into_body()
                .read_json::<Vec<T>>()
        })
        .await
    }

    /// 按推荐码大小写不敏感地精确查找，按 id 升序
    async fn fetch_by_code(
        &self,
        op: &'static str,
        code: &str,
        extra_filters: &str,
    ) -> Result<Vec<ReferralLink>> {
        // 含 `*` 时服务端结果可能多于精确匹配，不能只取一条
        let limit = if code.contains('*') { "" } else { "&limit=1" };
        let query = format!(
            "select={}&code={}{}&order=id.asc{}",
            LINK_COLUMNS,
            ilike_exact(code),
            extra_filters,
            limit
        );

        let wanted = code.to_lowercase();
        let links = self.fetch_links(op, query).await?;
        Ok(links
            .into_iter()
            .filter(|link| same_code(&link.code, &wanted))
            .collect())
    }
}

#[async_trait]
impl ReferralStore for RestStore {
    async fn find_active(&self, code: &str) -> Result<Option<ReferralLink>> {
        let links = self
            .fetch_by_code("find_active", code, "&active=eq.true")
            .await?;
        Ok(links.into_iter().next())
    }

    async fn record_click(&self, click: NewReferralClick) -> Result<()> {
        self.blocking("record_click", move |agent, endpoint| {
            let url = endpoint.table_url(CLICKS_TABLE, "");
            endpoint
                .authed(agent.post(&url))
                .header("Prefer", "return=minimal")
                .send_json(json!({
                    "referral_id": click.referral_id,
                    "code": click.code,
                    "ip": click.ip,
                    "user_agent": click.user_agent,
                }))
                .map(|_| ())
        })
        .await
    }

    async fn list_links(&self) -> Result<Vec<ReferralLink>> {
        self.fetch_links("list_links", format!("select={}&order=id.asc", LINK_COLUMNS))
            .await
    }

    async fn create_link(&self, code: &str, active: bool) -> Result<ReferralLink> {
        let code = normalize_new_code(code)?;

        let existing = self.fetch_by_code("create_link", &code, "").await?;
        if let Some(existing) = existing.into_iter().next() {
            return Err(AuroraError::conflict(format!(
                "Referral code already exists: {}",
                existing.code
            )));
        }

        let created: Vec<ReferralLink> = self
            .blocking("create_link", move |agent, endpoint| {
                let url = endpoint.table_url(LINKS_TABLE, &format!("select={}", LINK_COLUMNS));
                endpoint
                    .authed(agent.post(&url))
                    .header("Prefer", "return=representation")
                    .send_json(json!({ "code": code, "active": active }))?
                    .into_body()
                    .read_json::<Vec<ReferralLink>>()
            })
            .await?;

        let link = created
            .into_iter()
            .next()
            .ok_or_else(|| AuroraError::remote_store("create_link returned no row"))?;
        info!("Referral link created: {} (active={})", link.code, link.active);
        Ok(link)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<ReferralLink> {
        let updated: Vec<ReferralLink> = self
            .blocking("set_active", move |agent, endpoint| {
                let url = endpoint.table_url(
                    LINKS_TABLE,
                    &format!("id=eq.{}&select={}", id, LINK_COLUMNS),
                );
                endpoint
                    .authed(agent.patch(&url))
                    .header("Prefer", "return=representation")
                    .send_json(json!({ "active": active }))?
                    .into_body()
                    .read_json::<Vec<ReferralLink>>()
            })
            .await?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| AuroraError::not_found(format!("Referral link not found: {}", id)))
    }

    async fn delete_link(&self, id: i64) -> Result<()> {
        let deleted: Vec<ReferralLink> = self.delete_by_id("delete_link", LINKS_TABLE, id).await?;
        if deleted.is_empty() {
            return Err(AuroraError::not_found(format!(
                "Referral link not found: {}",
                id
            )));
        }
        info!("Referral link deleted: {}", id);
        Ok(())
    }

    async fn list_clicks(&self, referral_id: i64, limit: u64) -> Result<Vec<ReferralClick>> {
        self.blocking("list_clicks", move |agent, endpoint| {
            let url = endpoint.table_url(
                CLICKS_TABLE,
                &format!(
                    "select={}&referral_id=eq.{}&order=created_at.desc,id.desc&limit={}",
                    CLICK_COLUMNS, referral_id, limit
                ),
            );
            endpoint
                .authed(agent.get(&url))
                .call()?
                .into_body()
                .read_json::<Vec<ReferralClick>>()
        })
        .await
    }

    async fn delete_click(&self, id: i64) -> Result<()> {
        let deleted: Vec<ReferralClick> =
            self.delete_by_id("delete_click", CLICKS_TABLE, id).await?;
        if deleted.is_empty() {
            return Err(AuroraError::not_found(format!(
                "Referral click not found: {}",
                id
            )));
        }
        info!("Referral click deleted: {}", id);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let rows: Vec<serde_json::Value> = self
            .blocking("health_check", |agent, endpoint| {
                let url = endpoint.table_url(LINKS_TABLE, "select=id&limit=1");
                endpoint
                    .authed(agent.get(&url))
                    .call()?
                    .into_body()
                    .read_json::<Vec<serde_json::Value>>()
            })
            .await?;

        debug!("REST store reachable ({} rows probed)", rows.len());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ilike_exact_escapes_wildcards() {
        assert_eq!(ilike_exact("SAVE10"), "ilike.%22SAVE10%22");
        assert_eq!(ilike_exact("Summer Sale"), "ilike.%22Summer%20Sale%22");
        assert_eq!(ilike_exact("spring_sale"), "ilike.%22spring%5C%5C_sale%22");
        assert_eq!(ilike_exact("50%off"), "ilike.%2250%5C%5C%25off%22");
        assert_eq!(ilike_exact("a\"b,c"), "ilike.%22a%5C%22b%2Cc%22");
    }

    #[test]
    fn test_same_code_ignores_case_only() {
        assert!(same_code("Summer Sale", "summer sale"));
        assert!(!same_code("SummerXSale", "summer*sale"));
        assert!(!same_code("SAVE10", "ſave10"));
    }

    #[test]
    fn test_table_url() {
        let endpoint = Endpoint {
            base_url: "https://db.example.com".to_string(),
            api_key: "key".to_string(),
        };
        assert_eq!(
            endpoint.table_url(LINKS_TABLE, ""),
            "https://db.example.com/rest/v1/referral_links"
        );
        assert_eq!(
            endpoint.table_url(CLICKS_TABLE, "id=eq.3"),
            "https://db.example.com/rest/v1/referral_clicks?id=eq.3"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let store = RestStore::new("https://db.example.com/", "key", 5);
        assert_eq!(store.endpoint.base_url, "https://db.example.com");
        assert_eq!(store.backend_name(), "rest");
    }
}
