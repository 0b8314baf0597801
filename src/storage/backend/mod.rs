//! SeaORM storage backend
//!
//! Referral links and click logs in SQLite, MySQL/MariaDB or PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{AuroraError, Result};
use crate::storage::{NewReferralClick, ReferralClick, ReferralLink, ReferralStore};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_click, model_to_link};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(AuroraError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str, pool_size: u32) -> Result<Self> {
        if database_url.is_empty() {
            return Err(AuroraError::database_config("store.database_url is empty"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, pool_size).await?
        };

        let storage = Self::from_connection(db, backend_name);
        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 包装已建立（且已迁移）的连接
    pub fn from_connection(db: DatabaseConnection, backend_name: &str) -> Self {
        Self {
            db,
            backend_name: backend_name.to_string(),
        }
    }

    /// 获取数据库连接（用于关闭连接等场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ReferralStore for SeaOrmStorage {
    async fn find_active(&self, code: &str) -> Result<Option<ReferralLink>> {
        self.find_active_link(code).await
    }

    async fn record_click(&self, click: NewReferralClick) -> Result<()> {
        self.insert_click(click).await
    }

    async fn list_links(&self) -> Result<Vec<ReferralLink>> {
        self.load_all_links().await
    }

    async fn create_link(&self, code: &str, active: bool) -> Result<ReferralLink> {
        self.insert_link(code, active).await
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<ReferralLink> {
        self.update_active(id, active).await
    }

    async fn delete_link(&self, id: i64) -> Result<()> {
        self.remove_link(id).await
    }

    async fn list_clicks(&self, referral_id: i64, limit: u64) -> Result<Vec<ReferralClick>> {
        self.load_clicks(referral_id, limit).await
    }

    async fn delete_click(&self, id: i64) -> Result<()> {
        self.remove_click(id).await
    }

    async fn health_check(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| AuroraError::database_connection(format!("ping failed: {}", e)))
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://aurora.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("data/aurora.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("mariadb://u:p@localhost/aurora").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://u:p@localhost/aurora").unwrap(),
            "postgres"
        );
        assert!(matches!(
            infer_backend_from_url("redis://localhost"),
            Err(AuroraError::DatabaseConfig(_))
        ));
    }
}
