//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DbErr, EntityTrait, IntoActiveModel, SqlErr};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::model_to_link;
use crate::errors::{AuroraError, Result};
use crate::storage::{NewReferralClick, ReferralLink, normalize_new_code};

use migration::entities::{referral_click, referral_link};

/// 并发创建时前置检查可能都通过，由唯一索引兜底，同样报告为冲突
fn link_insert_error(code: &str, err: DbErr) -> AuroraError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AuroraError::conflict(format!("Referral code already exists: {}", code))
        }
        _ => AuroraError::database_operation(format!(
            "Failed to create referral link '{}': {}",
            code, err
        )),
    }
}

impl SeaOrmStorage {
    /// 单条插入，不重试
    pub async fn insert_click(&self, click: NewReferralClick) -> Result<()> {
        let model = referral_click::ActiveModel {
            referral_id: Set(click.referral_id),
            code: Set(click.code),
            ip: Set(click.ip),
            user_agent: Set(click.user_agent),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        referral_click::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| {
                AuroraError::database_operation(format!("Failed to insert referral click: {}", e))
            })?;

        Ok(())
    }

    pub async fn insert_link(&self, code: &str, active: bool) -> Result<ReferralLink> {
        let code = normalize_new_code(code)?;

        // 唯一约束按原样比较，这里补上大小写不敏感的检查
        if let Some(existing) = self.find_link_by_code(&code).await? {
            return Err(AuroraError::conflict(format!(
                "Referral code already exists: {}",
                existing.code
            )));
        }

        let model = referral_link::ActiveModel {
            code: Set(code.clone()),
            active: Set(active),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| link_insert_error(&code, e))?;

        info!("Referral link created: {} (active={})", model.code, model.active);
        Ok(model_to_link(model))
    }

    pub async fn update_active(&self, id: i64, active: bool) -> Result<ReferralLink> {
        let Some(model) = referral_link::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(AuroraError::not_found(format!(
                "Referral link not found: {}",
                id
            )));
        };

        let mut active_model = model.into_active_model();
        active_model.active = Set(active);
        let updated = active_model.update(&self.db).await?;

        info!("Referral link {} set active={}", updated.code, updated.active);
        Ok(model_to_link(updated))
    }

    pub async fn remove_link(&self, id: i64) -> Result<()> {
        let result = referral_link::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                AuroraError::database_operation(format!("Failed to delete referral link: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(AuroraError::not_found(format!(
                "Referral link not found: {}",
                id
            )));
        }

        info!("Referral link deleted: {}", id);
        Ok(())
    }

    pub async fn remove_click(&self, id: i64) -> Result<()> {
        let result = referral_click::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AuroraError::not_found(format!(
                "Referral click not found: {}",
                id
            )));
        }

        info!("Referral click deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::{connect_sqlite, run_migrations};

    fn new_link(code: &str) -> referral_link::ActiveModel {
        referral_link::ActiveModel {
            code: Set(code.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_conflict() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("unique.db").display());
        let db = connect_sqlite(&url).await.unwrap();
        run_migrations(&db).await.unwrap();

        new_link("SAVE10").insert(&db).await.unwrap();
        let err = new_link("SAVE10").insert(&db).await.unwrap_err();

        assert!(matches!(
            link_insert_error("SAVE10", err),
            AuroraError::Conflict(_)
        ));
    }

    #[test]
    fn test_other_insert_errors_stay_database_errors() {
        let err = DbErr::Custom("disk I/O error".to_string());
        assert!(matches!(
            link_insert_error("SAVE10", err),
            AuroraError::DatabaseOperation(_)
        ));
    }
}
