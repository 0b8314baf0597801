//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::{debug, trace};

use super::SeaOrmStorage;
use super::converters::{model_to_click, model_to_link};
use crate::errors::{AuroraError, Result};
use crate::storage::{ReferralClick, ReferralLink};

use migration::entities::{referral_click, referral_link};

/// `UPPER(code) = UPPER(input)`，精确匹配，不做通配
pub(super) fn code_matches(code: &str) -> SimpleExpr {
    use sea_orm::ExprTrait;

    Expr::expr(Func::upper(Expr::col(referral_link::Column::Code)))
        .eq(Func::upper(Expr::val(code)))
}

impl SeaOrmStorage {
    pub async fn find_active_link(&self, code: &str) -> Result<Option<ReferralLink>> {
        let model = referral_link::Entity::find()
            .filter(code_matches(code))
            .filter(referral_link::Column::Active.eq(true))
            .order_by_asc(referral_link::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| {
                AuroraError::database_operation(format!(
                    "Failed to look up referral code '{}': {}",
                    code, e
                ))
            })?;

        trace!("Referral lookup for '{}': found={}", code, model.is_some());
        Ok(model.map(model_to_link))
    }

    /// 不区分 active，用于创建前的重复检查
    pub async fn find_link_by_code(&self, code: &str) -> Result<Option<ReferralLink>> {
        let model = referral_link::Entity::find()
            .filter(code_matches(code))
            .order_by_asc(referral_link::Column::Id)
            .one(&self.db)
            .await?;

        Ok(model.map(model_to_link))
    }

    pub async fn load_all_links(&self) -> Result<Vec<ReferralLink>> {
        let models = referral_link::Entity::find()
            .order_by_asc(referral_link::Column::Id)
            .all(&self.db)
            .await?;

        debug!("Loaded {} referral links", models.len());
        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn load_clicks(&self, referral_id: i64, limit: u64) -> Result<Vec<ReferralClick>> {
        let models = referral_click::Entity::find()
            .filter(referral_click::Column::ReferralId.eq(referral_id))
            .order_by_desc(referral_click::Column::CreatedAt)
            .order_by_desc(referral_click::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_click).collect())
    }
}
