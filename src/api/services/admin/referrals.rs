//! 推荐链接管理接口

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{error, info};

use crate::storage::ReferralStore;

use super::error_code::ErrorCode;
use super::helpers::{error_from_aurora, error_response, link_error_response, success_response};
use super::types::{ClicksQuery, CreateReferralRequest, UpdateReferralRequest};

/// 获取所有推荐链接
pub async fn list_referrals(store: web::Data<Arc<dyn ReferralStore>>) -> impl Responder {
    match store.list_links().await {
        Ok(links) => {
            info!("Admin API: returning {} referral links", links.len());
            success_response(links)
        }
        Err(e) => {
            error!("Admin API: failed to list referral links: {}", e);
            error_from_aurora(&e)
        }
    }
}

/// 创建推荐链接
pub async fn create_referral(
    body: web::Json<CreateReferralRequest>,
    store: web::Data<Arc<dyn ReferralStore>>,
) -> impl Responder {
    let body = body.into_inner();
    info!("Admin API: create referral request - code: {}", body.code);

    if body.code.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::LinkEmptyCode,
            "Referral code must not be empty",
        );
    }

    match store
        .create_link(&body.code, body.active.unwrap_or(true))
        .await
    {
        Ok(link) => success_response(link),
        Err(e) => {
            error!("Admin API: failed to create referral {}: {}", body.code, e);
            link_error_response(&e)
        }
    }
}

/// 启用/停用推荐链接
pub async fn update_referral(
    id: web::Path<i64>,
    body: web::Json<UpdateReferralRequest>,
    store: web::Data<Arc<dyn ReferralStore>>,
) -> impl Responder {
    let id = id.into_inner();
    info!(
        "Admin API: update referral request - id: {}, active: {}",
        id, body.active
    );

    match store.set_active(id, body.active).await {
        Ok(link) => success_response(link),
        Err(e) => link_error_response(&e),
    }
}

/// 删除推荐链接（点击记录级联删除）
pub async fn delete_referral(
    id: web::Path<i64>,
    store: web::Data<Arc<dyn ReferralStore>>,
) -> HttpResponse {
    let id = id.into_inner();
    info!("Admin API: delete referral request - id: {}", id);

    match store.delete_link(id).await {
        Ok(()) => success_response(serde_json::json!({
            "message": "Referral link deleted successfully"
        })),
        Err(e) => {
            error!("Admin API: failed to delete referral {}: {}", id, e);
            link_error_response(&e)
        }
    }
}

/// 获取推荐链接的点击记录（最新在前）
pub async fn list_referral_clicks(
    id: web::Path<i64>,
    query: web::Query<ClicksQuery>,
    store: web::Data<Arc<dyn ReferralStore>>,
) -> impl Responder {
    let id = id.into_inner();
    let limit = query.effective_limit();

    match store.list_clicks(id, limit).await {
        Ok(clicks) => success_response(clicks),
        Err(e) => {
            error!("Admin API: failed to list clicks of referral {}: {}", id, e);
            error_from_aurora(&e)
        }
    }
}

/// 删除单条点击记录
pub async fn delete_click(
    id: web::Path<i64>,
    store: web::Data<Arc<dyn ReferralStore>>,
) -> HttpResponse {
    let id = id.into_inner();
    info!("Admin API: delete click request - id: {}", id);

    match store.delete_click(id).await {
        Ok(()) => success_response(serde_json::json!({
            "message": "Referral click deleted successfully"
        })),
        Err(e) => error_from_aurora(&e),
    }
}
