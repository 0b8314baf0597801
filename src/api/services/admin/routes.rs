//! Admin API 路由配置

use actix_web::web;

use super::referrals::{
    create_referral, delete_click, delete_referral, list_referral_clicks, list_referrals,
    update_referral,
};

/// 推荐链接路由 `/referrals`
///
/// - GET /referrals - 获取所有推荐链接
/// - POST /referrals - 创建推荐链接
/// - PUT /referrals/{id} - 启用/停用
/// - DELETE /referrals/{id} - 删除
/// - GET /referrals/{id}/clicks - 点击记录
pub fn referrals_routes() -> actix_web::Scope {
    web::scope("/referrals")
        .route("", web::get().to(list_referrals))
        .route("", web::post().to(create_referral))
        .route("/{id}/clicks", web::get().to(list_referral_clicks))
        .route("/{id}", web::put().to(update_referral))
        .route("/{id}", web::delete().to(delete_referral))
}

/// 点击记录路由 `/clicks`
pub fn clicks_routes() -> actix_web::Scope {
    web::scope("/clicks").route("/{id}", web::delete().to(delete_click))
}

/// 组装管理 API 路由
pub fn admin_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .service(referrals_routes())
        .service(clicks_routes())
}
