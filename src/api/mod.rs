//! HTTP layer: route handlers and middleware

pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::web;

use crate::api::middleware::AdminAuth;
use crate::api::services::{AppStartTime, admin, admin_routes, health_routes, referral_routes};
use crate::config::{AdminConfig, AppConfig, ReferralConfig};
use crate::services::ReferralService;
use crate::storage::ReferralStore;

/// 各 worker 共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReferralStore>,
    pub referral_service: Arc<ReferralService>,
    pub referral: ReferralConfig,
    pub admin: AdminConfig,
    pub start_time: AppStartTime,
}

impl AppState {
    pub fn new(store: Arc<dyn ReferralStore>, config: &AppConfig) -> Self {
        Self {
            referral_service: Arc::new(ReferralService::new(Arc::clone(&store))),
            store,
            referral: config.referral.clone(),
            admin: config.admin.clone(),
            start_time: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
        }
    }
}

/// 注册 app data 与全部路由
///
/// 服务器和集成测试共用同一份路由表。
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(Arc::clone(&state.store)))
        .app_data(web::Data::from(Arc::clone(&state.referral_service)))
        .app_data(web::Data::new(state.referral.clone()))
        .app_data(web::Data::new(state.start_time.clone()))
        .app_data(admin::json_config())
        .service(admin_routes(&state.admin.route_prefix).wrap(AdminAuth::new(&state.admin.token)))
        .service(health_routes())
        .service(referral_routes(&state.referral.route_prefix));
}
