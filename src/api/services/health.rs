use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{error, info, trace};

use crate::storage::ReferralStore;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub timestamp: String,
    pub uptime: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub response_time_ms: u32,
}

/// Health Service
///
/// 直接探测存储，不经过业务层。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        store: web::Data<Arc<dyn ReferralStore>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let error = match tokio::time::timeout(Duration::from_secs(5), store.health_check()).await
        {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                Some(e.to_string())
            }
            Err(_) => {
                error!("Storage health check timeout");
                Some("timeout".to_string())
            }
        };

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u32;
        let is_healthy = error.is_none();

        let body = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            backend: store.backend_name().to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            error,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        info!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            body.status
        );

        let status = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        HttpResponse::build(status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(body)
    }

    // 存活检查，只返回 200
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("OK")
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
