//! Health endpoint tests

use std::sync::Arc;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use aurora::api::{AppState, configure};
use aurora::config::AppConfig;
use aurora::errors::{AuroraError, Result};
use aurora::storage::backend::{SeaOrmStorage, connect_sqlite, run_migrations};
use aurora::storage::{NewReferralClick, ReferralClick, ReferralLink, ReferralStore};

macro_rules! health_app {
    ($store:expr) => {{
        let store: Arc<dyn ReferralStore> = $store;
        let state = AppState::new(store, &AppConfig::default());
        test::init_service(App::new().configure(|cfg| configure(cfg, &state))).await
    }};
}

/// 永远不可用的存储
struct DownStore;

#[async_trait]
impl ReferralStore for DownStore {
    async fn find_active(&self, _code: &str) -> Result<Option<ReferralLink>> {
        Err(AuroraError::database_connection("down"))
    }

    async fn record_click(&self, _click: NewReferralClick) -> Result<()> {
        Err(AuroraError::database_connection("down"))
    }

    async fn list_links(&self) -> Result<Vec<ReferralLink>> {
        Err(AuroraError::database_connection("down"))
    }

    async fn create_link(&self, _code: &str, _active: bool) -> Result<ReferralLink> {
        Err(AuroraError::database_connection("down"))
    }

    async fn set_active(&self, _id: i64, _active: bool) -> Result<ReferralLink> {
        Err(AuroraError::database_connection("down"))
    }

    async fn delete_link(&self, _id: i64) -> Result<()> {
        Err(AuroraError::database_connection("down"))
    }

    async fn list_clicks(&self, _referral_id: i64, _limit: u64) -> Result<Vec<ReferralClick>> {
        Err(AuroraError::database_connection("down"))
    }

    async fn delete_click(&self, _id: i64) -> Result<()> {
        Err(AuroraError::database_connection("down"))
    }

    async fn health_check(&self) -> Result<()> {
        Err(AuroraError::database_connection("connection refused"))
    }

    fn backend_name(&self) -> &str {
        "down"
    }
}

#[actix_rt::test]
async fn test_health_reports_healthy_storage() {
    let temp_dir = TempDir::new().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("health.db").display()
    );
    let db = connect_sqlite(&db_url).await.unwrap();
    run_migrations(&db).await.unwrap();
    let app = health_app!(Arc::new(SeaOrmStorage::from_connection(db, "sqlite")));

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "sqlite");
    assert!(body.get("error").is_none());
}

#[actix_rt::test]
async fn test_health_reports_unavailable_storage() {
    let app = health_app!(Arc::new(DownStore));

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["backend"], "down");
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[actix_rt::test]
async fn test_liveness_ignores_storage() {
    let app = health_app!(Arc::new(DownStore));

    let req = TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(body, "OK");
}
