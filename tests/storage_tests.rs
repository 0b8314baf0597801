//! Storage tests
//!
//! SeaORM backend against a temporary SQLite database.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use tempfile::TempDir;

use aurora::config::{StoreBackend, StoreConfig};
use aurora::errors::AuroraError;
use aurora::storage::backend::{SeaOrmStorage, connect_sqlite, run_migrations};
use aurora::storage::{NewReferralClick, ReferralStore, StorageFactory};
use migration::entities::referral_link;

async fn sqlite_store() -> (SeaOrmStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url)
        .await
        .expect("Failed to connect to SQLite");
    run_migrations(&db).await.expect("Failed to run migrations");

    (SeaOrmStorage::from_connection(db, "sqlite"), temp_dir)
}

fn click(referral_id: i64, code: &str) -> NewReferralClick {
    NewReferralClick {
        referral_id,
        code: code.to_string(),
        ip: "198.51.100.4".to_string(),
        user_agent: "curl/8.5".to_string(),
    }
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn test_find_active_is_case_insensitive() {
    let (store, _dir) = sqlite_store().await;
    let link = store.create_link("Spring24", true).await.unwrap();

    for input in ["Spring24", "spring24", "SPRING24"] {
        let found = store.find_active(input).await.unwrap().expect(input);
        assert_eq!(found.id, link.id);
        assert_eq!(found.code, "Spring24");
    }
}

#[tokio::test]
async fn test_find_active_is_exact_match() {
    let (store, _dir) = sqlite_store().await;
    store.create_link("SAVE10", true).await.unwrap();
    store.create_link("A_B", true).await.unwrap();

    assert!(store.find_active("SAVE").await.unwrap().is_none());
    assert!(store.find_active("SAVE100").await.unwrap().is_none());
    assert!(store.find_active("%").await.unwrap().is_none());
    assert!(store.find_active("A%").await.unwrap().is_none());
    assert!(store.find_active("AXB").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_active_folds_both_sides_alike() {
    let (store, _dir) = sqlite_store().await;
    store.create_link("SAVE10", true).await.unwrap();

    // 查询值与列值用同一个 UPPER 折叠，非 ASCII 的相似字符不命中
    assert!(store.find_active("ſave10").await.unwrap().is_none());
    assert!(store.find_active("save10").await.unwrap().is_some());
}

#[tokio::test]
async fn test_find_active_skips_inactive() {
    let (store, _dir) = sqlite_store().await;
    let link = store.create_link("Paused", false).await.unwrap();
    assert!(store.find_active("paused").await.unwrap().is_none());

    store.set_active(link.id, true).await.unwrap();
    assert!(store.find_active("paused").await.unwrap().is_some());
}

#[tokio::test]
async fn test_find_active_prefers_lowest_id() {
    let (store, _dir) = sqlite_store().await;

    // 绕过管理接口的重复检查，直接写入两个大小写不同的推荐码
    for code in ["abc", "ABC"] {
        referral_link::ActiveModel {
            code: Set(code.to_string()),
            active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(store.get_db())
        .await
        .expect("insert referral link");
    }

    let found = store.find_active("AbC").await.unwrap().unwrap();
    assert_eq!(found.code, "abc");
}

// =============================================================================
// Links
// =============================================================================

#[tokio::test]
async fn test_create_link_rejects_duplicates_and_bad_codes() {
    let (store, _dir) = sqlite_store().await;
    store.create_link("SAVE10", true).await.unwrap();

    assert!(matches!(
        store.create_link("save10", true).await,
        Err(AuroraError::Conflict(_))
    ));
    assert!(matches!(
        store.create_link("  ", true).await,
        Err(AuroraError::Validation(_))
    ));
    assert!(matches!(
        store.create_link("50%off", true).await,
        Err(AuroraError::Validation(_))
    ));
    assert!(matches!(
        store.create_link(&"X".repeat(65), true).await,
        Err(AuroraError::Validation(_))
    ));

    assert_eq!(store.list_links().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_yield_one_link() {
    let (store, _dir) = sqlite_store().await;

    let attempts = (0..6).map(|_| store.create_link("RACE", true));
    let results = futures_util::future::join_all(attempts).await;

    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AuroraError::Conflict(_)))
    );
    assert_eq!(store.list_links().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_set_active_and_delete_missing_link() {
    let (store, _dir) = sqlite_store().await;

    assert!(matches!(
        store.set_active(42, false).await,
        Err(AuroraError::NotFound(_))
    ));
    assert!(matches!(
        store.delete_link(42).await,
        Err(AuroraError::NotFound(_))
    ));
}

// =============================================================================
// Clicks
// =============================================================================

#[tokio::test]
async fn test_record_and_list_clicks() {
    let (store, _dir) = sqlite_store().await;
    let link = store.create_link("SAVE10", true).await.unwrap();

    for _ in 0..5 {
        store.record_click(click(link.id, "SAVE10")).await.unwrap();
    }

    let clicks = store.list_clicks(link.id, 100).await.unwrap();
    assert_eq!(clicks.len(), 5);
    assert!(clicks.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(clicks[0].ip, "198.51.100.4");
    assert_eq!(clicks[0].user_agent, "curl/8.5");

    assert_eq!(store.list_clicks(link.id, 2).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_record_click_for_missing_link_fails() {
    let (store, _dir) = sqlite_store().await;
    let result = store.record_click(click(999, "GHOST")).await;
    assert!(matches!(result, Err(AuroraError::DatabaseOperation(_))));
}

#[tokio::test]
async fn test_delete_click() {
    let (store, _dir) = sqlite_store().await;
    let link = store.create_link("SAVE10", true).await.unwrap();
    store.record_click(click(link.id, "SAVE10")).await.unwrap();

    let clicks = store.list_clicks(link.id, 100).await.unwrap();
    store.delete_click(clicks[0].id).await.unwrap();
    assert!(store.list_clicks(link.id, 100).await.unwrap().is_empty());

    assert!(matches!(
        store.delete_click(clicks[0].id).await,
        Err(AuroraError::NotFound(_))
    ));
}

// =============================================================================
// Factory
// =============================================================================

#[tokio::test]
async fn test_factory_creates_migrated_sqlite_store() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig {
        backend: StoreBackend::Database,
        database_url: format!(
            "sqlite://{}?mode=rwc",
            temp_dir.path().join("factory.db").display()
        ),
        ..StoreConfig::default()
    };

    let store = StorageFactory::create(&config).await.unwrap();
    assert_eq!(store.backend_name(), "sqlite");
    store.health_check().await.unwrap();
    assert!(store.list_links().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_factory_requires_rest_settings() {
    let config = StoreConfig {
        backend: StoreBackend::Rest,
        rest_url: None,
        ..StoreConfig::default()
    };
    assert!(matches!(
        StorageFactory::create(&config).await,
        Err(AuroraError::Config(_))
    ));
}
