use serde::{Deserialize, Serialize};

use crate::errors::{AuroraError, Result};

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQL 数据库（SQLite / MySQL / PostgreSQL），通过 SeaORM 访问
    #[default]
    Database,
    /// 托管的 PostgREST 兼容 REST 接口
    Rest,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database => write!(f, "database"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

/// REST 访问所用的 key 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyKind {
    ServiceRole,
    Anon,
}

/// 应用配置（从 TOML + 环境变量加载，启动时校验）
///
/// - server: 监听地址、端口、worker 数量
/// - store: 存储后端与凭据
/// - referral: 推荐链接路由、落地页、cookie
/// - admin: 管理 API
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub referral: ReferralConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置并校验
    ///
    /// 优先级：ENV > 配置文件 > 默认值
    /// ENV 前缀：AURORA，分隔符：__
    /// 示例：AURORA__SERVER__PORT=9999
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("AURORA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 启动前校验，配置不可用时直接失败
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AuroraError::config("server.port must be non-zero"));
        }

        match self.store.backend {
            StoreBackend::Database => {
                if self.store.database_url.trim().is_empty() {
                    return Err(AuroraError::config(
                        "store.database_url is required for the database backend",
                    ));
                }
            }
            StoreBackend::Rest => {
                let url = self.store.rest_url.as_deref().unwrap_or("").trim();
                if url.is_empty() {
                    return Err(AuroraError::config(
                        "store.rest_url is required for the rest backend",
                    ));
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(AuroraError::config(format!(
                        "store.rest_url must start with http:// or https://, got '{}'",
                        url
                    )));
                }
                if self.store.api_key().is_none() {
                    return Err(AuroraError::config(
                        "store.service_role_key or store.anon_key is required for the rest backend",
                    ));
                }
            }
        }

        for (name, value) in [
            ("referral.route_prefix", &self.referral.route_prefix),
            ("referral.landing_path", &self.referral.landing_path),
            ("admin.route_prefix", &self.admin.route_prefix),
        ] {
            if !value.starts_with('/') {
                return Err(AuroraError::config(format!(
                    "{} must start with '/', got '{}'",
                    name, value
                )));
            }
        }

        if self.referral.cookie_name.trim().is_empty() {
            return Err(AuroraError::config("referral.cookie_name must not be empty"));
        }
        if self.referral.cookie_max_age_secs <= 0 {
            return Err(AuroraError::config(
                "referral.cookie_max_age_secs must be positive",
            ));
        }

        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AuroraError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default)]
    pub rest_url: Option<String>,
    #[serde(default)]
    pub service_role_key: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// REST 访问 key：优先 service role key，否则退回 anon key
    pub fn api_key(&self) -> Option<(&str, ApiKeyKind)> {
        let non_empty: fn(&Option<String>) -> Option<&str> = |key| {
            key.as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
        };

        non_empty(&self.service_role_key)
            .map(|k| (k, ApiKeyKind::ServiceRole))
            .or_else(|| non_empty(&self.anon_key).map(|k| (k, ApiKeyKind::Anon)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralConfig {
    #[serde(default = "default_referral_prefix")]
    pub route_prefix: String,
    #[serde(default = "default_landing_path")]
    pub landing_path: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_cookie_max_age")]
    pub cookie_max_age_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_prefix")]
    pub route_prefix: String,
    /// 为空时禁用管理 API
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default)]
    pub enable_rotation: bool,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(32)
}

fn default_database_url() -> String {
    "sqlite://aurora.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_store_timeout() -> u64 {
    10
}

fn default_referral_prefix() -> String {
    "/Aurora".to_string()
}

fn default_landing_path() -> String {
    "/book-slot".to_string()
}

fn default_cookie_name() -> String {
    "ref".to_string()
}

// 30 天
fn default_cookie_max_age() -> i64 {
    30 * 24 * 60 * 60
}

fn default_admin_prefix() -> String {
    "/api/admin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    7
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            rest_url: None,
            service_role_key: None,
            anon_key: None,
            timeout_secs: default_store_timeout(),
        }
    }
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_referral_prefix(),
            landing_path: default_landing_path(),
            cookie_name: default_cookie_name(),
            cookie_max_age_secs: default_cookie_max_age(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_admin_prefix(),
            token: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Rest;
        config.store.rest_url = Some("https://db.example.com".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.referral.route_prefix, "/Aurora");
        assert_eq!(config.referral.landing_path, "/book-slot");
        assert_eq!(config.referral.cookie_name, "ref");
        assert_eq!(config.referral.cookie_max_age_secs, 2_592_000);
        assert_eq!(config.store.backend, StoreBackend::Database);
        assert!(config.admin.token.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rest_backend_requires_key() {
        let config = rest_config();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AuroraError::Config(_)));
    }

    #[test]
    fn test_rest_backend_requires_url() {
        let mut config = rest_config();
        config.store.rest_url = None;
        config.store.anon_key = Some("anon".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_service_role_key_preferred() {
        let mut config = rest_config();
        config.store.service_role_key = Some("service".to_string());
        config.store.anon_key = Some("anon".to_string());
        assert_eq!(
            config.store.api_key(),
            Some(("service", ApiKeyKind::ServiceRole))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_anon_key_fallback() {
        let mut config = rest_config();
        config.store.service_role_key = Some("   ".to_string());
        config.store.anon_key = Some("anon".to_string());
        assert_eq!(config.store.api_key(), Some(("anon", ApiKeyKind::Anon)));
    }

    #[test]
    fn test_prefix_must_start_with_slash() {
        let mut config = AppConfig::default();
        config.referral.landing_path = "book-slot".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cookie_max_age_must_be_positive() {
        for max_age in [0, -1] {
            let mut config = AppConfig::default();
            config.referral.cookie_max_age_secs = max_age;
            assert!(matches!(config.validate(), Err(AuroraError::Config(_))));
        }
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = AppConfig::generate_sample_config();
        let parsed: AppConfig = toml::from_str(&sample).expect("sample config parses");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.referral.landing_path, "/book-slot");
    }
}
