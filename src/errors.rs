use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, Clone)]
pub enum AuroraError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    RemoteStore(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Serialization(String),
}

impl AuroraError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AuroraError::Config(_) => "E001",
            AuroraError::DatabaseConfig(_) => "E002",
            AuroraError::DatabaseConnection(_) => "E003",
            AuroraError::DatabaseOperation(_) => "E004",
            AuroraError::RemoteStore(_) => "E005",
            AuroraError::FileOperation(_) => "E006",
            AuroraError::Validation(_) => "E007",
            AuroraError::NotFound(_) => "E008",
            AuroraError::Conflict(_) => "E009",
            AuroraError::Serialization(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AuroraError::Config(_) => "Configuration Error",
            AuroraError::DatabaseConfig(_) => "Database Configuration Error",
            AuroraError::DatabaseConnection(_) => "Database Connection Error",
            AuroraError::DatabaseOperation(_) => "Database Operation Error",
            AuroraError::RemoteStore(_) => "Remote Store Error",
            AuroraError::FileOperation(_) => "File Operation Error",
            AuroraError::Validation(_) => "Validation Error",
            AuroraError::NotFound(_) => "Resource Not Found",
            AuroraError::Conflict(_) => "Resource Conflict",
            AuroraError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AuroraError::Config(msg)
            | AuroraError::DatabaseConfig(msg)
            | AuroraError::DatabaseConnection(msg)
            | AuroraError::DatabaseOperation(msg)
            | AuroraError::RemoteStore(msg)
            | AuroraError::FileOperation(msg)
            | AuroraError::Validation(msg)
            | AuroraError::NotFound(msg)
            | AuroraError::Conflict(msg)
            | AuroraError::Serialization(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            AuroraError::Validation(_) => StatusCode::BAD_REQUEST,
            AuroraError::NotFound(_) => StatusCode::NOT_FOUND,
            AuroraError::Conflict(_) => StatusCode::CONFLICT,
            AuroraError::DatabaseConnection(_) | AuroraError::RemoteStore(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时打印到终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AuroraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AuroraError {}

/// 查询失败直接让请求失败（500/503），不向客户端暴露细节
impl ResponseError for AuroraError {
    fn status_code(&self) -> StatusCode {
        // 客户端只看到 5xx，不区分连接失败和查询失败
        match self.http_status() {
            StatusCode::SERVICE_UNAVAILABLE => StatusCode::INTERNAL_SERVER_ERROR,
            status => status,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body(self.status_code().canonical_reason().unwrap_or("Error"))
    }
}

// 便捷的构造函数
impl AuroraError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        AuroraError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AuroraError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AuroraError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AuroraError::DatabaseOperation(msg.into())
    }

    pub fn remote_store<T: Into<String>>(msg: T) -> Self {
        AuroraError::RemoteStore(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AuroraError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AuroraError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AuroraError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AuroraError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AuroraError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AuroraError {
    fn from(err: sea_orm::DbErr) -> Self {
        AuroraError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AuroraError {
    fn from(err: std::io::Error) -> Self {
        AuroraError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AuroraError {
    fn from(err: serde_json::Error) -> Self {
        AuroraError::Serialization(err.to_string())
    }
}

impl From<ureq::Error> for AuroraError {
    fn from(err: ureq::Error) -> Self {
        AuroraError::RemoteStore(err.to_string())
    }
}

impl From<config::ConfigError> for AuroraError {
    fn from(err: config::ConfigError) -> Self {
        AuroraError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AuroraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            AuroraError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuroraError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuroraError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuroraError::remote_store("x").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_response_error_hides_unavailable() {
        let err = AuroraError::database_connection("pool closed");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_format_simple() {
        let err = AuroraError::config("missing url");
        assert_eq!(err.format_simple(), "Configuration Error: missing url");
        assert_eq!(err.to_string(), err.format_simple());
    }
}
