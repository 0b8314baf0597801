//! Admin API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, error, web};
use serde::Serialize;

use crate::errors::AuroraError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 AuroraError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_aurora(err: &AuroraError) -> HttpResponse {
    error_response(err.http_status(), ErrorCode::from(err), err.message())
}

/// 推荐链接相关接口：NotFound 细化为 LinkNotFound
pub fn link_error_response(err: &AuroraError) -> HttpResponse {
    match err {
        AuroraError::NotFound(msg) => {
            error_response(StatusCode::NOT_FOUND, ErrorCode::LinkNotFound, msg)
        }
        other => error_from_aurora(other),
    }
}

/// JSON 请求体解析失败时也返回统一格式
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let message = format!("Invalid JSON body: {}", err);
            error::InternalError::from_response(
                err,
                error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
            )
            .into()
        })
}
