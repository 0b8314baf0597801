//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::AuroraError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 推荐链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 推荐链接错误 3000-3099
    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkEmptyCode = 3006,
}

impl From<&AuroraError> for ErrorCode {
    fn from(err: &AuroraError) -> Self {
        match err {
            AuroraError::Validation(_) => ErrorCode::BadRequest,
            AuroraError::NotFound(_) => ErrorCode::NotFound,
            AuroraError::Conflict(_) => ErrorCode::LinkAlreadyExists,
            AuroraError::DatabaseConnection(_) | AuroraError::RemoteStore(_) => {
                ErrorCode::ServiceUnavailable
            }
            _ => ErrorCode::InternalServerError,
        }
    }
}
