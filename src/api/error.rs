// ==========================================
// 制造运营平台 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换下层错误为用户友好的错误消息
// 红线: 所有错误信息必须包含显式原因 (可解释性)
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 记录校验失败 (带详细原因)
    #[error("数据校验失败: {reason}")]
    ValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 配置 / 数据访问错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("历史数据访问失败: {0}")]
    DataAccessError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unavailable(msg) | RepositoryError::QueryFailed(msg) => {
                ApiError::DataAccessError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DataAccessError(format!("数据锁获取失败: {}", msg))
            }
            RepositoryError::InvalidWindow { from, to } => {
                ApiError::InvalidInput(format!("查询窗口无效: {} > {}", from, to))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ConfigError 转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { key, value, reason } => {
                ApiError::ConfigError(format!("配置项{}={}无效: {}", key, value, reason))
            }
            ConfigError::LockError(msg) => ApiError::InternalError(msg),
            other => ApiError::ConfigError(other.to_string()),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidHoldTransition { hold_id, from, to } => {
                ApiError::InvalidStateTransition {
                    from: format!("{}({})", from, hold_id),
                    to,
                }
            }
            EngineError::ResumeBeforeHold { hold_id } => {
                ApiError::BusinessRuleViolation(format!("保留{}的恢复时间早于保留时间", hold_id))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================

/// 校验违规详情
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationViolation {
    /// 记录标识 (entry_id / inspection_id / hold_id)
    pub record_id: String,
    /// 违规字段
    pub field: String,
    /// 违规原因
    pub reason: String,
}

impl ValidationViolation {
    pub fn new(record_id: &str, field: &str, reason: impl Into<String>) -> Self {
        Self {
            record_id: record_id.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::Unavailable("offline".to_string()).into();
        match api_err {
            ApiError::DataAccessError(msg) => assert_eq!(msg, "offline"),
            _ => panic!("Expected DataAccessError"),
        }

        let api_err: ApiError = RepositoryError::InvalidWindow {
            from: "2026-02-01".to_string(),
            to: "2026-01-01".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let api_err: ApiError = ConfigError::invalid("default_cycle_time", "abc", "不是数字").into();
        match api_err {
            ApiError::ConfigError(msg) => {
                assert!(msg.contains("default_cycle_time"));
                assert!(msg.contains("abc"));
            }
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_engine_error_conversion() {
        let api_err: ApiError = EngineError::InvalidHoldTransition {
            hold_id: "H1".to_string(),
            from: "RESUMED".to_string(),
            to: "RELEASED".to_string(),
        }
        .into();
        match api_err {
            ApiError::InvalidStateTransition { from, to } => {
                assert!(from.contains("H1"));
                assert_eq!(to, "RELEASED");
            }
            _ => panic!("Expected InvalidStateTransition"),
        }
    }
}
