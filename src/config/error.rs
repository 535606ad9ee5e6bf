// ==========================================
// 制造运营平台 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 配置值错误 =====
    #[error("配置值无效: key={key}, value={value}, 原因={reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    // ===== 加载/导出错误 =====
    #[error("配置快照解析失败: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置锁获取失败: {0}")]
    LockError(String),
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
