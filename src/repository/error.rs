// ==========================================
// 制造运营平台 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据访问错误 =====
    #[error("数据源不可用: {0}")]
    Unavailable(String),

    #[error("数据锁获取失败: {0}")]
    LockError(String),

    #[error("历史数据查询失败: {0}")]
    QueryFailed(String),

    // ===== 查询参数错误 =====
    #[error("无效的查询窗口: from={from} > to={to}")]
    InvalidWindow { from: String, to: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
