// ==========================================
// 制造运营平台 - 数据仓储层
// ==========================================
// 职责: 定义历史数据访问接口 (宿主持久层实现)
// 红线: 核心引擎只读,不写回
// ==========================================

pub mod error;
pub mod history_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::{
    HistoryQuery, InMemoryProductionHistory, ProductionHistoryRepository, DEFAULT_HISTORY_LIMIT,
};
