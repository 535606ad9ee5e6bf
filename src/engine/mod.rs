// ==========================================
// 制造运营平台 - 引擎层
// ==========================================
// 职责: KPI 推断与计算规则,不直接访问存储
// 红线: 所有推断值必须携带来源与置信度
// 红线: 引擎只读取 as_of 参数,不读取系统时钟
// ==========================================

pub mod efficiency;
pub mod error;
pub mod inference;
pub mod numeric;
pub mod quality_yield;
pub mod sigma_table;
pub mod wip_aging;

// 重导出核心引擎
pub use efficiency::EfficiencyPerformanceCalculator;
pub use error::{EngineError, EngineResult};
pub use inference::{CycleTimeContext, InferenceEngine, InferenceSettings};
pub use quality_yield::QualityYieldCalculator;
pub use sigma_table::{sigma_level, sigma_table};
pub use wip_aging::WipAgingCalculator;
