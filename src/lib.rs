// ==========================================
// 制造运营平台 - KPI 推断与计算引擎
// ==========================================
// 技术栈: Rust + rust_decimal + tracing
// 系统定位: 指标计算支持 (缺失标准时推断并标注置信度)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 历史数据访问
pub mod repository;

// 引擎层 - 推断与计算规则
pub mod engine;

// 配置层 - KPI 配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 对外接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{HoldStatus, InferenceSource, QualityGrade, TargetSource};

// 领域实体
pub use domain::{
    AgingThresholds, ClientKpiConfig, HoldRecord, InferenceMetadata, InferenceResult,
    ProductStandard, ProductionRecord, QualityInspectionRecord, ShiftDefinition,
};

// 引擎
pub use engine::{
    EfficiencyPerformanceCalculator, InferenceEngine, QualityYieldCalculator, WipAgingCalculator,
};

// 配置
pub use config::{ConfigManager, KpiConfigReader};

// 仓储
pub use repository::{InMemoryProductionHistory, ProductionHistoryRepository};

// API
pub use api::{ApiError, ApiResult, KpiApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "制造运营平台 KPI 引擎";
