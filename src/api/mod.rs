// ==========================================
// 制造运营平台 - API 层
// ==========================================
// 职责: 对外提供 KPI 计算接口 (校验 + 配置 + 引擎)
// ==========================================

pub mod dto;
pub mod error;
pub mod kpi_api;
pub mod validator;

// 重导出核心类型
pub use dto::{
    BatchRecalcResponse, CycleTimeResponse, EntryKpiResponse, HoldResolutionResponse,
    QualityReportResponse, TargetResponse, WipAgingResponse,
};
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use kpi_api::KpiApi;
pub use validator::{KpiInputValidator, ValidationMode};
