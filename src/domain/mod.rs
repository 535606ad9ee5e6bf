// ==========================================
// 制造运营平台 - 领域层
// ==========================================
// 职责: 实体与类型定义,不包含计算规则
// ==========================================

pub mod hold;
pub mod kpi;
pub mod production;
pub mod quality;
pub mod types;

// 重导出核心实体
pub use hold::{AgingThresholds, ClientKpiConfig, HoldRecord};
pub use kpi::{
    EfficiencyResult, EntryKpis, HoldResolutionSummary, InferenceMetadata, InferenceResult,
    LowConfidenceWarning, PerformanceResult, QualityYieldResult, ReworkBreakdown, RtyBreakdown,
    StageYield, TargetInferenceResult, WipAgingBucket, WipAgingResult,
};
pub use production::{AttendanceRecord, ProductStandard, ProductionRecord, ShiftDefinition};
pub use quality::{QualityInspectionRecord, DEFAULT_INSPECTION_STAGES};
pub use types::{HoldStatus, InferenceSource, QualityGrade, TargetSource};
