// ==========================================
// 制造运营平台 - KpiApi DTO 定义
// ==========================================
// 职责: 定义 KpiApi 的响应结构
// 说明: 所有推断值都附带 InferenceMetadata
// ==========================================

use crate::domain::kpi::{
    EfficiencyResult, HoldResolutionSummary, InferenceMetadata, PerformanceResult,
    QualityYieldResult, ReworkBreakdown, RtyBreakdown, StageYield, WipAgingResult,
};
use crate::domain::production::ProductionRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// 标准值推断
// ==========================================

/// 周期时间推断响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleTimeResponse {
    pub product_id: String,

    /// 理想周期时间 (小时/件)
    pub cycle_time: Decimal,

    /// 参与计算的样本数 (非历史层级为 0 或 1)
    pub data_points: usize,

    pub metadata: InferenceMetadata,
}

/// 目标值推断响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetResponse {
    /// 指标名 ("TARGET_OEE" | "TARGET_PPM" | "TARGET_ABSENTEEISM")
    pub metric: String,

    pub value: Decimal,

    pub metadata: InferenceMetadata,
}

// ==========================================
// 效率 / 性能
// ==========================================

/// 单条生产记录 KPI 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryKpiResponse {
    pub entry_id: String,
    pub scheduled_hours: Decimal,
    pub efficiency: EfficiencyResult,
    pub performance: PerformanceResult,
    pub quality_rate: Decimal,
    pub oee: Decimal,
    pub metadata: InferenceMetadata,
}

/// 批量重算响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecalcResponse {
    /// 已填充缓存字段的记录 (回写由调用方负责)
    pub records: Vec<ProductionRecord>,

    pub total_count: usize,

    /// 校验剔除的记录数 (仅跳过模式)
    pub skipped_count: usize,
}

// ==========================================
// 质量
// ==========================================

/// 质量报表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReportResponse {
    pub summary: QualityYieldResult,
    pub stage_yields: Vec<StageYield>,
    pub rty: RtyBreakdown,
    pub rework: ReworkBreakdown,
    pub opportunities_per_unit: i64,
}

// ==========================================
// 在制品老化
// ==========================================

/// 在制品老化报表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipAgingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    pub as_of: NaiveDate,

    pub aging: WipAgingResult,

    /// 慢性保留 hold_id 列表 (最旧在前)
    pub chronic_hold_ids: Vec<String>,
}

/// 保留解决率响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldResolutionResponse {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub summary: HoldResolutionSummary,
}
