// ==========================================
// 制造运营平台 - KPI 计算结果对象
// ==========================================
// 职责: 推断结果、效率/性能、质量良率、在制品老化结果
// 说明: 结果均为瞬态对象,由调用方决定是否持久化
// ==========================================

use crate::domain::hold::AgingThresholds;
use crate::domain::types::{InferenceSource, QualityGrade, TargetSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 推断结果
// ==========================================

/// 周期时间推断结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// 推断值 (小时/件)
    pub value: Decimal,
    /// 置信度 [0, 1]
    pub confidence: f64,
    pub source: InferenceSource,
    pub is_estimated: bool,
    /// 参与计算的有效样本数 (常量层级为 0)
    pub data_points: usize,
}

impl InferenceResult {
    /// 按命中层级构造,置信度与估算标记由层级决定
    pub fn from_level(source: InferenceSource, value: Decimal, data_points: usize) -> Self {
        Self {
            value,
            confidence: source.base_confidence(),
            source,
            is_estimated: source.is_estimated(),
            data_points,
        }
    }
}

/// 目标值推断结果 (目标 OEE / PPM / 缺勤率)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInferenceResult {
    pub value: Decimal,
    pub confidence: f64,
    pub source: TargetSource,
    pub is_estimated: bool,
    pub data_points: usize,
}

impl TargetInferenceResult {
    pub fn from_source(source: TargetSource, value: Decimal, data_points: usize) -> Self {
        Self {
            value,
            confidence: source.base_confidence(),
            source,
            is_estimated: source.is_estimated(),
            data_points,
        }
    }
}

/// 低置信度告警 (仅提示,不阻断计算)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowConfidenceWarning {
    pub confidence: f64,
    pub threshold: f64,
    pub source: String,
    pub message: String,
}

impl fmt::Display for LowConfidenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// 推断元数据: 随计算结果一起返回给调用方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceMetadata {
    pub confidence: f64,
    pub source: String,
    pub is_estimated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl InferenceMetadata {
    pub fn new(result: &InferenceResult, warning: Option<&LowConfidenceWarning>) -> Self {
        Self {
            confidence: result.confidence,
            source: result.source.to_string(),
            is_estimated: result.is_estimated,
            warning: warning.map(|w| w.message.clone()),
        }
    }

    pub fn from_target(result: &TargetInferenceResult, warning: Option<&LowConfidenceWarning>) -> Self {
        Self {
            confidence: result.confidence,
            source: result.source.to_string(),
            is_estimated: result.is_estimated,
            warning: warning.map(|w| w.message.clone()),
        }
    }
}

// ==========================================
// 效率 / 性能
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyResult {
    /// 效率 (%),[0, 150],两位小数
    pub percentage: Decimal,
    pub cycle_time_used: Decimal,
    pub is_estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    /// 性能 (%),[0, 150],两位小数
    pub percentage: Decimal,
    pub cycle_time_used: Decimal,
    pub is_estimated: bool,
}

/// 单条生产记录的 KPI 汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryKpis {
    pub entry_id: String,
    pub scheduled_hours: Decimal,
    pub efficiency: EfficiencyResult,
    pub performance: PerformanceResult,
    pub quality_rate: Decimal,
    pub oee: Decimal,
    pub inference: InferenceResult,
}

// ==========================================
// 质量良率
// ==========================================

/// 单工序良率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageYield {
    pub stage: String,
    pub units_inspected: i64,
    pub units_passed: i64,
    pub units_defective: i64,
    pub fpy_percentage: Decimal,
}

/// RTY 明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtyBreakdown {
    pub rty_percentage: Decimal,
    /// 参与连乘的工序
    pub stages: Vec<StageYield>,
    /// 无检验数据而跳过的工序
    pub skipped_stages: Vec<String>,
}

/// 返工/返修/报废拆分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReworkBreakdown {
    pub units_inspected: i64,
    pub units_passed: i64,
    pub failed_units: i64,
    pub units_reworked: i64,
    pub units_requiring_repair: i64,
    pub units_scrapped: i64,
    pub rework_rate: Decimal,
    pub repair_rate: Decimal,
    pub scrap_rate: Decimal,
    pub recovery_rate: Decimal,
    /// 产出损失 (%) = rework_rate + repair_rate
    pub throughput_loss_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityYieldResult {
    pub ppm: Decimal,
    pub dpmo: Decimal,
    pub sigma_level: Decimal,
    pub fpy_percentage: Decimal,
    pub rty_percentage: Decimal,
    pub scrap_rate: Decimal,
    pub defect_escape_rate: Decimal,
    pub quality_score: Decimal,
    pub grade: QualityGrade,
}

// ==========================================
// 在制品老化
// ==========================================

/// 老化桶
///
/// 区间: [0, aging] / (aging, critical] / (critical, 30] / (30, ∞)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipAgingBucket {
    /// 区间标签 (例如: "0-7", "8-14", "15-30", "30+")
    pub label: String,
    pub min_days: i64,
    /// None 表示无上限
    pub max_days: Option<i64>,
    pub count: i64,
    pub quantity: i64,
}

impl WipAgingBucket {
    pub fn new(label: String, min_days: i64, max_days: Option<i64>) -> Self {
        Self {
            label,
            min_days,
            max_days,
            count: 0,
            quantity: 0,
        }
    }

    /// 创建标准区间的老化桶
    pub fn from_age_range(min_days: i64, max_days: Option<i64>) -> Self {
        let label = match max_days {
            Some(max) => format!("{}-{}", min_days, max),
            None => format!("{}+", min_days),
        };

        Self::new(label, min_days, max_days)
    }

    pub fn add_hold(&mut self, quantity: i64) {
        self.count += 1;
        self.quantity += quantity.max(0);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl fmt::Display for WipAgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (count: {}, quantity: {})", self.label, self.count, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipAgingResult {
    pub thresholds: AgingThresholds,
    pub buckets: Vec<WipAgingBucket>,
    pub total_active_holds: i64,
    pub average_aging_days: Decimal,
    /// 超过老化阈值的活动保留数
    pub flagged_aging_count: i64,
    /// 超过严重阈值的活动保留数
    pub flagged_critical_count: i64,
}

impl WipAgingResult {
    pub fn bucket(&self, label: &str) -> Option<&WipAgingBucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    /// 各桶计数之和 (恒等于活动保留数)
    pub fn bucketed_count(&self) -> i64 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// 保留解决率统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldResolutionSummary {
    pub total_resumed: i64,
    pub resolved_within_threshold: i64,
    /// 解决率 (%),[0, 100]
    pub resolution_rate: Decimal,
}
