// ==========================================
// 制造运营平台 - 领域类型定义
// ==========================================
// 职责: KPI 推断来源、保留状态、质量等级等枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与持久层一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 周期时间推断来源 (Inference Source)
// ==========================================
// 顺序即优先级: 基础置信度严格递减
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InferenceSource {
    ClientStyleStandard,  // 客户/款式标准
    ShiftLineHistory,     // 同班次/产线历史均值
    IndustryDefault,      // 行业默认值
    #[serde(rename = "HISTORICAL_30_DAY")]
    Historical30Day,      // 近30天产品历史均值
    GlobalProductAverage, // 全局产品均值
    SystemFallback,       // 系统兜底常量
}

impl InferenceSource {
    /// 按优先级排列的全部来源
    pub const ORDERED: [InferenceSource; 6] = [
        InferenceSource::ClientStyleStandard,
        InferenceSource::ShiftLineHistory,
        InferenceSource::IndustryDefault,
        InferenceSource::Historical30Day,
        InferenceSource::GlobalProductAverage,
        InferenceSource::SystemFallback,
    ];

    /// 该层级的基础置信度
    pub fn base_confidence(&self) -> f64 {
        match self {
            InferenceSource::ClientStyleStandard => 1.0,
            InferenceSource::ShiftLineHistory => 0.9,
            InferenceSource::IndustryDefault => 0.7,
            InferenceSource::Historical30Day => 0.6,
            InferenceSource::GlobalProductAverage => 0.5,
            InferenceSource::SystemFallback => 0.3,
        }
    }

    /// 只有客户标准是实测值,其余层级均为估算
    pub fn is_estimated(&self) -> bool {
        !matches!(self, InferenceSource::ClientStyleStandard)
    }
}

impl fmt::Display for InferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceSource::ClientStyleStandard => write!(f, "CLIENT_STYLE_STANDARD"),
            InferenceSource::ShiftLineHistory => write!(f, "SHIFT_LINE_HISTORY"),
            InferenceSource::IndustryDefault => write!(f, "INDUSTRY_DEFAULT"),
            InferenceSource::Historical30Day => write!(f, "HISTORICAL_30_DAY"),
            InferenceSource::GlobalProductAverage => write!(f, "GLOBAL_PRODUCT_AVERAGE"),
            InferenceSource::SystemFallback => write!(f, "SYSTEM_FALLBACK"),
        }
    }
}

// ==========================================
// 目标值推断来源 (Target Source)
// ==========================================
// 用于目标 OEE / 目标 PPM / 目标缺勤率
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSource {
    ClientStandard,    // 客户/产品标准
    HistoricalAverage, // 历史均值
    IndustryDefault,   // 行业常量
}

impl TargetSource {
    pub fn base_confidence(&self) -> f64 {
        match self {
            TargetSource::ClientStandard => 1.0,
            TargetSource::HistoricalAverage => 0.8,
            TargetSource::IndustryDefault => 0.6,
        }
    }

    pub fn is_estimated(&self) -> bool {
        !matches!(self, TargetSource::ClientStandard)
    }
}

impl fmt::Display for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSource::ClientStandard => write!(f, "CLIENT_STANDARD"),
            TargetSource::HistoricalAverage => write!(f, "HISTORICAL_AVERAGE"),
            TargetSource::IndustryDefault => write!(f, "INDUSTRY_DEFAULT"),
        }
    }
}

// ==========================================
// 保留状态 (Hold Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldStatus {
    OnHold,    // 保留中
    Resumed,   // 已恢复
    Released,  // 已释放
    Cancelled, // 已取消
}

impl HoldStatus {
    /// 是否仍处于活动保留状态
    pub fn is_active(&self) -> bool {
        matches!(self, HoldStatus::OnHold)
    }
}

impl fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldStatus::OnHold => write!(f, "ON_HOLD"),
            HoldStatus::Resumed => write!(f, "RESUMED"),
            HoldStatus::Released => write!(f, "RELEASED"),
            HoldStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ==========================================
// 质量等级 (Quality Grade)
// ==========================================
// 顺序: D < C < C+ < B < B+ < A < A+
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityGrade {
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityGrade::APlus => write!(f, "A+"),
            QualityGrade::A => write!(f, "A"),
            QualityGrade::BPlus => write!(f, "B+"),
            QualityGrade::B => write!(f, "B"),
            QualityGrade::CPlus => write!(f, "C+"),
            QualityGrade::C => write!(f, "C"),
            QualityGrade::D => write!(f, "D"),
        }
    }
}
