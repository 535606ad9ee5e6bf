// ==========================================
// 制造运营平台 - 质量检验领域模型
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 默认工序顺序 (RTY 连乘顺序)
pub const DEFAULT_INSPECTION_STAGES: [&str; 3] = ["Incoming", "In-Process", "Final"];

// ==========================================
// QualityInspectionRecord - 质量检验记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityInspectionRecord {
    pub inspection_id: String,
    pub product_id: String,
    pub inspection_date: NaiveDate,
    /// 工序标签 (例如 "Incoming" / "In-Process" / "Final")
    pub inspection_stage: String,
    pub units_inspected: i64,
    pub units_passed: i64,
    pub units_defective: i64,
    pub units_scrapped: i64,
    pub units_reworked: i64,
    pub units_requiring_repair: i64,
}

impl QualityInspectionRecord {
    /// 工序标签匹配 (忽略大小写与首尾空白)
    pub fn is_stage(&self, stage: &str) -> bool {
        self.inspection_stage.trim().eq_ignore_ascii_case(stage.trim())
    }
}
