// ==========================================
// 制造运营平台 - 输入数据校验器
// ==========================================
// 职责: 计算前的记录合法性校验
// 红线: 非法记录不得进入计算 (负数计数、合格数超过检验数等)
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::hold::{AgingThresholds, HoldRecord};
use crate::domain::production::ProductionRecord;
use crate::domain::quality::QualityInspectionRecord;
use rust_decimal::Decimal;

// ==========================================
// ValidationMode - 校验模式
// ==========================================

/// 校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// 严格模式: 任何违规都返回错误
    #[default]
    Strict,
    /// 跳过模式: 剔除违规记录后继续计算
    SkipInvalid,
}

// ==========================================
// KpiInputValidator - 输入数据校验器
// ==========================================

/// 输入数据校验器
///
/// 职责:
/// 1. 生产记录: 计数与工时不得为负
/// 2. 检验记录: 计数不得为负,合格数不得超过检验数
/// 3. 保留记录: 数量不得为负,恢复时间不得早于保留时间
/// 4. 老化阈值: critical >= aging >= 0
#[derive(Debug, Clone, Copy, Default)]
pub struct KpiInputValidator {
    mode: ValidationMode,
}

impl KpiInputValidator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    // ==========================================
    // 单条记录校验
    // ==========================================

    /// 校验生产记录
    pub fn check_production_record(record: &ProductionRecord) -> Vec<ValidationViolation> {
        let id = record.entry_id.as_str();
        let mut violations = Vec::new();

        for (field, value) in [
            ("units_produced", record.units_produced),
            ("employees_assigned", record.employees_assigned),
            ("defect_count", record.defect_count),
            ("scrap_count", record.scrap_count),
        ] {
            if value < 0 {
                violations.push(ValidationViolation::new(id, field, format!("不能为负数: {}", value)));
            }
        }
        if record.run_time_hours < Decimal::ZERO {
            violations.push(ValidationViolation::new(
                id,
                "run_time_hours",
                format!("不能为负数: {}", record.run_time_hours),
            ));
        }

        violations
    }

    /// 校验检验记录
    pub fn check_inspection_record(record: &QualityInspectionRecord) -> Vec<ValidationViolation> {
        let id = record.inspection_id.as_str();
        let mut violations = Vec::new();

        for (field, value) in [
            ("units_inspected", record.units_inspected),
            ("units_passed", record.units_passed),
            ("units_defective", record.units_defective),
            ("units_scrapped", record.units_scrapped),
            ("units_reworked", record.units_reworked),
            ("units_requiring_repair", record.units_requiring_repair),
        ] {
            if value < 0 {
                violations.push(ValidationViolation::new(id, field, format!("不能为负数: {}", value)));
            }
        }
        if record.units_passed > record.units_inspected {
            violations.push(ValidationViolation::new(
                id,
                "units_passed",
                format!(
                    "合格数{}超过检验数{}",
                    record.units_passed, record.units_inspected
                ),
            ));
        }

        violations
    }

    /// 校验保留记录
    pub fn check_hold_record(record: &HoldRecord) -> Vec<ValidationViolation> {
        let id = record.hold_id.as_str();
        let mut violations = Vec::new();

        if record.quantity < 0 {
            violations.push(ValidationViolation::new(
                id,
                "quantity",
                format!("不能为负数: {}", record.quantity),
            ));
        }
        if let Some(resume) = record.resume_timestamp {
            if resume < record.effective_start() {
                violations.push(ValidationViolation::new(
                    id,
                    "resume_timestamp",
                    format!("恢复时间{}早于保留时间{}", resume, record.effective_start()),
                ));
            }
        }
        if let Some(hours) = record.total_hold_duration_hours {
            if hours < Decimal::ZERO {
                violations.push(ValidationViolation::new(
                    id,
                    "total_hold_duration_hours",
                    format!("不能为负数: {}", hours),
                ));
            }
        }

        violations
    }

    /// 校验老化阈值
    pub fn validate_thresholds(thresholds: &AgingThresholds) -> ApiResult<()> {
        if thresholds.aging_threshold_days < 0 {
            return Err(ApiError::InvalidInput(format!(
                "aging_threshold_days不能为负数: {}",
                thresholds.aging_threshold_days
            )));
        }
        if thresholds.critical_threshold_days < thresholds.aging_threshold_days {
            return Err(ApiError::InvalidInput(format!(
                "critical_threshold_days({})不能小于aging_threshold_days({})",
                thresholds.critical_threshold_days, thresholds.aging_threshold_days
            )));
        }
        Ok(())
    }

    // ==========================================
    // 批量校验 (按模式返回错误或剔除)
    // ==========================================

    pub fn validate_production_records(
        &self,
        records: Vec<ProductionRecord>,
    ) -> ApiResult<Vec<ProductionRecord>> {
        self.apply(records, "生产记录", Self::check_production_record)
    }

    pub fn validate_inspection_records(
        &self,
        records: Vec<QualityInspectionRecord>,
    ) -> ApiResult<Vec<QualityInspectionRecord>> {
        self.apply(records, "检验记录", Self::check_inspection_record)
    }

    pub fn validate_hold_records(&self, records: Vec<HoldRecord>) -> ApiResult<Vec<HoldRecord>> {
        self.apply(records, "保留记录", Self::check_hold_record)
    }

    fn apply<T>(
        &self,
        records: Vec<T>,
        kind: &str,
        check: fn(&T) -> Vec<ValidationViolation>,
    ) -> ApiResult<Vec<T>> {
        let mut violations = Vec::new();
        let mut invalid: HashSet<usize> = HashSet::new();

        for (idx, record) in records.iter().enumerate() {
            let found = check(record);
            if !found.is_empty() {
                invalid.insert(idx);
                violations.extend(found);
            }
        }

        if violations.is_empty() {
            return Ok(records);
        }

        match self.mode {
            ValidationMode::Strict => Err(ApiError::ValidationError {
                reason: format!("{}个{}校验失败", invalid.len(), kind),
                violations,
            }),
            ValidationMode::SkipInvalid => {
                tracing::warn!(
                    kind,
                    skipped = invalid.len(),
                    violations = violations.len(),
                    "跳过模式: 剔除违规记录"
                );
                Ok(records
                    .into_iter()
                    .enumerate()
                    .filter(|(idx, _)| !invalid.contains(idx))
                    .map(|(_, record)| record)
                    .collect())
            }
        }
    }
}
