// ==========================================
// 制造运营平台 - 效率/性能计算引擎
// ==========================================
// 红线: 效率使用计划工时,与停机无关 (只改 run_time_hours 时效率不变)
// 红线: 性能使用实际运行时间
// 红线: 百分比截断到 [0, 150],两位小数
// ==========================================
// 职责: 效率%、性能%、质量率%、OEE%
// 输入: 生产记录 + 班次定义 + 周期时间推断
// 输出: EfficiencyResult / PerformanceResult / EntryKpis
// ==========================================

use crate::domain::kpi::{EfficiencyResult, EntryKpis, InferenceResult, PerformanceResult};
use crate::domain::production::{ProductStandard, ProductionRecord, ShiftDefinition};
use crate::engine::inference::{CycleTimeContext, InferenceEngine};
use crate::engine::numeric::{clamp_percentage, clamp_rate, count, round2, safe_div};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// 无班次定义时的计划工时
pub const DEFAULT_SCHEDULED_HOURS: Decimal = dec!(8);

/// Phase-1 口径: 可用率视为 100%
pub const ASSUMED_AVAILABILITY: Decimal = dec!(100);

// ==========================================
// EfficiencyPerformanceCalculator - 效率/性能计算引擎
// ==========================================
pub struct EfficiencyPerformanceCalculator {
    inference: Arc<InferenceEngine>,
}

impl EfficiencyPerformanceCalculator {
    pub fn new(inference: Arc<InferenceEngine>) -> Self {
        Self { inference }
    }

    pub fn inference(&self) -> &InferenceEngine {
        &self.inference
    }

    // ==========================================
    // 公式 (纯函数)
    // ==========================================

    /// 计划工时: 班次时长,无班次时为 8 小时
    pub fn scheduled_hours(shift: Option<&ShiftDefinition>) -> Decimal {
        shift
            .map(|s| s.scheduled_hours())
            .unwrap_or(DEFAULT_SCHEDULED_HOURS)
    }

    /// 效率% = units × cycle_time / (employees × scheduled_hours) × 100
    ///
    /// employees = 0 或 scheduled_hours = 0 时返回 0
    pub fn calculate_efficiency(
        units_produced: i64,
        cycle_time: Decimal,
        employees_assigned: i64,
        scheduled_hours: Decimal,
    ) -> Decimal {
        let capacity_hours = count(employees_assigned) * scheduled_hours;
        let earned_hours = count(units_produced) * cycle_time;

        match safe_div(earned_hours, capacity_hours) {
            Some(ratio) => round2(clamp_percentage(ratio * Decimal::ONE_HUNDRED)),
            None => Decimal::ZERO,
        }
    }

    /// 性能% = cycle_time × units / run_time_hours × 100
    ///
    /// run_time_hours = 0 时返回 0
    pub fn calculate_performance(
        cycle_time: Decimal,
        units_produced: i64,
        run_time_hours: Decimal,
    ) -> Decimal {
        let earned_hours = cycle_time * count(units_produced);

        match safe_div(earned_hours, run_time_hours) {
            Some(ratio) => round2(clamp_percentage(ratio * Decimal::ONE_HUNDRED)),
            None => Decimal::ZERO,
        }
    }

    /// 质量率% = max(0, (units - defects - scrap) / units × 100)
    ///
    /// units = 0 时返回 0;缺陷+报废超过产量时为 0
    pub fn calculate_quality_rate(units_produced: i64, defect_count: i64, scrap_count: i64) -> Decimal {
        let units = count(units_produced);
        let good = units - count(defect_count) - count(scrap_count);

        match safe_div(good, units) {
            Some(ratio) => round2(clamp_rate(ratio * Decimal::ONE_HUNDRED)),
            None => Decimal::ZERO,
        }
    }

    /// OEE% = (A/100) × (P/100) × (Q/100) × 100
    pub fn calculate_oee(availability: Decimal, performance: Decimal, quality: Decimal) -> Decimal {
        let a = clamp_rate(availability) / Decimal::ONE_HUNDRED;
        let p = clamp_percentage(performance) / Decimal::ONE_HUNDRED;
        let q = clamp_rate(quality) / Decimal::ONE_HUNDRED;

        round2(clamp_percentage(a * p * q * Decimal::ONE_HUNDRED))
    }

    // ==========================================
    // 生产记录计算
    // ==========================================

    /// 计算单条记录的效率
    #[instrument(skip_all, fields(entry_id = %record.entry_id))]
    pub fn calculate_entry_efficiency(
        &self,
        record: &ProductionRecord,
        product: &ProductStandard,
        shift: Option<&ShiftDefinition>,
    ) -> EfficiencyResult {
        let inference = self.inference.cycle_time_for_entry(product, record);
        Self::efficiency_from(record, shift, &inference)
    }

    /// 计算单条记录的性能
    #[instrument(skip_all, fields(entry_id = %record.entry_id))]
    pub fn calculate_entry_performance(
        &self,
        record: &ProductionRecord,
        product: &ProductStandard,
    ) -> PerformanceResult {
        let inference = self.inference.cycle_time_for_entry(product, record);
        Self::performance_from(record, &inference)
    }

    /// 计算单条记录的全部 KPI (周期时间只推断一次)
    #[instrument(skip_all, fields(entry_id = %record.entry_id))]
    pub fn calculate_entry_kpis(
        &self,
        record: &ProductionRecord,
        product: &ProductStandard,
        shift: Option<&ShiftDefinition>,
    ) -> EntryKpis {
        let inference = self.inference.resolve_cycle_time(&CycleTimeContext::for_entry(product, record));

        let efficiency = Self::efficiency_from(record, shift, &inference);
        let performance = Self::performance_from(record, &inference);
        let quality_rate =
            Self::calculate_quality_rate(record.units_produced, record.defect_count, record.scrap_count);
        let oee = Self::calculate_oee(ASSUMED_AVAILABILITY, performance.percentage, quality_rate);

        debug!(
            efficiency = %efficiency.percentage,
            performance = %performance.percentage,
            quality_rate = %quality_rate,
            oee = %oee,
            source = %inference.source,
            "生产记录 KPI 计算完成"
        );

        EntryKpis {
            entry_id: record.entry_id.clone(),
            scheduled_hours: Self::scheduled_hours(shift),
            efficiency,
            performance,
            quality_rate,
            oee,
            inference,
        }
    }

    /// 批量重算效率/性能缓存字段
    ///
    /// 返回填充了 efficiency_percentage / performance_percentage 的记录,回写由调用方负责。
    /// 产品标准缺失时以空标准进入推断链。
    #[instrument(skip_all, fields(count = records.len()))]
    pub fn recalculate_batch(
        &self,
        records: Vec<ProductionRecord>,
        products: &HashMap<String, ProductStandard>,
        shifts: &HashMap<String, ShiftDefinition>,
    ) -> Vec<ProductionRecord> {
        records
            .into_iter()
            .map(|mut record| {
                let fallback;
                let product = match products.get(&record.product_id) {
                    Some(p) => p,
                    None => {
                        fallback = ProductStandard::new(&record.product_id, "");
                        &fallback
                    }
                };
                let shift = record.shift_id.as_ref().and_then(|id| shifts.get(id));

                let kpis = self.calculate_entry_kpis(&record, product, shift);

                // 更新缓存字段
                record.efficiency_percentage = Some(kpis.efficiency.percentage);
                record.performance_percentage = Some(kpis.performance.percentage);

                record
            })
            .collect()
    }

    fn efficiency_from(
        record: &ProductionRecord,
        shift: Option<&ShiftDefinition>,
        inference: &InferenceResult,
    ) -> EfficiencyResult {
        EfficiencyResult {
            percentage: Self::calculate_efficiency(
                record.units_produced,
                inference.value,
                record.employees_assigned,
                Self::scheduled_hours(shift),
            ),
            cycle_time_used: inference.value,
            is_estimated: inference.is_estimated,
        }
    }

    fn performance_from(record: &ProductionRecord, inference: &InferenceResult) -> PerformanceResult {
        PerformanceResult {
            percentage: Self::calculate_performance(
                inference.value,
                record.units_produced,
                record.run_time_hours,
            ),
            cycle_time_used: inference.value,
            is_estimated: inference.is_estimated,
        }
    }
}
