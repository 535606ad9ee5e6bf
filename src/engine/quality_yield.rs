// ==========================================
// 制造运营平台 - 质量良率计算引擎
// ==========================================
// 职责: PPM、DPMO + Sigma、FPY、RTY、综合质量分
// 红线: RTY <= min(参与工序 FPY);无检验数据的工序不参与连乘
// 红线: 分母为 0 时结果为 0,不报错
// ==========================================

use crate::domain::kpi::{QualityYieldResult, ReworkBreakdown, RtyBreakdown, StageYield};
use crate::domain::quality::{QualityInspectionRecord, DEFAULT_INSPECTION_STAGES};
use crate::domain::types::QualityGrade;
use crate::engine::numeric::{clamp_rate, count, rate_percentage, round2, safe_div};
use crate::engine::sigma_table;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

/// 默认单件缺陷机会数
pub const DEFAULT_OPPORTUNITIES_PER_UNIT: i64 = 10;

const MILLION: Decimal = dec!(1000000);

// 综合质量分权重
const FPY_WEIGHT: Decimal = dec!(0.40);
const RTY_WEIGHT: Decimal = dec!(0.30);
const SCRAP_WEIGHT: Decimal = dec!(0.20);
const ESCAPE_WEIGHT: Decimal = dec!(0.10);

// ==========================================
// QualityYieldCalculator - 质量良率计算引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct QualityYieldCalculator {
    /// RTY 连乘的工序顺序,最后一道视为终检
    stages: Vec<String>,
    opportunities_per_unit: i64,
}

impl Default for QualityYieldCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityYieldCalculator {
    pub fn new() -> Self {
        Self {
            stages: DEFAULT_INSPECTION_STAGES.iter().map(|s| s.to_string()).collect(),
            opportunities_per_unit: DEFAULT_OPPORTUNITIES_PER_UNIT,
        }
    }

    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        if !stages.is_empty() {
            self.stages = stages;
        }
        self
    }

    pub fn with_opportunities_per_unit(mut self, opportunities: i64) -> Self {
        self.opportunities_per_unit = opportunities;
        self
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    pub fn opportunities_per_unit(&self) -> i64 {
        self.opportunities_per_unit
    }

    /// 终检工序 (工序列表最后一道)
    pub fn final_stage(&self) -> &str {
        self.stages.last().map(|s| s.as_str()).unwrap_or("Final")
    }

    // ==========================================
    // 基础指标
    // ==========================================

    /// PPM = defects / units_inspected × 1,000,000
    pub fn calculate_ppm(defects: i64, units_inspected: i64) -> Decimal {
        match safe_div(count(defects), count(units_inspected)) {
            Some(ratio) => round2(ratio * MILLION),
            None => Decimal::ZERO,
        }
    }

    /// DPMO = defects / (units × opportunities_per_unit) × 1,000,000
    pub fn calculate_dpmo(defects: i64, units: i64, opportunities_per_unit: i64) -> Decimal {
        let opportunities = count(units) * count(opportunities_per_unit);
        match safe_div(count(defects), opportunities) {
            Some(ratio) => round2(ratio * MILLION),
            None => Decimal::ZERO,
        }
    }

    /// DPMO -> Sigma 等级
    pub fn sigma_level(dpmo: Decimal) -> Decimal {
        sigma_table::sigma_level(dpmo)
    }

    /// FPY% = units_passed / units_inspected × 100
    pub fn calculate_fpy(units_passed: i64, units_inspected: i64) -> Decimal {
        rate_percentage(units_passed, units_inspected)
    }

    /// 报废率% = units_scrapped / units_inspected × 100
    pub fn calculate_scrap_rate(units_scrapped: i64, units_inspected: i64) -> Decimal {
        rate_percentage(units_scrapped, units_inspected)
    }

    // ==========================================
    // 工序良率 / RTY
    // ==========================================

    /// 按工序汇总检验记录 (工序顺序与配置一致,无数据的工序 units_inspected = 0)
    pub fn aggregate_stage_yields(&self, records: &[QualityInspectionRecord]) -> Vec<StageYield> {
        self.stages
            .iter()
            .map(|stage| {
                let mut inspected = 0i64;
                let mut passed = 0i64;
                let mut defective = 0i64;
                for r in records.iter().filter(|r| r.is_stage(stage)) {
                    inspected += r.units_inspected.max(0);
                    passed += r.units_passed.max(0);
                    defective += r.units_defective.max(0);
                }

                StageYield {
                    stage: stage.clone(),
                    units_inspected: inspected,
                    units_passed: passed,
                    units_defective: defective,
                    fpy_percentage: Self::calculate_fpy(passed, inspected),
                }
            })
            .collect()
    }

    /// RTY% = ∏ (FPY_i / 100) × 100,跳过无检验数据的工序
    ///
    /// 没有任何工序有检验数据时返回 0
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn calculate_rty(&self, records: &[QualityInspectionRecord]) -> RtyBreakdown {
        let mut included = Vec::new();
        let mut skipped = Vec::new();
        let mut product = Decimal::ONE;

        for stage_yield in self.aggregate_stage_yields(records) {
            if stage_yield.units_inspected <= 0 {
                skipped.push(stage_yield.stage.clone());
                continue;
            }

            // 未取整的工序良率参与连乘,保证 RTY <= min(FPY)
            let fraction = safe_div(
                count(stage_yield.units_passed),
                count(stage_yield.units_inspected),
            )
            .unwrap_or(Decimal::ZERO)
            .min(Decimal::ONE);
            product *= fraction;
            included.push(stage_yield);
        }

        let rty_percentage = if included.is_empty() {
            Decimal::ZERO
        } else {
            round2(clamp_rate(product * Decimal::ONE_HUNDRED))
        };

        debug!(rty = %rty_percentage, skipped = ?skipped, "RTY 计算完成");

        RtyBreakdown {
            rty_percentage,
            stages: included,
            skipped_stages: skipped,
        }
    }

    /// 由各工序 FPY% 直接计算 RTY% (列表只包含参与连乘的工序)
    pub fn calculate_rty_from_fpys(stage_fpys: &[Decimal]) -> Decimal {
        if stage_fpys.is_empty() {
            return Decimal::ZERO;
        }
        let product = stage_fpys
            .iter()
            .fold(Decimal::ONE, |acc, fpy| acc * clamp_rate(*fpy) / Decimal::ONE_HUNDRED);
        round2(clamp_rate(product * Decimal::ONE_HUNDRED))
    }

    // ==========================================
    // 缺陷逃逸 / 返工拆分
    // ==========================================

    /// 缺陷逃逸率% = 终检发现缺陷 / 全部工序发现缺陷 × 100
    pub fn calculate_defect_escape_rate(&self, records: &[QualityInspectionRecord]) -> Decimal {
        let final_stage = self.final_stage();
        let total: i64 = records.iter().map(|r| r.units_defective.max(0)).sum();
        let escaped: i64 = records
            .iter()
            .filter(|r| r.is_stage(final_stage))
            .map(|r| r.units_defective.max(0))
            .sum();

        rate_percentage(escaped, total)
    }

    /// 返工/返修/报废拆分
    ///
    /// recovery_rate = (reworked + repaired) / (inspected - passed) × 100
    pub fn calculate_rework_breakdown(records: &[QualityInspectionRecord]) -> ReworkBreakdown {
        let inspected: i64 = records.iter().map(|r| r.units_inspected.max(0)).sum();
        let passed: i64 = records.iter().map(|r| r.units_passed.max(0)).sum();
        let reworked: i64 = records.iter().map(|r| r.units_reworked.max(0)).sum();
        let repaired: i64 = records.iter().map(|r| r.units_requiring_repair.max(0)).sum();
        let scrapped: i64 = records.iter().map(|r| r.units_scrapped.max(0)).sum();
        let failed = (inspected - passed).max(0);

        let rework_rate = rate_percentage(reworked, inspected);
        let repair_rate = rate_percentage(repaired, inspected);

        ReworkBreakdown {
            units_inspected: inspected,
            units_passed: passed,
            failed_units: failed,
            units_reworked: reworked,
            units_requiring_repair: repaired,
            units_scrapped: scrapped,
            rework_rate,
            repair_rate,
            scrap_rate: rate_percentage(scrapped, inspected),
            recovery_rate: rate_percentage(reworked + repaired, failed),
            throughput_loss_percentage: round2(rework_rate + repair_rate),
        }
    }

    // ==========================================
    // 综合质量分
    // ==========================================

    /// 质量分 = FPY×0.40 + RTY×0.30 + (100-报废率)×0.20 + (100-逃逸率)×0.10
    pub fn calculate_quality_score(
        fpy: Decimal,
        rty: Decimal,
        scrap_rate: Decimal,
        defect_escape_rate: Decimal,
    ) -> Decimal {
        let scrap_score = (Decimal::ONE_HUNDRED - scrap_rate).max(Decimal::ZERO);
        let escape_score = (Decimal::ONE_HUNDRED - defect_escape_rate).max(Decimal::ZERO);

        let score = clamp_rate(fpy) * FPY_WEIGHT
            + clamp_rate(rty) * RTY_WEIGHT
            + scrap_score * SCRAP_WEIGHT
            + escape_score * ESCAPE_WEIGHT;

        round2(clamp_rate(score))
    }

    /// 质量等级映射
    pub fn grade(score: Decimal) -> QualityGrade {
        match score {
            s if s >= dec!(95) => QualityGrade::APlus,
            s if s >= dec!(90) => QualityGrade::A,
            s if s >= dec!(85) => QualityGrade::BPlus,
            s if s >= dec!(80) => QualityGrade::B,
            s if s >= dec!(75) => QualityGrade::CPlus,
            s if s >= dec!(70) => QualityGrade::C,
            _ => QualityGrade::D,
        }
    }

    /// 汇总全部质量良率指标
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn calculate_quality_yield(&self, records: &[QualityInspectionRecord]) -> QualityYieldResult {
        let inspected: i64 = records.iter().map(|r| r.units_inspected.max(0)).sum();
        let passed: i64 = records.iter().map(|r| r.units_passed.max(0)).sum();
        let defective: i64 = records.iter().map(|r| r.units_defective.max(0)).sum();
        let scrapped: i64 = records.iter().map(|r| r.units_scrapped.max(0)).sum();

        let ppm = Self::calculate_ppm(defective, inspected);
        let dpmo = Self::calculate_dpmo(defective, inspected, self.opportunities_per_unit);
        let sigma_level = Self::sigma_level(dpmo);
        let fpy_percentage = Self::calculate_fpy(passed, inspected);
        let rty_percentage = self.calculate_rty(records).rty_percentage;
        let scrap_rate = Self::calculate_scrap_rate(scrapped, inspected);
        let defect_escape_rate = self.calculate_defect_escape_rate(records);
        let quality_score =
            Self::calculate_quality_score(fpy_percentage, rty_percentage, scrap_rate, defect_escape_rate);

        QualityYieldResult {
            ppm,
            dpmo,
            sigma_level,
            fpy_percentage,
            rty_percentage,
            scrap_rate,
            defect_escape_rate,
            quality_score,
            grade: Self::grade(quality_score),
        }
    }
}
