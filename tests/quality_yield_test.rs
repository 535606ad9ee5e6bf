// ==========================================
// QualityYieldCalculator 集成测试
// ==========================================
// 测试目标: 验证 PPM/DPMO/Sigma/FPY/RTY 与综合质量分
// 覆盖范围: 三道工序汇总、返工拆分、自定义工序
// ==========================================

mod helpers;

use helpers::test_data_builder::InspectionBuilder;
use mfg_kpi_engine::domain::quality::QualityInspectionRecord;
use mfg_kpi_engine::domain::types::QualityGrade;
use mfg_kpi_engine::engine::{sigma_level, QualityYieldCalculator};
use rust_decimal_macros::dec;

/// 三道工序各检验 1000 件
///
/// - Incoming: 10 件不合格
/// - In-Process: 20 件不合格,5 件报废,8 件返工,4 件返修
/// - Final: 5 件不合格
fn three_stage_records() -> Vec<QualityInspectionRecord> {
    vec![
        InspectionBuilder::new("Q1", "Incoming", 1000).defective(10).build(),
        InspectionBuilder::new("Q2", "In-Process", 1000)
            .defective(20)
            .scrapped(5)
            .reworked(8, 4)
            .build(),
        InspectionBuilder::new("Q3", "Final", 1000).defective(5).build(),
    ]
}

#[test]
fn test_basic_quality_formulas() {
    assert_eq!(QualityYieldCalculator::calculate_ppm(5, 1000), dec!(5000));
    assert_eq!(QualityYieldCalculator::calculate_dpmo(20, 1000, 10), dec!(2000));
    assert_eq!(sigma_level(dec!(2000)), dec!(4.0));
    assert_eq!(QualityYieldCalculator::calculate_fpy(950, 1000), dec!(95));

    // 分母为 0 时返回 0
    assert_eq!(QualityYieldCalculator::calculate_ppm(5, 0), dec!(0));
    assert_eq!(QualityYieldCalculator::calculate_dpmo(5, 100, 0), dec!(0));
    assert_eq!(QualityYieldCalculator::calculate_fpy(0, 0), dec!(0));
}

#[test]
fn test_full_quality_yield_report() {
    let calc = QualityYieldCalculator::new();
    let result = calc.calculate_quality_yield(&three_stage_records());

    // 35 / 3000 × 1e6
    assert_eq!(result.ppm, dec!(11666.67));
    // 35 / 30000 × 1e6
    assert_eq!(result.dpmo, dec!(1166.67));
    assert_eq!(result.sigma_level, dec!(4.0));
    // 2965 / 3000
    assert_eq!(result.fpy_percentage, dec!(98.83));
    // 0.99 × 0.98 × 0.995
    assert_eq!(result.rty_percentage, dec!(96.53));
    assert_eq!(result.scrap_rate, dec!(0.17));
    // 5 / 35
    assert_eq!(result.defect_escape_rate, dec!(14.29));
    // 98.83×0.4 + 96.53×0.3 + 99.83×0.2 + 85.71×0.1 = 97.028
    assert_eq!(result.quality_score, dec!(97.03));
    assert_eq!(result.grade, QualityGrade::APlus);
}

#[test]
fn test_rty_never_exceeds_worst_stage() {
    let calc = QualityYieldCalculator::new();
    let breakdown = calc.calculate_rty(&three_stage_records());

    let worst = breakdown
        .stages
        .iter()
        .map(|s| s.fpy_percentage)
        .min()
        .unwrap();
    assert_eq!(worst, dec!(98));
    assert!(breakdown.rty_percentage <= worst);
    assert!(breakdown.skipped_stages.is_empty());
}

#[test]
fn test_rty_skips_stage_without_inspections() {
    let calc = QualityYieldCalculator::new();
    let records = vec![
        InspectionBuilder::new("Q1", "incoming", 200).defective(10).build(),
        InspectionBuilder::new("Q3", "FINAL", 100).defective(2).build(),
    ];

    let breakdown = calc.calculate_rty(&records);
    assert_eq!(breakdown.skipped_stages, vec!["In-Process".to_string()]);
    // 0.95 × 0.98 = 0.931
    assert_eq!(breakdown.rty_percentage, dec!(93.1));
}

#[test]
fn test_rty_without_any_data_is_zero() {
    let calc = QualityYieldCalculator::new();
    let breakdown = calc.calculate_rty(&[]);
    assert_eq!(breakdown.rty_percentage, dec!(0));
    assert_eq!(breakdown.skipped_stages.len(), 3);

    let result = calc.calculate_quality_yield(&[]);
    assert_eq!(result.ppm, dec!(0));
    assert_eq!(result.fpy_percentage, dec!(0));
}

#[test]
fn test_rework_breakdown() {
    let rework = QualityYieldCalculator::calculate_rework_breakdown(&three_stage_records());
    assert_eq!(rework.failed_units, 35);
    assert_eq!(rework.rework_rate, dec!(0.27));
    assert_eq!(rework.repair_rate, dec!(0.13));
    assert_eq!(rework.scrap_rate, dec!(0.17));
    // (8 + 4) / 35
    assert_eq!(rework.recovery_rate, dec!(34.29));
    assert_eq!(rework.throughput_loss_percentage, dec!(0.40));
}

#[test]
fn test_custom_stage_list_sets_final_stage() {
    let calc = QualityYieldCalculator::new()
        .with_stages(vec!["Cutting".to_string(), "Sewing".to_string(), "Packing".to_string()])
        .with_opportunities_per_unit(5);
    assert_eq!(calc.final_stage(), "Packing");

    let records = vec![
        InspectionBuilder::new("Q1", "Cutting", 100).defective(4).build(),
        InspectionBuilder::new("Q2", "Sewing", 100).build(),
        InspectionBuilder::new("Q3", "Packing", 100).defective(1).build(),
    ];

    // 1 / 5
    assert_eq!(calc.calculate_defect_escape_rate(&records), dec!(20));
    // 5 / (300 × 5) × 1e6
    assert_eq!(calc.calculate_quality_yield(&records).dpmo, dec!(3333.33));
}

#[test]
fn test_grade_boundaries() {
    assert_eq!(QualityYieldCalculator::grade(dec!(95)), QualityGrade::APlus);
    assert_eq!(QualityYieldCalculator::grade(dec!(94.99)), QualityGrade::A);
    assert_eq!(QualityYieldCalculator::grade(dec!(85)), QualityGrade::BPlus);
    assert_eq!(QualityYieldCalculator::grade(dec!(80)), QualityGrade::B);
    assert_eq!(QualityYieldCalculator::grade(dec!(75)), QualityGrade::CPlus);
    assert_eq!(QualityYieldCalculator::grade(dec!(70)), QualityGrade::C);
    assert_eq!(QualityYieldCalculator::grade(dec!(69.99)), QualityGrade::D);
}
