// ==========================================
// InferenceEngine 集成测试
// ==========================================
// 测试目标: 验证周期时间推断链逐级降级与置信度
// 覆盖范围: 六级来源、当前记录排除、配置驱动的兜底值
// ==========================================

mod helpers;

use helpers::test_data_builder::{as_of, days_ago, ProductionRecordBuilder};
use mfg_kpi_engine::config::{config_keys, ConfigManager, ConfigScope, KpiConfigReader};
use mfg_kpi_engine::domain::production::{ProductStandard, ProductionRecord};
use mfg_kpi_engine::domain::types::InferenceSource;
use mfg_kpi_engine::engine::{CycleTimeContext, InferenceEngine};
use mfg_kpi_engine::logging;
use mfg_kpi_engine::repository::InMemoryProductionHistory;
use rust_decimal_macros::dec;
use std::sync::Arc;

// ==========================================
// 测试辅助函数
// ==========================================

/// 产品 P001 的三条历史记录
///
/// - E1: DAY 班, 3 天前, 0.2 h/件
/// - E2: DAY 班, 5 天前, 0.3 h/件
/// - E3: 无班次, 60 天前, 0.4 h/件 (超出 30 天窗口)
fn history() -> Vec<ProductionRecord> {
    vec![
        ProductionRecordBuilder::new("E1", "P001")
            .shift("DAY")
            .date(days_ago(3))
            .units(100)
            .run_time(dec!(20))
            .build(),
        ProductionRecordBuilder::new("E2", "P001")
            .shift("DAY")
            .date(days_ago(5))
            .units(50)
            .run_time(dec!(15))
            .build(),
        ProductionRecordBuilder::new("E3", "P001")
            .date(days_ago(60))
            .units(100)
            .run_time(dec!(40))
            .build(),
    ]
}

fn engine() -> InferenceEngine {
    InferenceEngine::new(Arc::new(InMemoryProductionHistory::with_records(history())))
}

// ==========================================
// 推断链逐级降级
// ==========================================

#[test]
fn test_cascade_walks_every_level_in_order() {
    logging::init_test();
    let engine = engine();
    let mut confidences = Vec::new();

    // 1. 客户标准
    let standard = ProductStandard::new("P001", "Classic Polo").with_cycle_time(dec!(0.22));
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&standard, as_of()).with_shift(Some("DAY")));
    assert_eq!(r.source, InferenceSource::ClientStyleStandard);
    assert_eq!(r.value, dec!(0.22));
    confidences.push(r.confidence);

    // 2. 同班次历史: (0.2 + 0.3) / 2
    let polo = ProductStandard::new("P001", "Classic Polo");
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&polo, as_of()).with_shift(Some("DAY")));
    assert_eq!(r.source, InferenceSource::ShiftLineHistory);
    assert_eq!(r.value, dec!(0.25));
    assert_eq!(r.data_points, 2);
    confidences.push(r.confidence);

    // 3. 行业默认 (夜班无历史)
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&polo, as_of()).with_shift(Some("NIGHT")));
    assert_eq!(r.source, InferenceSource::IndustryDefault);
    assert_eq!(r.value, dec!(0.20));
    confidences.push(r.confidence);

    // 4. 近 30 天产品历史 (E3 在窗口外)
    let widget = ProductStandard::new("P001", "Widget");
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&widget, as_of()));
    assert_eq!(r.source, InferenceSource::Historical30Day);
    assert_eq!(r.value, dec!(0.25));
    confidences.push(r.confidence);

    // 5. 全局均值: (0.2 + 0.3 + 0.4) / 3
    let other = ProductStandard::new("P002", "Widget");
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&other, as_of()));
    assert_eq!(r.source, InferenceSource::GlobalProductAverage);
    assert_eq!(r.value, dec!(0.3));
    assert_eq!(r.data_points, 3);
    confidences.push(r.confidence);

    // 6. 系统兜底
    let empty = InferenceEngine::new(Arc::new(InMemoryProductionHistory::new()));
    let r = empty.resolve_cycle_time(&CycleTimeContext::new(&other, as_of()));
    assert_eq!(r.source, InferenceSource::SystemFallback);
    assert_eq!(r.value, dec!(0.25));
    confidences.push(r.confidence);

    assert_eq!(confidences, vec![1.0, 0.9, 0.7, 0.6, 0.5, 0.3]);
    assert!(confidences.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_history_as_of_excludes_future_records() {
    let engine = engine();
    let polo = ProductStandard::new("P001", "Classic Polo");

    // 4 天前只能看到 E2
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&polo, days_ago(4)).with_shift(Some("DAY")));
    assert_eq!(r.source, InferenceSource::ShiftLineHistory);
    assert_eq!(r.value, dec!(0.3));
    assert_eq!(r.data_points, 1);
}

#[test]
fn test_recalculated_entry_is_excluded_from_30_day_history() {
    let engine = engine();
    let widget = ProductStandard::new("P001", "Widget");

    // 正在重算的记录 (无班次,日期与 E1 相同)
    let current = ProductionRecordBuilder::new("E1", "P001")
        .date(days_ago(3))
        .units(100)
        .run_time(dec!(20))
        .build();

    let r = engine.cycle_time_for_entry(&widget, &current);
    assert_eq!(r.source, InferenceSource::Historical30Day);
    assert_eq!(r.value, dec!(0.3));
    assert_eq!(r.data_points, 1);
}

#[test]
fn test_zero_employee_history_is_never_averaged() {
    let records = vec![
        ProductionRecordBuilder::new("E1", "P001")
            .shift("DAY")
            .date(days_ago(1))
            .employees(0)
            .run_time(dec!(100))
            .build(),
        ProductionRecordBuilder::new("E2", "P001")
            .shift("DAY")
            .date(days_ago(2))
            .units(0)
            .run_time(dec!(8))
            .build(),
    ];
    let engine = InferenceEngine::new(Arc::new(InMemoryProductionHistory::with_records(records)));
    let standard = ProductStandard::new("P001", "Gadget");
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&standard, as_of()).with_shift(Some("DAY")));
    assert_eq!(r.source, InferenceSource::SystemFallback);
}

#[test]
fn test_settings_from_config_drive_fallback_and_threshold() {
    let config = ConfigManager::new();
    config
        .set_config_value(&ConfigScope::Global, config_keys::DEFAULT_CYCLE_TIME, "0.4")
        .unwrap();
    config
        .set_config_value(&ConfigScope::Global, config_keys::LOW_CONFIDENCE_THRESHOLD, "0.2")
        .unwrap();

    let engine = InferenceEngine::with_settings(
        Arc::new(InMemoryProductionHistory::new()),
        config.get_inference_settings().unwrap(),
    );
    let standard = ProductStandard::new("P009", "Gadget");
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&standard, as_of()));

    assert_eq!(r.source, InferenceSource::SystemFallback);
    assert_eq!(r.value, dec!(0.4));
    // 0.3 >= 0.2: 不告警
    assert!(engine.check_confidence(&r).is_none());
}

#[test]
fn test_sample_limit_from_settings() {
    let records: Vec<ProductionRecord> = (1..=5)
        .map(|i| {
            ProductionRecordBuilder::new(&format!("E{}", i), "P001")
                .shift("DAY")
                .date(days_ago(i))
                .units(100)
                .run_time(if i <= 2 { dec!(10) } else { dec!(50) })
                .build()
        })
        .collect();

    let config = ConfigManager::new();
    config
        .set_config_value(&ConfigScope::Global, config_keys::HISTORY_SAMPLE_LIMIT, "2")
        .unwrap();
    let engine = InferenceEngine::with_settings(
        Arc::new(InMemoryProductionHistory::with_records(records)),
        config.get_inference_settings().unwrap(),
    );

    let standard = ProductStandard::new("P001", "Gadget");
    let r = engine.resolve_cycle_time(&CycleTimeContext::new(&standard, as_of()).with_shift(Some("DAY")));
    // 只取最新两条 (0.1, 0.1)
    assert_eq!(r.value, dec!(0.1));
    assert_eq!(r.data_points, 2);
}
