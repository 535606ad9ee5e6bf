// 周期时间推断链的各个层级
//
// 每个层级独立做除零保护,只对有效样本求均值;
// 没有有效样本时返回 None,由推断链降级到下一层。

use super::resolver::{CycleTimeContext, InferenceEngine};
use super::DEFAULT_CYCLE_TIME;
use crate::domain::types::InferenceSource;
use crate::engine::numeric::average;
use crate::repository::HistoryQuery;
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

/// 层级命中结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LevelOutcome {
    pub value: Decimal,
    pub data_points: usize,
}

/// 行业默认周期时间 (小时/件)
///
/// 按表内顺序匹配,具体品类排在前面 ("dress shirt" 先于 "t-shirt")
pub fn industry_cycle_times() -> [(&'static str, Decimal); 7] {
    [
        ("dress shirt", dec!(0.25)),
        ("t-shirt", dec!(0.15)),
        ("polo", dec!(0.20)),
        ("jeans", dec!(0.35)),
        ("pants", dec!(0.30)),
        ("hoodie", dec!(0.40)),
        ("jacket", dec!(0.50)),
    ]
}

/// 产品名称子串匹配 (忽略大小写)
pub fn lookup_industry_cycle_time(product_name: &str) -> Option<Decimal> {
    let name = product_name.to_lowercase();
    industry_cycle_times()
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, hours)| *hours)
}

// ==========================================
// 层级 1: 客户/款式标准
// ==========================================
pub(crate) fn client_standard(
    _engine: &InferenceEngine,
    ctx: &CycleTimeContext<'_>,
) -> Option<LevelOutcome> {
    ctx.product
        .ideal_cycle_time
        .filter(|v| *v > Decimal::ZERO)
        .map(|value| LevelOutcome {
            value,
            data_points: 1,
        })
}

// ==========================================
// 层级 2: 同产品 + 同班次历史均值 (排除当前记录)
// ==========================================
pub(crate) fn shift_line_history(
    engine: &InferenceEngine,
    ctx: &CycleTimeContext<'_>,
) -> Option<LevelOutcome> {
    let shift_id = ctx.shift_id?;
    let query = HistoryQuery::until(ctx.as_of)
        .for_product(&ctx.product.product_id)
        .for_shift(shift_id)
        .excluding(ctx.entry_id)
        .with_limit(engine.settings.history_sample_limit);

    average_cycle_time(engine, &query, InferenceSource::ShiftLineHistory)
}

// ==========================================
// 层级 3: 行业默认值
// ==========================================
pub(crate) fn industry_default(
    _engine: &InferenceEngine,
    ctx: &CycleTimeContext<'_>,
) -> Option<LevelOutcome> {
    lookup_industry_cycle_time(&ctx.product.product_name).map(|value| LevelOutcome {
        value,
        data_points: 0,
    })
}

// ==========================================
// 层级 4: 近 30 天产品历史均值 (任意班次,排除当前记录)
// ==========================================
pub(crate) fn historical_30_day(
    engine: &InferenceEngine,
    ctx: &CycleTimeContext<'_>,
) -> Option<LevelOutcome> {
    let from = ctx.as_of - Duration::days(engine.settings.historical_window_days);
    let query = HistoryQuery::until(ctx.as_of)
        .since(from)
        .for_product(&ctx.product.product_id)
        .excluding(ctx.entry_id)
        .with_limit(engine.settings.history_sample_limit);

    average_cycle_time(engine, &query, InferenceSource::Historical30Day)
}

// ==========================================
// 层级 5: 全局产品均值 (排除当前记录)
// ==========================================
pub(crate) fn global_product_average(
    engine: &InferenceEngine,
    ctx: &CycleTimeContext<'_>,
) -> Option<LevelOutcome> {
    let query = HistoryQuery::until(ctx.as_of)
        .excluding(ctx.entry_id)
        .with_limit(engine.settings.history_sample_limit);

    average_cycle_time(engine, &query, InferenceSource::GlobalProductAverage)
}

// ==========================================
// 层级 6: 系统兜底常量
// ==========================================
pub(crate) fn system_fallback(
    engine: &InferenceEngine,
    _ctx: &CycleTimeContext<'_>,
) -> Option<LevelOutcome> {
    let configured = engine.settings.default_cycle_time;
    let value = if configured > Decimal::ZERO {
        configured
    } else {
        DEFAULT_CYCLE_TIME
    };

    Some(LevelOutcome {
        value,
        data_points: 0,
    })
}

/// 读取历史样本并对有效样本求均值
///
/// 仓储失败视为该层级无数据
fn average_cycle_time(
    engine: &InferenceEngine,
    query: &HistoryQuery,
    source: InferenceSource,
) -> Option<LevelOutcome> {
    let records = match engine.history.find_production_history(query) {
        Ok(records) => records,
        Err(e) => {
            warn!(source = %source, error = %e, "历史数据读取失败,跳过该层级");
            return None;
        }
    };

    let samples: Vec<Decimal> = records
        .iter()
        .filter_map(|r| r.cycle_time_sample())
        .collect();

    average(&samples).map(|value| LevelOutcome {
        value,
        data_points: samples.len(),
    })
}
