use super::levels::{self, LevelOutcome};
use super::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CYCLE_TIME, DEFAULT_HISTORICAL_WINDOW_DAYS};
use crate::domain::kpi::InferenceResult;
use crate::domain::production::{ProductStandard, ProductionRecord};
use crate::domain::types::InferenceSource;
use crate::repository::{ProductionHistoryRepository, DEFAULT_HISTORY_LIMIT};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// 推断引擎参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceSettings {
    /// 兜底周期时间 (小时/件)
    pub default_cycle_time: Decimal,
    /// 每个层级最多读取的历史样本
    pub history_sample_limit: usize,
    /// 历史均值窗口 (天)
    pub historical_window_days: i64,
    /// 低置信度告警阈值
    pub low_confidence_threshold: f64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            default_cycle_time: DEFAULT_CYCLE_TIME,
            history_sample_limit: DEFAULT_HISTORY_LIMIT,
            historical_window_days: DEFAULT_HISTORICAL_WINDOW_DAYS,
            low_confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// 周期时间推断上下文
#[derive(Debug, Clone, Copy)]
pub struct CycleTimeContext<'a> {
    pub product: &'a ProductStandard,
    pub shift_id: Option<&'a str>,
    /// 正在重算的记录 (历史窗口中排除)
    pub entry_id: Option<&'a str>,
    /// 计算基准日期
    pub as_of: NaiveDate,
}

impl<'a> CycleTimeContext<'a> {
    pub fn new(product: &'a ProductStandard, as_of: NaiveDate) -> Self {
        Self {
            product,
            shift_id: None,
            entry_id: None,
            as_of,
        }
    }

    pub fn with_shift(mut self, shift_id: Option<&'a str>) -> Self {
        self.shift_id = shift_id;
        self
    }

    /// 以生产记录构造上下文 (班次、记录 ID、生产日期取自记录)
    pub fn for_entry(product: &'a ProductStandard, record: &'a ProductionRecord) -> Self {
        Self {
            product,
            shift_id: record.shift_id.as_deref(),
            entry_id: Some(record.entry_id.as_str()),
            as_of: record.production_date,
        }
    }
}

type CycleTimeLevel = fn(&InferenceEngine, &CycleTimeContext<'_>) -> Option<LevelOutcome>;

/// 周期时间推断链 (顺序即优先级)
const CYCLE_TIME_CHAIN: [(InferenceSource, CycleTimeLevel); 6] = [
    (InferenceSource::ClientStyleStandard, levels::client_standard),
    (InferenceSource::ShiftLineHistory, levels::shift_line_history),
    (InferenceSource::IndustryDefault, levels::industry_default),
    (InferenceSource::Historical30Day, levels::historical_30_day),
    (InferenceSource::GlobalProductAverage, levels::global_product_average),
    (InferenceSource::SystemFallback, levels::system_fallback),
];

// ==========================================
// InferenceEngine - 标准值推断引擎
// ==========================================
pub struct InferenceEngine {
    pub(super) settings: InferenceSettings,
    pub(super) history: Arc<dyn ProductionHistoryRepository>,
}

impl InferenceEngine {
    pub fn new(history: Arc<dyn ProductionHistoryRepository>) -> Self {
        Self::with_settings(history, InferenceSettings::default())
    }

    pub fn with_settings(
        history: Arc<dyn ProductionHistoryRepository>,
        settings: InferenceSettings,
    ) -> Self {
        Self { settings, history }
    }

    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    /// 推断理想周期时间
    ///
    /// 按推断链逐级尝试,返回第一个得到可用值 (> 0) 的层级
    #[instrument(skip(self, ctx), fields(product_id = %ctx.product.product_id, as_of = %ctx.as_of))]
    pub fn resolve_cycle_time(&self, ctx: &CycleTimeContext<'_>) -> InferenceResult {
        for (source, level) in CYCLE_TIME_CHAIN.iter() {
            match level(self, ctx) {
                Some(outcome) if outcome.value > Decimal::ZERO => {
                    debug!(
                        source = %source,
                        value = %outcome.value,
                        data_points = outcome.data_points,
                        "周期时间推断命中"
                    );
                    return InferenceResult::from_level(*source, outcome.value, outcome.data_points);
                }
                _ => trace!(source = %source, "层级无可用数据,降级"),
            }
        }

        InferenceResult::from_level(InferenceSource::SystemFallback, DEFAULT_CYCLE_TIME, 0)
    }

    /// 只取客户标准,没有时走完整推断链
    pub fn cycle_time_for_entry(
        &self,
        product: &ProductStandard,
        record: &ProductionRecord,
    ) -> InferenceResult {
        self.resolve_cycle_time(&CycleTimeContext::for_entry(product, record))
    }
}
