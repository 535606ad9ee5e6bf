// ==========================================
// 制造运营平台 - 标准值推断引擎
// ==========================================
// 优先级: CLIENT_STYLE_STANDARD -> SHIFT_LINE_HISTORY -> INDUSTRY_DEFAULT
//         -> HISTORICAL_30_DAY -> GLOBAL_PRODUCT_AVERAGE -> SYSTEM_FALLBACK
// 红线: 缺失数据从不报错,最终必定落到兜底常量
// 红线: 返回的置信度必须与实际命中的层级一致
// ==========================================
// 职责: 推断理想周期时间、目标 OEE、目标 PPM、目标缺勤率
// 输入: 产品标准 + 班次 + 历史数据仓储
// 输出: InferenceResult (值 + 置信度 + 来源)
// ==========================================

mod confidence;
mod levels;
mod resolver;
mod targets;


pub use levels::{lookup_industry_cycle_time, industry_cycle_times};
pub use resolver::{CycleTimeContext, InferenceEngine, InferenceSettings};
pub use targets::{
    INDUSTRY_TARGET_ABSENTEEISM, INDUSTRY_TARGET_OEE, INDUSTRY_TARGET_PPM,
};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 系统兜底周期时间 (小时/件)
pub const DEFAULT_CYCLE_TIME: Decimal = dec!(0.25);

/// 默认低置信度阈值
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// 历史均值窗口 (天)
pub const DEFAULT_HISTORICAL_WINDOW_DAYS: i64 = 30;
