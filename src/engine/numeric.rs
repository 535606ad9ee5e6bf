// ==========================================
// 制造运营平台 - 数值口径
// ==========================================
// 红线: 所有比率使用精确小数,不使用二进制浮点
// 红线: 百分比输出 [0, 150],比率输出 [0, 100],两位小数
// ==========================================

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// 百分比上限 (效率/性能允许超过 100%)
pub const PERCENTAGE_CAP: Decimal = dec!(150);

/// 保留两位小数 (四舍五入,远离零)
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 截断到 [0, 150]
pub fn clamp_percentage(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, PERCENTAGE_CAP)
}

/// 截断到 [0, 100]
pub fn clamp_rate(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// 安全除法: 分母 <= 0 时返回 None
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator <= Decimal::ZERO {
        return None;
    }
    numerator.checked_div(denominator)
}

/// 计数转小数,负值按 0 处理
pub fn count(value: i64) -> Decimal {
    Decimal::from(value.max(0))
}

/// 比率 (%),分母为 0 时返回 0,结果截断到 [0, 100] 并保留两位小数
pub fn rate_percentage(numerator: i64, denominator: i64) -> Decimal {
    match safe_div(count(numerator), count(denominator)) {
        Some(ratio) => round2(clamp_rate(ratio * Decimal::ONE_HUNDRED)),
        None => Decimal::ZERO,
    }
}

/// 算术平均,空样本返回 None
pub fn average(samples: &[Decimal]) -> Option<Decimal> {
    if samples.is_empty() {
        return None;
    }
    let sum: Decimal = samples.iter().copied().sum();
    safe_div(sum, Decimal::from(samples.len()))
}
