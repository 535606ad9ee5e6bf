// ==========================================
// 制造运营平台 - Sigma 等级查表
// ==========================================
// 口径: 1.5σ 长期漂移惯例 (Motorola Six Sigma)
// 红线: DPMO 越高,Sigma 等级不得更高 (单调不增阶梯函数)
// ==========================================

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// (DPMO 上限, Sigma 等级),按上限升序
pub fn sigma_table() -> [(Decimal, Decimal); 6] {
    [
        (dec!(3.4), dec!(6.0)),
        (dec!(233), dec!(5.0)),
        (dec!(6210), dec!(4.0)),
        (dec!(66807), dec!(3.0)),
        (dec!(308537), dec!(2.0)),
        (dec!(690000), dec!(1.0)),
    ]
}

/// DPMO -> Sigma 等级
///
/// 返回第一个上限 >= DPMO 的等级;超出全部上限返回 0
pub fn sigma_level(dpmo: Decimal) -> Decimal {
    sigma_table()
        .iter()
        .find(|(threshold, _)| *threshold >= dpmo)
        .map(|(_, sigma)| *sigma)
        .unwrap_or(Decimal::ZERO)
}
