// 目标值推断: 与周期时间相同的降级链形态,层级更短
//
// 目标 OEE:    产品标准 -> 近 30 天 (效率% × 性能% / 100) 均值 -> 75%
// 目标 PPM:    产品标准 -> 2500
// 目标缺勤率:  客户配置 -> 近 30 天出勤记录均值 -> 5%

use super::resolver::InferenceEngine;
use crate::domain::hold::ClientKpiConfig;
use crate::domain::kpi::TargetInferenceResult;
use crate::domain::production::ProductStandard;
use crate::domain::types::TargetSource;
use crate::engine::numeric::{average, round2};
use crate::repository::HistoryQuery;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, instrument, warn};

/// 行业目标 OEE (%)
pub const INDUSTRY_TARGET_OEE: Decimal = dec!(75);
/// 行业目标 PPM
pub const INDUSTRY_TARGET_PPM: Decimal = dec!(2500);
/// 行业目标缺勤率 (%)
pub const INDUSTRY_TARGET_ABSENTEEISM: Decimal = dec!(5);

impl InferenceEngine {
    /// 推断目标 OEE (%)
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub fn resolve_target_oee(&self, product: &ProductStandard, as_of: NaiveDate) -> TargetInferenceResult {
        if let Some(target) = product.target_oee.filter(|v| *v > Decimal::ZERO) {
            return TargetInferenceResult::from_source(TargetSource::ClientStandard, target, 1);
        }

        let from = as_of - Duration::days(self.settings.historical_window_days);
        let query = HistoryQuery::until(as_of)
            .since(from)
            .for_product(&product.product_id)
            .with_limit(self.settings.history_sample_limit);

        match self.history.find_production_history(&query) {
            Ok(records) => {
                let samples: Vec<Decimal> = records
                    .iter()
                    .filter_map(|r| r.oee_sample())
                    .filter(|v| *v > Decimal::ZERO)
                    .collect();
                if let Some(avg) = average(&samples) {
                    debug!(value = %avg, data_points = samples.len(), "目标 OEE 取历史均值");
                    return TargetInferenceResult::from_source(
                        TargetSource::HistoricalAverage,
                        round2(avg),
                        samples.len(),
                    );
                }
            }
            Err(e) => warn!(error = %e, "OEE 历史读取失败,使用行业常量"),
        }

        TargetInferenceResult::from_source(TargetSource::IndustryDefault, INDUSTRY_TARGET_OEE, 0)
    }

    /// 推断目标 PPM
    pub fn resolve_target_ppm(&self, product: &ProductStandard) -> TargetInferenceResult {
        match product.target_ppm.filter(|v| *v > Decimal::ZERO) {
            Some(target) => TargetInferenceResult::from_source(TargetSource::ClientStandard, target, 1),
            None => TargetInferenceResult::from_source(TargetSource::IndustryDefault, INDUSTRY_TARGET_PPM, 0),
        }
    }

    /// 推断目标缺勤率 (%)
    #[instrument(skip(self, client_config))]
    pub fn resolve_target_absenteeism(
        &self,
        client_config: Option<&ClientKpiConfig>,
        as_of: NaiveDate,
    ) -> TargetInferenceResult {
        if let Some(target) = client_config
            .and_then(|c| c.target_absenteeism)
            .filter(|v| *v >= Decimal::ZERO)
        {
            return TargetInferenceResult::from_source(TargetSource::ClientStandard, target, 1);
        }

        let from = as_of - Duration::days(self.settings.historical_window_days);
        match self
            .history
            .find_attendance_history(from, as_of, self.settings.history_sample_limit)
        {
            Ok(records) => {
                let samples: Vec<Decimal> = records
                    .iter()
                    .filter_map(|a| a.absenteeism_sample())
                    .collect();
                if let Some(avg) = average(&samples) {
                    return TargetInferenceResult::from_source(
                        TargetSource::HistoricalAverage,
                        round2(avg),
                        samples.len(),
                    );
                }
            }
            Err(e) => warn!(error = %e, "出勤历史读取失败,使用行业常量"),
        }

        TargetInferenceResult::from_source(
            TargetSource::IndustryDefault,
            INDUSTRY_TARGET_ABSENTEEISM,
            0,
        )
    }
}
