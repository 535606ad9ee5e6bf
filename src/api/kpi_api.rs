// ==========================================
// 制造运营平台 - KPI API
// ==========================================
// 职责: 校验输入 → 读取配置 → 调用计算引擎 → 附带推断元数据
// 架构: API 层 → Engine 层 → Repository 层 (trait)
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::api::dto::{
    BatchRecalcResponse, CycleTimeResponse, EntryKpiResponse, HoldResolutionResponse,
    QualityReportResponse, TargetResponse, WipAgingResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{KpiInputValidator, ValidationMode};
use crate::config::kpi_config_trait::KpiConfigReader;
use crate::domain::hold::HoldRecord;
use crate::domain::production::{ProductStandard, ProductionRecord, ShiftDefinition};
use crate::domain::quality::QualityInspectionRecord;
use crate::domain::types::HoldStatus;
use crate::engine::efficiency::EfficiencyPerformanceCalculator;
use crate::engine::inference::{CycleTimeContext, InferenceEngine};
use crate::engine::quality_yield::QualityYieldCalculator;
use crate::engine::wip_aging::WipAgingCalculator;
use crate::repository::ProductionHistoryRepository;

// ==========================================
// KpiApi - KPI 计算 API
// ==========================================

/// KPI 计算API
///
/// 职责：
/// 1. 输入校验 (严格模式报错 / 跳过模式剔除)
/// 2. 按配置构建推断引擎与计算器
/// 3. 推断结果统一包装为 InferenceMetadata
pub struct KpiApi {
    config: Arc<dyn KpiConfigReader>,
    history: Arc<dyn ProductionHistoryRepository>,
    validator: KpiInputValidator,
}

impl KpiApi {
    /// 创建新的KpiApi实例
    pub fn new(
        config: Arc<dyn KpiConfigReader>,
        history: Arc<dyn ProductionHistoryRepository>,
    ) -> Self {
        Self {
            config,
            history,
            validator: KpiInputValidator::default(),
        }
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validator = KpiInputValidator::new(mode);
        self
    }

    /// 按当前配置构建推断引擎 (每次调用读取最新配置)
    fn inference_engine(&self) -> ApiResult<Arc<InferenceEngine>> {
        let settings = self.config.get_inference_settings()?;
        Ok(Arc::new(InferenceEngine::with_settings(
            Arc::clone(&self.history),
            settings,
        )))
    }

    fn quality_calculator(&self) -> ApiResult<QualityYieldCalculator> {
        Ok(QualityYieldCalculator::new()
            .with_stages(self.config.get_rty_stages()?)
            .with_opportunities_per_unit(self.config.get_opportunities_per_unit()?))
    }

    fn wip_calculator(&self, client_id: Option<&str>) -> ApiResult<WipAgingCalculator> {
        let thresholds = self.config.get_aging_thresholds(client_id)?;
        KpiInputValidator::validate_thresholds(&thresholds)?;
        Ok(WipAgingCalculator::new(thresholds))
    }

    // ==========================================
    // 标准值推断
    // ==========================================

    /// 推断理想周期时间
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub fn infer_cycle_time(
        &self,
        product: &ProductStandard,
        shift_id: Option<&str>,
        as_of: NaiveDate,
    ) -> ApiResult<CycleTimeResponse> {
        let engine = self.inference_engine()?;
        let result = engine.resolve_cycle_time(&CycleTimeContext::new(product, as_of).with_shift(shift_id));

        Ok(CycleTimeResponse {
            product_id: product.product_id.clone(),
            cycle_time: result.value,
            data_points: result.data_points,
            metadata: engine.inference_metadata(&result),
        })
    }

    /// 推断目标 OEE
    pub fn infer_target_oee(&self, product: &ProductStandard, as_of: NaiveDate) -> ApiResult<TargetResponse> {
        let engine = self.inference_engine()?;
        let result = engine.resolve_target_oee(product, as_of);
        Ok(TargetResponse {
            metric: "TARGET_OEE".to_string(),
            value: result.value,
            metadata: engine.target_metadata(&result),
        })
    }

    /// 推断目标 PPM
    pub fn infer_target_ppm(&self, product: &ProductStandard) -> ApiResult<TargetResponse> {
        let engine = self.inference_engine()?;
        let result = engine.resolve_target_ppm(product);
        Ok(TargetResponse {
            metric: "TARGET_PPM".to_string(),
            value: result.value,
            metadata: engine.target_metadata(&result),
        })
    }

    /// 推断目标缺勤率 (client_id 为 None 时跳过客户标准)
    pub fn infer_target_absenteeism(
        &self,
        client_id: Option<&str>,
        as_of: NaiveDate,
    ) -> ApiResult<TargetResponse> {
        let engine = self.inference_engine()?;
        let client_config = client_id
            .map(|id| self.config.get_client_config(id))
            .transpose()?;
        let result = engine.resolve_target_absenteeism(client_config.as_ref(), as_of);
        Ok(TargetResponse {
            metric: "TARGET_ABSENTEEISM".to_string(),
            value: result.value,
            metadata: engine.target_metadata(&result),
        })
    }

    // ==========================================
    // 效率 / 性能
    // ==========================================

    /// 计算单条生产记录的 KPI
    #[instrument(skip_all, fields(entry_id = %record.entry_id))]
    pub fn calculate_entry_kpis(
        &self,
        record: &ProductionRecord,
        product: &ProductStandard,
        shift: Option<&ShiftDefinition>,
    ) -> ApiResult<EntryKpiResponse> {
        let violations = KpiInputValidator::check_production_record(record);
        if !violations.is_empty() {
            return Err(ApiError::ValidationError {
                reason: format!("生产记录{}校验失败", record.entry_id),
                violations,
            });
        }

        let engine = self.inference_engine()?;
        let calculator = EfficiencyPerformanceCalculator::new(Arc::clone(&engine));
        let kpis = calculator.calculate_entry_kpis(record, product, shift);
        let metadata = engine.inference_metadata(&kpis.inference);

        Ok(EntryKpiResponse {
            entry_id: kpis.entry_id,
            scheduled_hours: kpis.scheduled_hours,
            efficiency: kpis.efficiency,
            performance: kpis.performance,
            quality_rate: kpis.quality_rate,
            oee: kpis.oee,
            metadata,
        })
    }

    /// 批量重算效率/性能缓存字段
    pub fn recalculate_entries(
        &self,
        records: Vec<ProductionRecord>,
        products: &HashMap<String, ProductStandard>,
        shifts: &HashMap<String, ShiftDefinition>,
    ) -> ApiResult<BatchRecalcResponse> {
        let submitted = records.len();
        let valid = self.validator.validate_production_records(records)?;
        let skipped_count = submitted - valid.len();

        let calculator = EfficiencyPerformanceCalculator::new(self.inference_engine()?);
        let records = calculator.recalculate_batch(valid, products, shifts);

        info!(total = records.len(), skipped = skipped_count, "批量重算完成");
        Ok(BatchRecalcResponse {
            total_count: records.len(),
            skipped_count,
            records,
        })
    }

    // ==========================================
    // 质量
    // ==========================================

    /// 质量报表 (PPM / DPMO / Sigma / FPY / RTY / 返工 / 评分)
    #[instrument(skip_all, fields(count = records.len()))]
    pub fn quality_report(&self, records: Vec<QualityInspectionRecord>) -> ApiResult<QualityReportResponse> {
        let records = self.validator.validate_inspection_records(records)?;
        let calculator = self.quality_calculator()?;

        Ok(QualityReportResponse {
            summary: calculator.calculate_quality_yield(&records),
            stage_yields: calculator.aggregate_stage_yields(&records),
            rty: calculator.calculate_rty(&records),
            rework: QualityYieldCalculator::calculate_rework_breakdown(&records),
            opportunities_per_unit: calculator.opportunities_per_unit(),
        })
    }

    // ==========================================
    // 在制品老化
    // ==========================================

    /// 在制品老化报表 (客户阈值)
    #[instrument(skip(self, holds), fields(count = holds.len()))]
    pub fn wip_aging_report(
        &self,
        holds: Vec<HoldRecord>,
        client_id: Option<&str>,
        as_of: NaiveDate,
    ) -> ApiResult<WipAgingResponse> {
        let holds = self.validator.validate_hold_records(holds)?;
        let calculator = self.wip_calculator(client_id)?;

        let aging = calculator.calculate_wip_aging(&holds, as_of);
        let chronic_hold_ids = calculator
            .identify_chronic_holds(&holds, None, as_of)
            .into_iter()
            .map(|h| h.hold_id)
            .collect();

        Ok(WipAgingResponse {
            client_id: client_id.map(|s| s.to_string()),
            as_of,
            aging,
            chronic_hold_ids,
        })
    }

    /// 恢复/释放保留并固化保留时长
    pub fn resume_hold(
        &self,
        hold: &mut HoldRecord,
        resumed_at: NaiveDateTime,
        status: HoldStatus,
    ) -> ApiResult<Decimal> {
        Ok(WipAgingCalculator::resolve_hold_on_resume(hold, resumed_at, status)?)
    }

    /// 保留解决率
    pub fn hold_resolution(
        &self,
        holds: Vec<HoldRecord>,
        client_id: Option<&str>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> ApiResult<HoldResolutionResponse> {
        if date_from > date_to {
            return Err(ApiError::InvalidInput(format!(
                "日期范围无效: {} > {}",
                date_from, date_to
            )));
        }

        let holds = self.validator.validate_hold_records(holds)?;
        let calculator = self.wip_calculator(client_id)?;

        Ok(HoldResolutionResponse {
            date_from,
            date_to,
            summary: calculator.hold_resolution_summary(&holds, date_from, date_to),
        })
    }
}
