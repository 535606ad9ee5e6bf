use super::resolver::InferenceEngine;
use crate::domain::kpi::{
    InferenceMetadata, InferenceResult, LowConfidenceWarning, TargetInferenceResult,
};
use crate::domain::types::InferenceSource;
use tracing::warn;

impl InferenceEngine {
    /// 综合置信度
    ///
    /// = 层级基础置信度
    ///   + min(0.1, data_points / 100)
    ///   + max(0, 1 - recency_days / 30) × 0.1
    /// 上限 1.0
    pub fn calculate_confidence_score(
        source: InferenceSource,
        data_points: usize,
        recency_days: i64,
    ) -> f64 {
        let volume_bonus = (data_points as f64 / 100.0).min(0.1);
        let recency = recency_days.max(0) as f64;
        let recency_bonus = (1.0 - recency / 30.0).max(0.0) * 0.1;

        (source.base_confidence() + volume_bonus + recency_bonus).clamp(0.0, 1.0)
    }

    /// 低置信度判定 (仅提示,不阻断计算)
    pub fn flag_low_confidence(
        confidence: f64,
        source: &str,
        threshold: f64,
    ) -> Option<LowConfidenceWarning> {
        if confidence >= threshold {
            return None;
        }

        Some(LowConfidenceWarning {
            confidence,
            threshold,
            source: source.to_string(),
            message: format!(
                "LOW_CONFIDENCE: source={}, confidence={:.2} < threshold={:.2}",
                source, confidence, threshold
            ),
        })
    }

    /// 按引擎配置的阈值检查推断结果
    pub fn check_confidence(&self, result: &InferenceResult) -> Option<LowConfidenceWarning> {
        let warning = Self::flag_low_confidence(
            result.confidence,
            &result.source.to_string(),
            self.settings.low_confidence_threshold,
        );
        if let Some(w) = &warning {
            warn!(source = %result.source, confidence = w.confidence, "推断置信度偏低");
        }
        warning
    }

    /// 推断结果 + 低置信度告警 → 对外元数据
    pub fn inference_metadata(&self, result: &InferenceResult) -> InferenceMetadata {
        let warning = self.check_confidence(result);
        InferenceMetadata::new(result, warning.as_ref())
    }

    /// 目标值推断的对外元数据
    pub fn target_metadata(&self, result: &TargetInferenceResult) -> InferenceMetadata {
        let warning = Self::flag_low_confidence(
            result.confidence,
            &result.source.to_string(),
            self.settings.low_confidence_threshold,
        );
        InferenceMetadata::from_target(result, warning.as_ref())
    }
}
