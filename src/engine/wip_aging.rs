// ==========================================
// 制造运营平台 - 在制品老化计算引擎
// ==========================================
// 红线: 每条活动保留 (ON_HOLD) 恰好落入一个老化桶
// 红线: 调整后老化 = max(0, 原始老化 - 保留时长),不得为负
// 红线: 保留时长在恢复/释放时计算一次,之后不再重算
// ==========================================
// 职责: 老化分桶、保留时长、慢性保留识别、解决率
// 输入: 保留记录 + 客户老化阈值 + 基准时间
// 输出: WipAgingResult / HoldResolutionSummary
// ==========================================

use crate::domain::hold::{AgingThresholds, ClientKpiConfig, HoldRecord};
use crate::domain::kpi::{HoldResolutionSummary, WipAgingBucket, WipAgingResult};
use crate::domain::types::HoldStatus;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::numeric::{rate_percentage, round2, safe_div};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

/// 超过该天数视为长期保留桶
pub const LONG_TERM_AGE_DAYS: i64 = 30;

const SECONDS_PER_HOUR: Decimal = dec!(3600);

// ==========================================
// WipAgingCalculator - 在制品老化计算引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct WipAgingCalculator {
    thresholds: AgingThresholds,
}

impl WipAgingCalculator {
    pub fn new(thresholds: AgingThresholds) -> Self {
        Self { thresholds }
    }

    /// 按客户配置创建,无配置时使用默认阈值 (7 / 14 天)
    pub fn from_client_config(client_config: Option<&ClientKpiConfig>) -> Self {
        Self::new(AgingThresholds::resolve(client_config))
    }

    pub fn thresholds(&self) -> AgingThresholds {
        self.thresholds
    }

    // ==========================================
    // 老化分桶
    // ==========================================

    /// 老化天数 = as_of - hold_date (整天);未来日期按 0 处理
    pub fn aging_days(hold_date: NaiveDate, as_of: NaiveDate) -> i64 {
        (as_of - hold_date).num_days().max(0)
    }

    /// 空老化桶: [0, aging] / (aging, critical] / (critical, 30] / (30, ∞)
    pub fn empty_buckets(&self) -> Vec<WipAgingBucket> {
        let aging = self.thresholds.aging_threshold_days;
        let critical = self.thresholds.critical_threshold_days;

        vec![
            WipAgingBucket::from_age_range(0, Some(aging)),
            WipAgingBucket::from_age_range(aging + 1, Some(critical)),
            WipAgingBucket::from_age_range(critical + 1, Some(LONG_TERM_AGE_DAYS)),
            WipAgingBucket::new(
                format!("{}+", LONG_TERM_AGE_DAYS),
                LONG_TERM_AGE_DAYS + 1,
                None,
            ),
        ]
    }

    /// 老化桶下标 (按区间顺序判定,保证划分完整)
    fn bucket_index(&self, aging_days: i64) -> usize {
        if aging_days <= self.thresholds.aging_threshold_days {
            0
        } else if aging_days <= self.thresholds.critical_threshold_days {
            1
        } else if aging_days <= LONG_TERM_AGE_DAYS {
            2
        } else {
            3
        }
    }

    /// 活动保留老化分析
    #[instrument(skip(self, holds), fields(count = holds.len()))]
    pub fn calculate_wip_aging(&self, holds: &[HoldRecord], as_of: NaiveDate) -> WipAgingResult {
        let mut buckets = self.empty_buckets();
        let mut total_active = 0i64;
        let mut total_days = 0i64;
        let mut flagged_aging = 0i64;
        let mut flagged_critical = 0i64;

        for hold in holds.iter().filter(|h| h.status.is_active()) {
            let days = Self::aging_days(hold.hold_date, as_of);
            buckets[self.bucket_index(days)].add_hold(hold.quantity);

            total_active += 1;
            total_days += days;
            if days > self.thresholds.aging_threshold_days {
                flagged_aging += 1;
            }
            if days > self.thresholds.critical_threshold_days {
                flagged_critical += 1;
            }
        }

        let average_aging_days = safe_div(Decimal::from(total_days), Decimal::from(total_active))
            .map(round2)
            .unwrap_or(Decimal::ZERO);

        debug!(
            total_active,
            flagged_aging,
            flagged_critical,
            average = %average_aging_days,
            "在制品老化分析完成"
        );

        WipAgingResult {
            thresholds: self.thresholds,
            buckets,
            total_active_holds: total_active,
            average_aging_days,
            flagged_aging_count: flagged_aging,
            flagged_critical_count: flagged_critical,
        }
    }

    // ==========================================
    // 保留时长
    // ==========================================

    /// 保留时长 (小时) = resume - hold_timestamp (缺失时取 hold_date 零点)
    ///
    /// 未恢复时返回 None
    pub fn resolve_hold_duration(hold: &HoldRecord) -> Option<Decimal> {
        hold.resume_timestamp
            .map(|resume| Self::elapsed_hours(hold.effective_start(), resume))
    }

    /// 恢复/释放保留并固化保留时长
    ///
    /// 只允许 ON_HOLD -> RESUMED / RELEASED;已固化的时长不会被覆盖
    pub fn resolve_hold_on_resume(
        hold: &mut HoldRecord,
        resumed_at: NaiveDateTime,
        new_status: HoldStatus,
    ) -> EngineResult<Decimal> {
        let allowed_target = matches!(new_status, HoldStatus::Resumed | HoldStatus::Released);
        if !hold.status.is_active() || !allowed_target {
            return Err(EngineError::InvalidHoldTransition {
                hold_id: hold.hold_id.clone(),
                from: hold.status.to_string(),
                to: new_status.to_string(),
            });
        }
        if resumed_at < hold.effective_start() {
            return Err(EngineError::ResumeBeforeHold {
                hold_id: hold.hold_id.clone(),
            });
        }

        hold.resume_timestamp = Some(resumed_at);
        hold.status = new_status;

        let duration = match hold.total_hold_duration_hours {
            Some(existing) => existing,
            None => {
                let computed = Self::elapsed_hours(hold.effective_start(), resumed_at);
                hold.total_hold_duration_hours = Some(computed);
                computed
            }
        };

        debug!(hold_id = %hold.hold_id, duration = %duration, status = %new_status, "保留已解除");
        Ok(duration)
    }

    /// 工单累计保留时长 (小时)
    ///
    /// - ON_HOLD: 从保留起点到 now 的实时时长
    /// - 其他状态: 使用已固化的 total_hold_duration_hours
    pub fn total_hold_duration_hours(
        holds: &[HoldRecord],
        work_order_id: &str,
        now: NaiveDateTime,
    ) -> Decimal {
        let total: Decimal = holds
            .iter()
            .filter(|h| h.work_order_id == work_order_id)
            .map(|h| {
                if h.status.is_active() {
                    Self::elapsed_hours(h.effective_start(), now)
                } else {
                    h.total_hold_duration_hours
                        .or_else(|| Self::resolve_hold_duration(h))
                        .unwrap_or(Decimal::ZERO)
                        .max(Decimal::ZERO)
                }
            })
            .sum();

        round2(total)
    }

    /// 调整后老化 (小时) = max(0, 原始老化 - 保留时长)
    pub fn adjusted_aging_hours(raw_age_hours: Decimal, total_hold_hours: Decimal) -> Decimal {
        round2((raw_age_hours - total_hold_hours).max(Decimal::ZERO))
    }

    /// 工单调整后老化 (小时): 从 started_at 到 now 扣除累计保留时长
    pub fn work_order_adjusted_aging(
        work_order_id: &str,
        started_at: NaiveDateTime,
        holds: &[HoldRecord],
        now: NaiveDateTime,
    ) -> Decimal {
        let raw = Self::elapsed_hours(started_at, now);
        let held = Self::total_hold_duration_hours(holds, work_order_id, now);
        Self::adjusted_aging_hours(raw, held)
    }

    // ==========================================
    // 慢性保留 / 解决率
    // ==========================================

    /// 慢性保留: hold_date <= as_of - threshold 的活动保留,最旧在前
    ///
    /// threshold 缺省为 2 × critical_threshold_days
    pub fn identify_chronic_holds(
        &self,
        holds: &[HoldRecord],
        threshold_days: Option<i64>,
        as_of: NaiveDate,
    ) -> Vec<HoldRecord> {
        let threshold = threshold_days.unwrap_or(self.thresholds.critical_threshold_days * 2);

        let mut chronic: Vec<HoldRecord> = holds
            .iter()
            .filter(|h| h.status.is_active())
            .filter(|h| (as_of - h.hold_date).num_days() >= threshold)
            .cloned()
            .collect();

        chronic.sort_by(|a, b| a.hold_date.cmp(&b.hold_date).then_with(|| a.hold_id.cmp(&b.hold_id)));
        chronic
    }

    /// 保留解决率: [from, to] 内开启的 RESUMED 保留中,在老化阈值内恢复的比例
    pub fn hold_resolution_summary(
        &self,
        holds: &[HoldRecord],
        from: NaiveDate,
        to: NaiveDate,
    ) -> HoldResolutionSummary {
        let threshold_hours = Decimal::from(self.thresholds.aging_threshold_days * 24);

        let resumed: Vec<&HoldRecord> = holds
            .iter()
            .filter(|h| h.status == HoldStatus::Resumed)
            .filter(|h| h.hold_date >= from && h.hold_date <= to)
            .collect();

        let within = resumed
            .iter()
            .filter(|h| match h.resume_timestamp {
                Some(resume) => {
                    (resume.date() - h.hold_date).num_days() <= self.thresholds.aging_threshold_days
                }
                None => h
                    .total_hold_duration_hours
                    .map_or(false, |hours| hours <= threshold_hours),
            })
            .count() as i64;

        let total = resumed.len() as i64;

        HoldResolutionSummary {
            total_resumed: total,
            resolved_within_threshold: within,
            resolution_rate: rate_percentage(within, total),
        }
    }

    fn elapsed_hours(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
        let seconds = (end - start).num_seconds().max(0);
        round2(Decimal::from(seconds) / SECONDS_PER_HOUR)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn as_of() -> NaiveDate {
        date(2026, 2, 1)
    }

    fn hold(id: &str, days_ago: i64, status: HoldStatus, quantity: i64) -> HoldRecord {
        let hold_date = as_of() - chrono::Duration::days(days_ago);
        HoldRecord {
            hold_id: id.to_string(),
            work_order_id: "WO-1".to_string(),
            hold_date,
            hold_timestamp: None,
            resume_timestamp: None,
            status,
            total_hold_duration_hours: None,
            quantity,
            hold_reason: None,
        }
    }

    #[test]
    fn test_bucket_labels_follow_thresholds() {
        let calc = WipAgingCalculator::default();
        let labels: Vec<String> = calc.empty_buckets().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["0-7", "8-14", "15-30", "30+"]);

        let calc = WipAgingCalculator::new(AgingThresholds {
            aging_threshold_days: 5,
            critical_threshold_days: 10,
        });
        let labels: Vec<String> = calc.empty_buckets().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["0-5", "6-10", "11-30", "30+"]);
    }

    #[test]
    fn test_bucket_boundaries() {
        let calc = WipAgingCalculator::default();
        let holds = vec![
            hold("H0", 0, HoldStatus::OnHold, 1),
            hold("H7", 7, HoldStatus::OnHold, 2),
            hold("H8", 8, HoldStatus::OnHold, 4),
            hold("H14", 14, HoldStatus::OnHold, 8),
            hold("H15", 15, HoldStatus::OnHold, 16),
            hold("H30", 30, HoldStatus::OnHold, 32),
            hold("H31", 31, HoldStatus::OnHold, 64),
            hold("R1", 40, HoldStatus::Resumed, 100),
        ];

        let result = calc.calculate_wip_aging(&holds, as_of());
        let counts: Vec<i64> = result.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 2, 1]);
        assert_eq!(result.bucket("30+").unwrap().quantity, 64);
        assert_eq!(result.bucket("0-7").unwrap().quantity, 3);
        assert_eq!(result.total_active_holds, 7);
        assert_eq!(result.bucketed_count(), result.total_active_holds);
        assert_eq!(result.flagged_aging_count, 5);
        assert_eq!(result.flagged_critical_count, 3);
        // (0+7+8+14+15+30+31) / 7 = 15
        assert_eq!(result.average_aging_days, dec!(15));
    }

    #[test]
    fn test_future_dated_hold_lands_in_first_bucket() {
        let calc = WipAgingCalculator::default();
        let result = calc.calculate_wip_aging(&[hold("F", -3, HoldStatus::OnHold, 1)], as_of());
        assert_eq!(result.buckets[0].count, 1);
        assert_eq!(result.bucketed_count(), 1);
    }

    #[test]
    fn test_empty_holds() {
        let result = WipAgingCalculator::default().calculate_wip_aging(&[], as_of());
        assert_eq!(result.total_active_holds, 0);
        assert_eq!(result.average_aging_days, Decimal::ZERO);
    }

    #[test]
    fn test_resume_fixes_duration_once() {
        let mut h = hold("H1", 2, HoldStatus::OnHold, 5);
        h.hold_timestamp = Some(h.hold_date.and_hms_opt(8, 0, 0).unwrap());
        let resumed_at = h.hold_date.and_hms_opt(20, 30, 0).unwrap();

        let duration =
            WipAgingCalculator::resolve_hold_on_resume(&mut h, resumed_at, HoldStatus::Resumed).unwrap();
        assert_eq!(duration, dec!(12.5));
        assert_eq!(h.total_hold_duration_hours, Some(dec!(12.5)));
        assert_eq!(h.status, HoldStatus::Resumed);

        let again = WipAgingCalculator::resolve_hold_on_resume(
            &mut h,
            resumed_at + chrono::Duration::hours(5),
            HoldStatus::Released,
        );
        assert!(matches!(again, Err(EngineError::InvalidHoldTransition { .. })));
        assert_eq!(h.total_hold_duration_hours, Some(dec!(12.5)));
    }

    #[test]
    fn test_resume_without_timestamp_uses_midnight() {
        let mut h = hold("H1", 1, HoldStatus::OnHold, 5);
        let resumed_at = h.hold_date.and_hms_opt(6, 0, 0).unwrap();
        let duration =
            WipAgingCalculator::resolve_hold_on_resume(&mut h, resumed_at, HoldStatus::Released).unwrap();
        assert_eq!(duration, dec!(6));
    }

    #[test]
    fn test_resume_rejects_invalid_target_and_time() {
        let mut h = hold("H1", 1, HoldStatus::OnHold, 5);
        let at = h.hold_date.and_hms_opt(6, 0, 0).unwrap();
        assert!(WipAgingCalculator::resolve_hold_on_resume(&mut h, at, HoldStatus::Cancelled).is_err());

        let before = h.hold_date.and_hms_opt(0, 0, 0).unwrap() - chrono::Duration::hours(1);
        assert!(matches!(
            WipAgingCalculator::resolve_hold_on_resume(&mut h, before, HoldStatus::Resumed),
            Err(EngineError::ResumeBeforeHold { .. })
        ));
        assert_eq!(h.status, HoldStatus::OnHold);
    }

    #[test]
    fn test_total_hold_duration_mixes_live_and_stored() {
        let now = as_of().and_hms_opt(12, 0, 0).unwrap();
        let mut active = hold("A", 1, HoldStatus::OnHold, 1);
        active.hold_timestamp = Some(now - chrono::Duration::hours(10));
        let mut resolved = hold("R", 5, HoldStatus::Resumed, 1);
        resolved.total_hold_duration_hours = Some(dec!(24));
        let mut other = hold("O", 5, HoldStatus::Resumed, 1);
        other.work_order_id = "WO-2".to_string();
        other.total_hold_duration_hours = Some(dec!(99));

        let total = WipAgingCalculator::total_hold_duration_hours(&[active, resolved, other], "WO-1", now);
        assert_eq!(total, dec!(34));
    }

    #[test]
    fn test_adjusted_aging_never_negative() {
        assert_eq!(WipAgingCalculator::adjusted_aging_hours(dec!(100), dec!(30)), dec!(70));
        assert_eq!(WipAgingCalculator::adjusted_aging_hours(dec!(10), dec!(30)), Decimal::ZERO);
    }

    #[test]
    fn test_work_order_adjusted_aging() {
        let now = as_of().and_hms_opt(0, 0, 0).unwrap();
        let started = now - chrono::Duration::hours(72);
        let mut resolved = hold("R", 2, HoldStatus::Released, 1);
        resolved.total_hold_duration_hours = Some(dec!(20));

        let adjusted = WipAgingCalculator::work_order_adjusted_aging("WO-1", started, &[resolved], now);
        assert_eq!(adjusted, dec!(52));
    }

    #[test]
    fn test_chronic_holds_sorted_oldest_first() {
        let calc = WipAgingCalculator::default();
        let holds = vec![
            hold("H30", 30, HoldStatus::OnHold, 1),
            hold("H45", 45, HoldStatus::OnHold, 1),
            hold("H28", 28, HoldStatus::OnHold, 1),
            hold("H27", 27, HoldStatus::OnHold, 1),
            hold("R90", 90, HoldStatus::Resumed, 1),
        ];

        let chronic = calc.identify_chronic_holds(&holds, None, as_of());
        let ids: Vec<&str> = chronic.iter().map(|h| h.hold_id.as_str()).collect();
        assert_eq!(ids, vec!["H45", "H30", "H28"]);

        let chronic = calc.identify_chronic_holds(&holds, Some(40), as_of());
        assert_eq!(chronic.len(), 1);
    }

    #[test]
    fn test_hold_resolution_summary() {
        let calc = WipAgingCalculator::default();
        let mut fast = hold("FAST", 20, HoldStatus::Resumed, 1);
        fast.resume_timestamp = Some((fast.hold_date + chrono::Duration::days(3)).and_hms_opt(9, 0, 0).unwrap());
        let mut slow = hold("SLOW", 20, HoldStatus::Resumed, 1);
        slow.resume_timestamp = Some((slow.hold_date + chrono::Duration::days(10)).and_hms_opt(9, 0, 0).unwrap());
        let mut legacy = hold("LEGACY", 15, HoldStatus::Resumed, 1);
        legacy.total_hold_duration_hours = Some(dec!(48));
        let out_of_window = hold("OLD", 90, HoldStatus::Resumed, 1);
        let still_open = hold("OPEN", 10, HoldStatus::OnHold, 1);

        let summary = calc.hold_resolution_summary(
            &[fast, slow, legacy, out_of_window, still_open],
            as_of() - chrono::Duration::days(30),
            as_of(),
        );
        assert_eq!(summary.total_resumed, 3);
        assert_eq!(summary.resolved_within_threshold, 2);
        assert_eq!(summary.resolution_rate, dec!(66.67));
    }
}
