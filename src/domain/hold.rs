// ==========================================
// 制造运营平台 - 在制品保留领域模型
// ==========================================
// 职责: 保留记录 + 客户级老化阈值
// 生命周期: 暂停生产时创建,恢复/释放时修改一次,只做软删除
// ==========================================

use crate::domain::types::HoldStatus;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 默认老化阈值 (天)
pub const DEFAULT_AGING_THRESHOLD_DAYS: i64 = 7;
/// 默认严重老化阈值 (天)
pub const DEFAULT_CRITICAL_THRESHOLD_DAYS: i64 = 14;

// ==========================================
// HoldRecord - 保留记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldRecord {
    pub hold_id: String,
    pub work_order_id: String,
    pub hold_date: NaiveDate,
    /// 精确保留时间 (旧数据可能缺失)
    pub hold_timestamp: Option<NaiveDateTime>,
    pub resume_timestamp: Option<NaiveDateTime>,
    pub status: HoldStatus,
    /// 保留时长 (小时),恢复/释放时计算一次后不再重算
    pub total_hold_duration_hours: Option<Decimal>,
    /// 保留件数
    pub quantity: i64,
    pub hold_reason: Option<String>,
}

impl HoldRecord {
    /// 保留起点: hold_timestamp,缺失时取 hold_date 零点
    pub fn effective_start(&self) -> NaiveDateTime {
        self.hold_timestamp
            .unwrap_or_else(|| self.hold_date.and_time(NaiveTime::MIN))
    }
}

// ==========================================
// AgingThresholds - 老化阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingThresholds {
    pub aging_threshold_days: i64,
    pub critical_threshold_days: i64,
}

impl Default for AgingThresholds {
    fn default() -> Self {
        Self {
            aging_threshold_days: DEFAULT_AGING_THRESHOLD_DAYS,
            critical_threshold_days: DEFAULT_CRITICAL_THRESHOLD_DAYS,
        }
    }
}

impl AgingThresholds {
    /// 从客户配置解析,无配置时使用默认值
    pub fn resolve(client_config: Option<&ClientKpiConfig>) -> Self {
        client_config
            .map(|c| c.aging_thresholds())
            .unwrap_or_default()
    }
}

// ==========================================
// ClientKpiConfig - 客户级 KPI 配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientKpiConfig {
    pub client_id: String,
    pub aging_threshold_days: i64,
    pub critical_threshold_days: i64,
    /// 目标缺勤率 (%)
    pub target_absenteeism: Option<Decimal>,
}

impl ClientKpiConfig {
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            aging_threshold_days: DEFAULT_AGING_THRESHOLD_DAYS,
            critical_threshold_days: DEFAULT_CRITICAL_THRESHOLD_DAYS,
            target_absenteeism: None,
        }
    }

    pub fn aging_thresholds(&self) -> AgingThresholds {
        AgingThresholds {
            aging_threshold_days: self.aging_threshold_days,
            critical_threshold_days: self.critical_threshold_days,
        }
    }
}
