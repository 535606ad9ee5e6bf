// ==========================================
// 制造运营平台 - 生产领域模型
// ==========================================
// 职责: 产品标准、班次定义、生产记录、出勤记录
// 说明: 核心只读这些实体,缓存字段由调用方回写
// ==========================================

use chrono::{NaiveDate, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 一天的分钟数
pub const MINUTES_PER_DAY: i64 = 1440;

// ==========================================
// ProductStandard - 产品标准
// ==========================================
// 归属: 产品目录管理,核心只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStandard {
    pub product_id: String,
    /// 产品名称 (行业默认值按名称子串匹配)
    pub product_name: String,
    /// 理想周期时间 (小时/件),None 时触发推断
    pub ideal_cycle_time: Option<Decimal>,
    /// 目标 OEE (%)
    pub target_oee: Option<Decimal>,
    /// 目标 PPM
    pub target_ppm: Option<Decimal>,
}

impl ProductStandard {
    pub fn new(product_id: &str, product_name: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            ideal_cycle_time: None,
            target_oee: None,
            target_ppm: None,
        }
    }

    pub fn with_cycle_time(mut self, hours_per_unit: Decimal) -> Self {
        self.ideal_cycle_time = Some(hours_per_unit);
        self
    }
}

// ==========================================
// ShiftDefinition - 班次定义
// ==========================================
// 允许跨午夜 (例如 23:00 -> 07:00)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    pub shift_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ShiftDefinition {
    pub fn new(shift_id: &str, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            shift_id: shift_id.to_string(),
            start_time,
            end_time,
        }
    }

    /// 计划分钟数
    ///
    /// - end >= start: end - start
    /// - end < start (跨午夜): (1440 - start) + end
    pub fn scheduled_minutes(&self) -> i64 {
        let start = minutes_of_day(self.start_time);
        let end = minutes_of_day(self.end_time);

        if end >= start {
            end - start
        } else {
            (MINUTES_PER_DAY - start) + end
        }
    }

    /// 计划小时数
    pub fn scheduled_hours(&self) -> Decimal {
        Decimal::from(self.scheduled_minutes()) / Decimal::from(60)
    }
}

fn minutes_of_day(t: NaiveTime) -> i64 {
    (t.num_seconds_from_midnight() / 60) as i64
}

// ==========================================
// ProductionRecord - 生产记录
// ==========================================
// 班次录入时创建,核心不修改
// efficiency_percentage / performance_percentage 为缓存字段,由调用方回写
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub entry_id: String,
    pub product_id: String,
    pub shift_id: Option<String>,
    pub production_date: NaiveDate,
    pub units_produced: i64,
    pub employees_assigned: i64,
    pub run_time_hours: Decimal,
    pub defect_count: i64,
    pub scrap_count: i64,
    pub efficiency_percentage: Option<Decimal>,
    pub performance_percentage: Option<Decimal>,
}

impl ProductionRecord {
    /// 单件周期时间样本 (run_time_hours / units_produced)
    ///
    /// 无效样本返回 None:
    /// - units_produced <= 0
    /// - employees_assigned <= 0
    /// - run_time_hours <= 0
    pub fn cycle_time_sample(&self) -> Option<Decimal> {
        if self.units_produced <= 0 || self.employees_assigned <= 0 {
            return None;
        }
        if self.run_time_hours <= Decimal::ZERO {
            return None;
        }
        Some(self.run_time_hours / Decimal::from(self.units_produced))
    }

    /// OEE 历史样本 (efficiency% × performance% / 100)
    ///
    /// 仅当两个缓存字段都已回写时有效
    pub fn oee_sample(&self) -> Option<Decimal> {
        match (self.efficiency_percentage, self.performance_percentage) {
            (Some(eff), Some(perf)) => Some(eff * perf / Decimal::ONE_HUNDRED),
            _ => None,
        }
    }
}

// ==========================================
// AttendanceRecord - 出勤记录
// ==========================================
// 目标缺勤率推断的历史数据来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub record_date: NaiveDate,
    pub scheduled_hours: Decimal,
    pub absent_hours: Decimal,
}

impl AttendanceRecord {
    /// 缺勤率样本 (%),计划工时为 0 时无效
    pub fn absenteeism_sample(&self) -> Option<Decimal> {
        if self.scheduled_hours <= Decimal::ZERO || self.absent_hours < Decimal::ZERO {
            return None;
        }
        Some(self.absent_hours / self.scheduled_hours * Decimal::ONE_HUNDRED)
    }
}
