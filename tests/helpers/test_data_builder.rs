// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use mfg_kpi_engine::domain::hold::HoldRecord;
use mfg_kpi_engine::domain::production::ProductionRecord;
use mfg_kpi_engine::domain::quality::QualityInspectionRecord;
use mfg_kpi_engine::domain::types::HoldStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 基准日期: 2026-03-15
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

pub fn days_ago(n: i64) -> NaiveDate {
    as_of() - chrono::Duration::days(n)
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

// ==========================================
// ProductionRecord 构建器
// ==========================================

pub struct ProductionRecordBuilder {
    record: ProductionRecord,
}

impl ProductionRecordBuilder {
    pub fn new(entry_id: &str, product_id: &str) -> Self {
        Self {
            record: ProductionRecord {
                entry_id: entry_id.to_string(),
                product_id: product_id.to_string(),
                shift_id: None,
                production_date: as_of(),
                units_produced: 100,
                employees_assigned: 5,
                run_time_hours: dec!(8),
                defect_count: 0,
                scrap_count: 0,
                efficiency_percentage: None,
                performance_percentage: None,
            },
        }
    }

    pub fn shift(mut self, shift_id: &str) -> Self {
        self.record.shift_id = Some(shift_id.to_string());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.record.production_date = date;
        self
    }

    pub fn units(mut self, units: i64) -> Self {
        self.record.units_produced = units;
        self
    }

    pub fn employees(mut self, employees: i64) -> Self {
        self.record.employees_assigned = employees;
        self
    }

    pub fn run_time(mut self, hours: Decimal) -> Self {
        self.record.run_time_hours = hours;
        self
    }

    pub fn defects(mut self, defects: i64, scrap: i64) -> Self {
        self.record.defect_count = defects;
        self.record.scrap_count = scrap;
        self
    }

    pub fn build(self) -> ProductionRecord {
        self.record
    }
}

// ==========================================
// QualityInspectionRecord 构建器
// ==========================================

pub struct InspectionBuilder {
    record: QualityInspectionRecord,
}

impl InspectionBuilder {
    /// 默认全部合格
    pub fn new(inspection_id: &str, stage: &str, inspected: i64) -> Self {
        Self {
            record: QualityInspectionRecord {
                inspection_id: inspection_id.to_string(),
                product_id: "P001".to_string(),
                inspection_date: as_of(),
                inspection_stage: stage.to_string(),
                units_inspected: inspected,
                units_passed: inspected,
                units_defective: 0,
                units_scrapped: 0,
                units_reworked: 0,
                units_requiring_repair: 0,
            },
        }
    }

    /// 设置不合格数 (合格数 = 检验数 - 不合格数)
    pub fn defective(mut self, defective: i64) -> Self {
        self.record.units_defective = defective;
        self.record.units_passed = self.record.units_inspected - defective;
        self
    }

    pub fn passed(mut self, passed: i64) -> Self {
        self.record.units_passed = passed;
        self
    }

    pub fn scrapped(mut self, scrapped: i64) -> Self {
        self.record.units_scrapped = scrapped;
        self
    }

    pub fn reworked(mut self, reworked: i64, repair: i64) -> Self {
        self.record.units_reworked = reworked;
        self.record.units_requiring_repair = repair;
        self
    }

    pub fn build(self) -> QualityInspectionRecord {
        self.record
    }
}

// ==========================================
// HoldRecord 构建器
// ==========================================

pub struct HoldBuilder {
    record: HoldRecord,
}

impl HoldBuilder {
    pub fn new(hold_id: &str, work_order_id: &str) -> Self {
        Self {
            record: HoldRecord {
                hold_id: hold_id.to_string(),
                work_order_id: work_order_id.to_string(),
                hold_date: as_of(),
                hold_timestamp: None,
                resume_timestamp: None,
                status: HoldStatus::OnHold,
                total_hold_duration_hours: None,
                quantity: 10,
                hold_reason: None,
            },
        }
    }

    pub fn held_days_ago(mut self, days: i64) -> Self {
        self.record.hold_date = days_ago(days);
        self
    }

    pub fn held_at(mut self, timestamp: NaiveDateTime) -> Self {
        self.record.hold_date = timestamp.date();
        self.record.hold_timestamp = Some(timestamp);
        self
    }

    pub fn resumed_at(mut self, timestamp: NaiveDateTime) -> Self {
        self.record.resume_timestamp = Some(timestamp);
        self.record.status = HoldStatus::Resumed;
        self
    }

    pub fn status(mut self, status: HoldStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn duration_hours(mut self, hours: Decimal) -> Self {
        self.record.total_hold_duration_hours = Some(hours);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.record.quantity = quantity;
        self
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.record.hold_reason = Some(reason.to_string());
        self
    }

    pub fn build(self) -> HoldRecord {
        self.record
    }
}
