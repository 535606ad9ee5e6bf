// ==========================================
// 制造运营平台 - 生产历史仓储
// ==========================================
// 职责: 为推断引擎提供有界的历史样本读取
// 红线: 数据已按租户过滤,仓储不做租户判断
// ==========================================

use crate::domain::production::{AttendanceRecord, ProductionRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use std::sync::RwLock;

/// 每个推断层级最多读取的历史样本数
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

// ==========================================
// HistoryQuery - 历史查询条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub product_id: Option<String>,
    pub shift_id: Option<String>,
    /// 窗口起点 (含),None 表示不限
    pub from: Option<NaiveDate>,
    /// 窗口终点 (含)
    pub to: NaiveDate,
    /// 排除的记录 (避免自引用)
    pub exclude_entry_id: Option<String>,
    /// 仅返回有产出且有人员的记录
    pub require_output: bool,
    pub limit: usize,
}

impl HistoryQuery {
    /// 截止到指定日期的查询 (默认上限 10 条)
    pub fn until(to: NaiveDate) -> Self {
        Self {
            product_id: None,
            shift_id: None,
            from: None,
            to,
            exclude_entry_id: None,
            require_output: true,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn for_product(mut self, product_id: &str) -> Self {
        self.product_id = Some(product_id.to_string());
        self
    }

    pub fn for_shift(mut self, shift_id: &str) -> Self {
        self.shift_id = Some(shift_id.to_string());
        self
    }

    pub fn since(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn excluding(mut self, entry_id: Option<&str>) -> Self {
        self.exclude_entry_id = entry_id.map(|s| s.to_string());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 判断记录是否命中查询条件 (不含 limit)
    pub fn matches(&self, record: &ProductionRecord) -> bool {
        if let Some(product_id) = &self.product_id {
            if &record.product_id != product_id {
                return false;
            }
        }
        if let Some(shift_id) = &self.shift_id {
            if record.shift_id.as_deref() != Some(shift_id.as_str()) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.production_date < from {
                return false;
            }
        }
        if record.production_date > self.to {
            return false;
        }
        if let Some(excluded) = &self.exclude_entry_id {
            if &record.entry_id == excluded {
                return false;
            }
        }
        if self.require_output && (record.units_produced <= 0 || record.employees_assigned <= 0) {
            return false;
        }
        true
    }
}

// ==========================================
// ProductionHistoryRepository - 历史数据访问接口
// ==========================================
// 实现者: 宿主系统的持久层 (已按租户过滤)
pub trait ProductionHistoryRepository: Send + Sync {
    /// 查询生产历史,按生产日期降序 (最新在前),最多 query.limit 条
    fn find_production_history(&self, query: &HistoryQuery) -> RepositoryResult<Vec<ProductionRecord>>;

    /// 查询 [from, to] 窗口内的出勤记录,最新在前
    fn find_attendance_history(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: usize,
    ) -> RepositoryResult<Vec<AttendanceRecord>>;
}

// ==========================================
// InMemoryProductionHistory - 内存实现
// ==========================================
// 用于调用方已持有记录的场景 (批处理任务、测试)
#[derive(Debug, Default)]
pub struct InMemoryProductionHistory {
    records: RwLock<Vec<ProductionRecord>>,
    attendance: RwLock<Vec<AttendanceRecord>>,
}

impl InMemoryProductionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ProductionRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            attendance: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, record: ProductionRecord) -> RepositoryResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        records.push(record);
        Ok(())
    }

    pub fn insert_attendance(&self, record: AttendanceRecord) -> RepositoryResult<()> {
        let mut attendance = self
            .attendance
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        attendance.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProductionHistoryRepository for InMemoryProductionHistory {
    fn find_production_history(&self, query: &HistoryQuery) -> RepositoryResult<Vec<ProductionRecord>> {
        if let Some(from) = query.from {
            if from > query.to {
                return Err(RepositoryError::InvalidWindow {
                    from: from.to_string(),
                    to: query.to.to_string(),
                });
            }
        }

        let records = self
            .records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut matched: Vec<ProductionRecord> = records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        // 最新在前 (稳定排序,同日保持插入顺序)
        matched.sort_by(|a, b| b.production_date.cmp(&a.production_date));
        matched.truncate(query.limit);

        Ok(matched)
    }

    fn find_attendance_history(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: usize,
    ) -> RepositoryResult<Vec<AttendanceRecord>> {
        if from > to {
            return Err(RepositoryError::InvalidWindow {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let attendance = self
            .attendance
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut matched: Vec<AttendanceRecord> = attendance
            .iter()
            .filter(|a| a.record_date >= from && a.record_date <= to)
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.record_date.cmp(&a.record_date));
        matched.truncate(limit);

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn record(entry_id: &str, product_id: &str, shift_id: &str, day: u32, units: i64) -> ProductionRecord {
        ProductionRecord {
            entry_id: entry_id.to_string(),
            product_id: product_id.to_string(),
            shift_id: Some(shift_id.to_string()),
            production_date: date(day),
            units_produced: units,
            employees_assigned: 4,
            run_time_hours: dec!(8),
            defect_count: 0,
            scrap_count: 0,
            efficiency_percentage: None,
            performance_percentage: None,
        }
    }

    #[test]
    fn test_filters_product_shift_and_window() {
        let repo = InMemoryProductionHistory::with_records(vec![
            record("E1", "P1", "DAY", 5, 100),
            record("E2", "P1", "NIGHT", 6, 100),
            record("E3", "P2", "DAY", 7, 100),
            record("E4", "P1", "DAY", 20, 100),
        ]);

        let query = HistoryQuery::until(date(10)).for_product("P1").for_shift("DAY");
        let found = repo.find_production_history(&query).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entry_id, "E1");
    }

    #[test]
    fn test_excludes_current_entry_and_zero_output() {
        let repo = InMemoryProductionHistory::with_records(vec![
            record("E1", "P1", "DAY", 5, 100),
            record("E2", "P1", "DAY", 6, 0),
            record("E3", "P1", "DAY", 7, 100),
        ]);

        let query = HistoryQuery::until(date(10)).for_product("P1").excluding(Some("E3"));
        let found = repo.find_production_history(&query).unwrap();
        let ids: Vec<&str> = found.iter().map(|r| r.entry_id.as_str()).collect();
        assert_eq!(ids, vec!["E1"]);
    }

    #[test]
    fn test_newest_first_and_limit() {
        let repo = InMemoryProductionHistory::new();
        for day in 1..=15 {
            repo.insert(record(&format!("E{}", day), "P1", "DAY", day, 10)).unwrap();
        }

        let found = repo
            .find_production_history(&HistoryQuery::until(date(31)))
            .unwrap();
        assert_eq!(found.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(found[0].entry_id, "E15");
        assert_eq!(found[9].entry_id, "E6");
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let repo = InMemoryProductionHistory::new();
        let query = HistoryQuery::until(date(1)).since(date(5));
        let err = repo.find_production_history(&query).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidWindow { .. }));
    }
}
