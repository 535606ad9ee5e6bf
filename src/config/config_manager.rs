// ==========================================
// 制造运营平台 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 内存 key-value (scope_id -> key -> value)
// 覆写: client/{client_id} 覆盖 global
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::kpi_config_trait::KpiConfigReader;
use crate::domain::hold::{
    AgingThresholds, ClientKpiConfig, DEFAULT_AGING_THRESHOLD_DAYS,
    DEFAULT_CRITICAL_THRESHOLD_DAYS,
};
use crate::domain::quality::DEFAULT_INSPECTION_STAGES;
use crate::engine::inference::InferenceSettings;
use crate::engine::quality_yield::DEFAULT_OPPORTUNITIES_PER_UNIT;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use std::sync::RwLock;
use tracing::{debug, info};

const GLOBAL_SCOPE_ID: &str = "global";
const CLIENT_SCOPE_PREFIX: &str = "client/";
const META_KEY_PREFIX: &str = "__meta_";

type ScopeMap = HashMap<String, HashMap<String, String>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Default)]
pub struct ConfigManager {
    entries: RwLock<ScopeMap>,
}

impl ConfigManager {
    /// 创建空配置 (所有读取均返回默认值)
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置快照创建
    ///
    /// # 快照格式
    /// ```json
    /// {
    ///   "global": { "default_cycle_time": "0.25" },
    ///   "client/ACME": { "aging_threshold_days": 5 }
    /// }
    /// ```
    /// 非字符串的标量/数组按 JSON 文本保存
    pub fn from_snapshot(snapshot_json: &str) -> ConfigResult<Self> {
        let manager = Self::new();
        manager.restore_config_from_snapshot(snapshot_json)?;
        Ok(manager)
    }

    /// 从 JSON 配置文件创建
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_snapshot(&raw)?;
        info!(path = %path.display(), "配置文件已加载");
        Ok(manager)
    }

    // ==========================================
    // 读写
    // ==========================================

    /// 写入配置值
    pub fn set_config_value(
        &self,
        scope: &ConfigScope,
        key: &str,
        value: impl Into<String>,
    ) -> ConfigResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        entries
            .entry(scope.scope_id())
            .or_default()
            .insert(key.to_string(), value.into());
        Ok(())
    }

    /// 删除配置值,返回是否存在
    pub fn remove_config_value(&self, scope: &ConfigScope, key: &str) -> ConfigResult<bool> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(entries
            .get_mut(&scope.scope_id())
            .and_then(|values| values.remove(key))
            .is_some())
    }

    /// 读取配置值: 客户级优先,缺失时回落全局
    pub fn get_config_value(&self, scope: &ConfigScope, key: &str) -> ConfigResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let lookup = |scope_id: &str| entries.get(scope_id).and_then(|v| v.get(key)).cloned();

        let value = match scope {
            ConfigScope::Global => lookup(GLOBAL_SCOPE_ID),
            ConfigScope::Client { .. } => {
                lookup(&scope.scope_id()).or_else(|| lookup(GLOBAL_SCOPE_ID))
            }
        };
        Ok(value)
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(&ConfigScope::Global, key)
    }

    /// 读取并解析配置值,缺失时使用默认值
    fn get_parsed_or<T>(&self, scope: &ConfigScope, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(scope, key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(key, &raw, e.to_string())),
            None => Ok(default),
        }
    }

    // ==========================================
    // 快照
    // ==========================================

    /// 获取所有配置的快照 (JSON,按 scope/key 排序)
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let entries = self
            .entries
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let ordered: BTreeMap<&String, BTreeMap<&String, &String>> = entries
            .iter()
            .map(|(scope_id, values)| (scope_id, values.iter().collect()))
            .collect();

        Ok(serde_json::to_string(&ordered)?)
    }

    /// 从配置快照恢复配置 (覆盖同名键,保留其他键)
    ///
    /// # 返回
    /// - 恢复的配置项数量 (跳过 `__meta_` 前缀的元信息)
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let parsed: HashMap<String, HashMap<String, Value>> = serde_json::from_str(snapshot_json)?;

        let mut entries = self
            .entries
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut count = 0;
        for (scope_id, values) in parsed {
            let scope_entries = entries.entry(scope_id).or_default();
            for (key, value) in values {
                if key.starts_with(META_KEY_PREFIX) {
                    continue;
                }
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                scope_entries.insert(key, text);
                count += 1;
            }
        }

        debug!(count, "配置快照已恢复");
        Ok(count)
    }
}

// ==========================================
// KpiConfigReader Trait 实现
// ==========================================
impl KpiConfigReader for ConfigManager {
    // ===== 客户级配置 =====

    fn get_client_config(&self, client_id: &str) -> ConfigResult<ClientKpiConfig> {
        let scope = ConfigScope::client(client_id);
        let thresholds = self.get_aging_thresholds(Some(client_id))?;

        let target_absenteeism = match self.get_config_value(&scope, config_keys::TARGET_ABSENTEEISM)? {
            Some(raw) => {
                let value = Decimal::from_str(raw.trim())
                    .map_err(|e| ConfigError::invalid(config_keys::TARGET_ABSENTEEISM, &raw, e.to_string()))?;
                if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                    return Err(ConfigError::invalid(
                        config_keys::TARGET_ABSENTEEISM,
                        &raw,
                        "超出 [0, 100] 范围",
                    ));
                }
                Some(value)
            }
            None => None,
        };

        Ok(ClientKpiConfig {
            client_id: client_id.to_string(),
            aging_threshold_days: thresholds.aging_threshold_days,
            critical_threshold_days: thresholds.critical_threshold_days,
            target_absenteeism,
        })
    }

    fn get_aging_thresholds(&self, client_id: Option<&str>) -> ConfigResult<AgingThresholds> {
        let scope = client_id.map(ConfigScope::client).unwrap_or(ConfigScope::Global);

        let aging = self.get_parsed_or(
            &scope,
            config_keys::AGING_THRESHOLD_DAYS,
            DEFAULT_AGING_THRESHOLD_DAYS,
        )?;
        let critical = self.get_parsed_or(
            &scope,
            config_keys::CRITICAL_THRESHOLD_DAYS,
            DEFAULT_CRITICAL_THRESHOLD_DAYS,
        )?;

        if aging < 0 {
            return Err(ConfigError::invalid(
                config_keys::AGING_THRESHOLD_DAYS,
                &aging.to_string(),
                "不能为负数",
            ));
        }
        if critical < aging {
            return Err(ConfigError::invalid(
                config_keys::CRITICAL_THRESHOLD_DAYS,
                &critical.to_string(),
                format!("不能小于老化阈值 {}", aging),
            ));
        }

        Ok(AgingThresholds {
            aging_threshold_days: aging,
            critical_threshold_days: critical,
        })
    }

    // ===== 推断配置 =====

    fn get_inference_settings(&self) -> ConfigResult<InferenceSettings> {
        let defaults = InferenceSettings::default();
        let scope = ConfigScope::Global;

        let default_cycle_time: Decimal =
            self.get_parsed_or(&scope, config_keys::DEFAULT_CYCLE_TIME, defaults.default_cycle_time)?;
        if default_cycle_time <= Decimal::ZERO {
            return Err(ConfigError::invalid(
                config_keys::DEFAULT_CYCLE_TIME,
                &default_cycle_time.to_string(),
                "必须大于 0",
            ));
        }

        let history_sample_limit: usize = self.get_parsed_or(
            &scope,
            config_keys::HISTORY_SAMPLE_LIMIT,
            defaults.history_sample_limit,
        )?;
        if history_sample_limit == 0 {
            return Err(ConfigError::invalid(config_keys::HISTORY_SAMPLE_LIMIT, "0", "必须大于 0"));
        }

        let historical_window_days: i64 = self.get_parsed_or(
            &scope,
            config_keys::HISTORICAL_WINDOW_DAYS,
            defaults.historical_window_days,
        )?;
        if historical_window_days <= 0 {
            return Err(ConfigError::invalid(
                config_keys::HISTORICAL_WINDOW_DAYS,
                &historical_window_days.to_string(),
                "必须大于 0",
            ));
        }

        let low_confidence_threshold: f64 = self.get_parsed_or(
            &scope,
            config_keys::LOW_CONFIDENCE_THRESHOLD,
            defaults.low_confidence_threshold,
        )?;
        if !(0.0..=1.0).contains(&low_confidence_threshold) {
            return Err(ConfigError::invalid(
                config_keys::LOW_CONFIDENCE_THRESHOLD,
                &low_confidence_threshold.to_string(),
                "超出 [0, 1] 范围",
            ));
        }

        Ok(InferenceSettings {
            default_cycle_time,
            history_sample_limit,
            historical_window_days,
            low_confidence_threshold,
        })
    }

    // ===== 质量配置 =====

    fn get_opportunities_per_unit(&self) -> ConfigResult<i64> {
        let value = self.get_parsed_or(
            &ConfigScope::Global,
            config_keys::OPPORTUNITIES_PER_UNIT,
            DEFAULT_OPPORTUNITIES_PER_UNIT,
        )?;
        if value <= 0 {
            return Err(ConfigError::invalid(
                config_keys::OPPORTUNITIES_PER_UNIT,
                &value.to_string(),
                "必须大于 0",
            ));
        }
        Ok(value)
    }

    fn get_rty_stages(&self) -> ConfigResult<Vec<String>> {
        let raw = match self.get_global_config_value(config_keys::RTY_STAGES)? {
            Some(raw) => raw,
            None => return Ok(default_rty_stages()),
        };

        // 支持 JSON 数组或逗号分隔
        let stages: Vec<String> = if raw.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<String>>(&raw)
                .map_err(|e| ConfigError::invalid(config_keys::RTY_STAGES, &raw, e.to_string()))?
        } else {
            raw.split(',').map(|s| s.to_string()).collect()
        };

        let stages: Vec<String> = stages
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if stages.is_empty() {
            Ok(default_rty_stages())
        } else {
            Ok(stages)
        }
    }
}

fn default_rty_stages() -> Vec<String> {
    DEFAULT_INSPECTION_STAGES.iter().map(|s| s.to_string()).collect()
}

// ==========================================
// ConfigScope - 配置作用域
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigScope {
    Global,                        // 全局
    Client { client_id: String },  // 客户
}

impl ConfigScope {
    pub fn client(client_id: &str) -> Self {
        ConfigScope::Client {
            client_id: client_id.to_string(),
        }
    }

    /// 快照中的 scope 键
    pub fn scope_id(&self) -> String {
        match self {
            ConfigScope::Global => GLOBAL_SCOPE_ID.to_string(),
            ConfigScope::Client { client_id } => format!("{}{}", CLIENT_SCOPE_PREFIX, client_id),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 在制品老化 (可按客户覆写)
    pub const AGING_THRESHOLD_DAYS: &str = "aging_threshold_days";
    pub const CRITICAL_THRESHOLD_DAYS: &str = "critical_threshold_days";

    // 出勤 (可按客户覆写)
    pub const TARGET_ABSENTEEISM: &str = "target_absenteeism";

    // 标准值推断
    pub const DEFAULT_CYCLE_TIME: &str = "default_cycle_time";
    pub const HISTORY_SAMPLE_LIMIT: &str = "history_sample_limit";
    pub const HISTORICAL_WINDOW_DAYS: &str = "historical_window_days";
    pub const LOW_CONFIDENCE_THRESHOLD: &str = "low_confidence_threshold";

    // 质量
    pub const OPPORTUNITIES_PER_UNIT: &str = "opportunities_per_unit";
    pub const RTY_STAGES: &str = "rty_stages"; // JSON 数组或逗号分隔
}
