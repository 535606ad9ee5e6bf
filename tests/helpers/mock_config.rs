// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use mfg_kpi_engine::config::{ConfigError, ConfigResult, KpiConfigReader};
use mfg_kpi_engine::domain::hold::{AgingThresholds, ClientKpiConfig};
use mfg_kpi_engine::engine::InferenceSettings;
use rust_decimal::Decimal;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub thresholds: AgingThresholds,
    pub target_absenteeism: Option<Decimal>,
    pub settings: InferenceSettings,
    pub opportunities_per_unit: i64,
    pub rty_stages: Vec<String>,
    /// 模拟配置值损坏
    pub broken: bool,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            thresholds: AgingThresholds::default(),
            target_absenteeism: None,
            settings: InferenceSettings::default(),
            opportunities_per_unit: 10,
            rty_stages: vec!["Incoming".to_string(), "In-Process".to_string(), "Final".to_string()],
            broken: false,
        }
    }

    /// 创建自定义老化阈值配置
    pub fn with_thresholds(aging: i64, critical: i64) -> Self {
        let mut config = Self::default();
        config.thresholds = AgingThresholds {
            aging_threshold_days: aging,
            critical_threshold_days: critical,
        };
        config
    }

    /// 创建损坏的配置
    pub fn broken() -> Self {
        let mut config = Self::default();
        config.broken = true;
        config
    }

    fn check(&self, key: &str) -> ConfigResult<()> {
        if self.broken {
            Err(ConfigError::invalid(key, "???", "mock broken"))
        } else {
            Ok(())
        }
    }
}

impl KpiConfigReader for MockConfig {
    fn get_client_config(&self, client_id: &str) -> ConfigResult<ClientKpiConfig> {
        self.check("client")?;
        Ok(ClientKpiConfig {
            client_id: client_id.to_string(),
            aging_threshold_days: self.thresholds.aging_threshold_days,
            critical_threshold_days: self.thresholds.critical_threshold_days,
            target_absenteeism: self.target_absenteeism,
        })
    }

    fn get_aging_thresholds(&self, _client_id: Option<&str>) -> ConfigResult<AgingThresholds> {
        self.check("aging_threshold_days")?;
        Ok(self.thresholds)
    }

    fn get_inference_settings(&self) -> ConfigResult<InferenceSettings> {
        self.check("default_cycle_time")?;
        Ok(self.settings.clone())
    }

    fn get_opportunities_per_unit(&self) -> ConfigResult<i64> {
        self.check("opportunities_per_unit")?;
        Ok(self.opportunities_per_unit)
    }

    fn get_rty_stages(&self) -> ConfigResult<Vec<String>> {
        self.check("rty_stages")?;
        Ok(self.rty_stages.clone())
    }
}
