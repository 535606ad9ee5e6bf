// ==========================================
// 制造运营平台 - 配置层
// ==========================================
// 职责: KPI 配置管理,支持客户级覆写
// 存储: 内存 key-value,JSON 快照加载/导出
// ==========================================

pub mod config_manager;
pub mod error;
pub mod kpi_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, ConfigScope};
pub use error::{ConfigError, ConfigResult};
pub use kpi_config_trait::KpiConfigReader;
