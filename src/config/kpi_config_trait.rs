// ==========================================
// 制造运营平台 - KPI 配置读取 Trait
// ==========================================
// 职责: 定义计算引擎所需的配置读取接口 (不包含实现)
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::hold::{AgingThresholds, ClientKpiConfig};
use crate::engine::inference::InferenceSettings;

// ==========================================
// KpiConfigReader Trait
// ==========================================
// 用途: API 层与计算引擎所需的配置读取接口
// 实现者: ConfigManager (内存 key-value,客户级覆写全局)
pub trait KpiConfigReader: Send + Sync {
    // ===== 客户级配置 =====

    /// 获取客户 KPI 配置
    ///
    /// # 默认值
    /// - aging_threshold_days = 7
    /// - critical_threshold_days = 14
    /// - target_absenteeism = None
    fn get_client_config(&self, client_id: &str) -> ConfigResult<ClientKpiConfig>;

    /// 获取老化阈值 (client_id 为 None 时只读全局)
    ///
    /// # 校验
    /// - aging_threshold_days >= 0
    /// - critical_threshold_days >= aging_threshold_days
    fn get_aging_thresholds(&self, client_id: Option<&str>) -> ConfigResult<AgingThresholds>;

    // ===== 推断配置 =====

    /// 获取推断参数 (兜底周期时间、样本上限、历史窗口、置信度阈值)
    fn get_inference_settings(&self) -> ConfigResult<InferenceSettings>;

    // ===== 质量配置 =====

    /// 每件机会数 (DPMO 口径)
    ///
    /// # 默认值
    /// - 10
    fn get_opportunities_per_unit(&self) -> ConfigResult<i64>;

    /// RTY 检验工序列表 (按流转顺序)
    ///
    /// # 默认值
    /// - Incoming, In-Process, Final
    fn get_rty_stages(&self) -> ConfigResult<Vec<String>>;
}
