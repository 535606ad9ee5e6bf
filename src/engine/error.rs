// ==========================================
// 制造运营平台 - 引擎层错误类型
// ==========================================
// 说明: 公式计算本身不报错 (分母为 0、缺失标准都有确定结果),
//       只有状态写入类操作会返回错误
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("无效的保留状态转换: hold_id={hold_id}, from={from} to={to}")]
    InvalidHoldTransition {
        hold_id: String,
        from: String,
        to: String,
    },

    #[error("恢复时间早于保留时间: hold_id={hold_id}")]
    ResumeBeforeHold { hold_id: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
