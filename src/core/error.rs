use crate::core::PipelineState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("媒体引擎初始化失败: {0}")]
    EngineInit(String),

    #[error("无法创建元素: {0}")]
    ElementCreation(String),

    #[error("状态切换失败 (目标 {target}): {reason}")]
    StateChange {
        target: PipelineState,
        reason: String,
    },

    #[error("属性设置失败: {0}")]
    Property(String),

    #[error("生命周期状态错误: 期望 {expected:?}, 实际 {actual:?}")]
    Lifecycle {
        expected: crate::core::LifecycleState,
        actual: crate::core::LifecycleState,
    },

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("其他错误: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
