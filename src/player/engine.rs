use crate::core::{PipelineState, Result, TrackCounts, TrackKind};
use crate::player::event_loop::EventSender;

/// 媒体引擎抽象接口
///
/// 解复用、解码、缓冲、渲染全部由引擎内部完成，这里只暴露
/// 管线层面的控制：状态切换、轨道选择、轨道信息查询、通知订阅。
///
/// 实现必须保证属性读写可以从任意线程调用（GStreamer 的 GObject 属性满足这一点）。
/// PipelineHandle 另外用锁串行化所有调用。
pub trait MediaEngine: Send + Sync {
    /// 注册通知接收端，引擎的总线消息会被转发到事件循环
    fn subscribe(&self, sender: EventSender) -> Result<()>;

    /// 请求状态切换；实际结果通过 StateChanged 通知异步到达
    fn set_state(&self, state: PipelineState) -> Result<()>;

    /// 设置当前轨道（不做越界检查，由引擎决定行为）
    fn set_current_track(&self, kind: TrackKind, index: u32) -> Result<()>;

    /// 当前各类轨道数量；探测完成前可能为 0
    fn track_counts(&self) -> TrackCounts;

    /// 指定轨道的语言代码
    fn track_language(&self, kind: TrackKind, index: u32) -> Option<String>;

    /// 获取描述信息（用于调试）
    fn description(&self) -> String;
}

