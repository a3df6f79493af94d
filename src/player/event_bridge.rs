use crate::core::{EventOrigin, PipelineState, PlaybackOutcome, PlayerEvent};
use crate::player::event_loop::EventListener;
use log::{debug, error, info, warn};
use std::ops::ControlFlow;

/// 总线消息桥 - 把引擎通知转成日志 / 退出请求
///
/// 只读：从不修改管线配置。
#[derive(Debug, Default)]
pub struct EventBridge {
    observed_state: Option<PipelineState>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次观察到的顶层管线状态
    pub fn observed_state(&self) -> Option<PipelineState> {
        self.observed_state
    }
}

impl EventListener for EventBridge {
    fn on_event(&mut self, event: PlayerEvent) -> ControlFlow<PlaybackOutcome> {
        match event {
            PlayerEvent::Error {
                source,
                message,
                debug,
            } => {
                error!(
                    "❌ PLAYER ERROR ({}): {} | Debug: {}",
                    source.as_deref().unwrap_or("unknown"),
                    message,
                    debug.as_deref().unwrap_or("No debug info")
                );
                ControlFlow::Break(PlaybackOutcome::Error { message })
            }
            PlayerEvent::EndOfStream => {
                info!("🏁 End of Stream reached");
                ControlFlow::Break(PlaybackOutcome::EndOfStream)
            }
            PlayerEvent::StateChanged {
                origin: EventOrigin::Pipeline,
                old,
                current,
                pending,
            } => {
                match pending {
                    Some(pending) => info!("🔄 State: {} -> {} (pending {})", old, current, pending),
                    None => info!("🔄 State: {} -> {}", old, current),
                }
                self.observed_state = Some(current);
                ControlFlow::Continue(())
            }
            PlayerEvent::Warning {
                source,
                message,
                debug,
            } => {
                warn!(
                    "⚠ 管线警告 ({}): {} | Debug: {}",
                    source.as_deref().unwrap_or("unknown"),
                    message,
                    debug.as_deref().unwrap_or("No debug info")
                );
                ControlFlow::Continue(())
            }
            PlayerEvent::Buffering { percent } => {
                debug!("缓冲中: {}%", percent);
                ControlFlow::Continue(())
            }
            // 子元素的状态变化与其他消息忽略
            PlayerEvent::StateChanged { .. } | PlayerEvent::Other(_) => ControlFlow::Continue(()),
        }
    }
}
