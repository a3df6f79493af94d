use crate::core::{
    log_ctx, PipelineState, PlayerConfig, Result, TrackCounts, TrackDescriptor, TrackKind,
};
use crate::player::engine::MediaEngine;
use crate::player::event_loop::EventSender;
use log::{debug, error, info, warn};
use parking_lot::Mutex;

/// 管线句柄 - 独占一个引擎实例
///
/// 所有引擎调用都经过同一把锁；shutdown() 之后引擎被释放，
/// 之后的任何调用都是带日志的空操作（供仍在运行的后台线程做存活检查）。
pub struct PipelineHandle {
    engine: Mutex<Option<Box<dyn MediaEngine>>>,
    target_state: Mutex<PipelineState>,
}

impl PipelineHandle {
    /// 创建并配置引擎；引擎创建失败是致命错误
    pub fn configure<F>(config: &PlayerConfig, factory: F) -> Result<Self>
    where
        F: FnOnce(&PlayerConfig) -> Result<Box<dyn MediaEngine>>,
    {
        info!("{} 🎬 创建播放管线: {}", log_ctx(), config.uri);
        let engine = factory(config)?;
        info!(
            "{} ✅ 管线配置完成: {} (latency {}ms, buffer {} bytes, ring-buffer {} bytes)",
            log_ctx(),
            engine.description(),
            config.latency_ms(),
            config.buffer_size,
            config.ring_buffer_max_size
        );

        Ok(Self {
            engine: Mutex::new(Some(engine)),
            target_state: Mutex::new(PipelineState::Null),
        })
    }

    /// 管线是否仍然存活（未 shutdown）
    pub fn is_alive(&self) -> bool {
        self.engine.lock().is_some()
    }

    /// 最近一次请求的目标状态
    pub fn target_state(&self) -> PipelineState {
        *self.target_state.lock()
    }

    /// 把引擎总线转发到事件循环
    pub fn attach(&self, sender: EventSender) -> Result<()> {
        match self.engine.lock().as_ref() {
            Some(engine) => engine.subscribe(sender),
            None => {
                warn!("{} 管线已释放，忽略监听注册", log_ctx());
                Ok(())
            }
        }
    }

    /// 请求进入 PLAYING；实际切换通过总线异步观察
    pub fn start(&self) {
        info!("{} ▶ Starting playback...", log_ctx());
        self.request_state(PipelineState::Playing);
    }

    pub fn set_active_audio_track(&self, index: u32) -> bool {
        self.set_active_track(TrackKind::Audio, index)
    }

    pub fn set_active_subtitle_track(&self, index: u32) -> bool {
        self.set_active_track(TrackKind::Subtitle, index)
    }

    /// 越界索引原样交给引擎处理
    pub fn set_active_track(&self, kind: TrackKind, index: u32) -> bool {
        let guard = self.engine.lock();
        let Some(engine) = guard.as_ref() else {
            warn!("{} 管线已释放，忽略切换 {} 轨道 #{}", log_ctx(), kind, index);
            return false;
        };

        match engine.set_current_track(kind, index) {
            Ok(()) => {
                info!("🎚 Switched to {} track #{}", kind, index);
                true
            }
            Err(e) => {
                error!("{} ❌ 切换 {} 轨道 #{} 失败: {}", log_ctx(), kind, index, e);
                false
            }
        }
    }

    /// 同步读取轨道数量；管线已释放时返回 None
    pub fn query_track_counts(&self) -> Option<TrackCounts> {
        self.engine.lock().as_ref().map(|engine| engine.track_counts())
    }

    pub fn query_track_language(&self, kind: TrackKind, index: u32) -> Option<String> {
        self.engine
            .lock()
            .as_ref()
            .and_then(|engine| engine.track_language(kind, index))
    }

    /// 某类轨道的完整描述
    pub fn describe_tracks(&self, kind: TrackKind, count: u32) -> Vec<TrackDescriptor> {
        (0..count)
            .map(|index| TrackDescriptor {
                kind,
                index,
                language: self.query_track_language(kind, index),
            })
            .collect()
    }

    /// 切到 NULL 并释放引擎；可重复调用，返回本次是否真正释放了资源
    pub fn shutdown(&self) -> bool {
        let Some(engine) = self.engine.lock().take() else {
            debug!("{} 管线已释放，跳过 shutdown", log_ctx());
            return false;
        };

        *self.target_state.lock() = PipelineState::Null;
        if let Err(e) = engine.set_state(PipelineState::Null) {
            error!("{} ❌ 切换到 NULL 失败: {}", log_ctx(), e);
        }
        drop(engine);
        info!("{} 🧹 管线已释放", log_ctx());
        true
    }

    fn request_state(&self, state: PipelineState) {
        let guard = self.engine.lock();
        let Some(engine) = guard.as_ref() else {
            warn!("Pipeline not initialized!");
            return;
        };

        *self.target_state.lock() = state;
        // 同步失败也会在总线上产生错误消息，由 EventBridge 处理
        if let Err(e) = engine.set_state(state) {
            warn!("{} ⚠ 状态切换请求失败: {}", log_ctx(), e);
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
