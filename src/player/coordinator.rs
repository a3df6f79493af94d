use crate::core::{
    log_ctx, LifecycleState, PlaybackOutcome, PlayerConfig, PlayerError, Result, ShutdownSignal,
};
use crate::player::command::{CommandInterpreter, InterpreterExit};
use crate::player::engine::MediaEngine;
use crate::player::event_bridge::EventBridge;
use crate::player::event_loop::EventLoop;
use crate::player::pipeline::PipelineHandle;
use crate::player::track_inspector::{TrackInspector, TrackReport};
use log::{debug, info, warn};
use std::io::BufRead;
use std::sync::Arc;
use std::thread::JoinHandle;

/// 生命周期协调器 - 整体控制播放流程
///
/// Uninitialized -> Configured -> Playing -> Stopped
pub struct LifecycleCoordinator {
    config: PlayerConfig,
    state: LifecycleState,
    pipeline: Option<Arc<PipelineHandle>>,
    event_loop: Option<EventLoop>,
    shutdown: ShutdownSignal,
    interpreter_thread: Option<JoinHandle<InterpreterExit>>,
    inspector_thread: Option<JoinHandle<Option<TrackReport>>>,
}

impl LifecycleCoordinator {
    pub fn new(config: PlayerConfig) -> Self {
        info!("{} 🎬 播放器初始化: {}", log_ctx(), config.uri);
        Self {
            config,
            state: LifecycleState::Uninitialized,
            pipeline: None,
            event_loop: None,
            shutdown: ShutdownSignal::new(),
            interpreter_thread: None,
            inspector_thread: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// 创建管线与事件循环，并把总线接到 EventBridge
    pub fn configure<F>(&mut self, factory: F) -> Result<()>
    where
        F: FnOnce(&PlayerConfig) -> Result<Box<dyn MediaEngine>>,
    {
        self.expect_state(LifecycleState::Uninitialized)?;

        let pipeline = PipelineHandle::configure(&self.config, factory)?;
        let event_loop = EventLoop::new();
        pipeline.attach(event_loop.sender())?;

        self.pipeline = Some(Arc::new(pipeline));
        self.event_loop = Some(event_loop);
        self.state = LifecycleState::Configured;
        info!("{} ✅ Player setup complete. Ready to play!", log_ctx());
        Ok(())
    }

    /// 开始播放并阻塞在事件循环上，返回后已完成清理
    pub fn play<R>(&mut self, input: R) -> Result<PlaybackOutcome>
    where
        R: BufRead + Send + 'static,
    {
        self.expect_state(LifecycleState::Configured)?;
        let (Some(pipeline), Some(event_loop)) = (self.pipeline.clone(), self.event_loop.take())
        else {
            return Err(PlayerError::Other("管线未初始化".into()));
        };

        pipeline.start();
        self.state = LifecycleState::Playing;

        if let Err(e) = self.spawn_workers(Arc::clone(&pipeline), &event_loop, input) {
            self.teardown();
            return Err(e);
        }

        let mut bridge = EventBridge::new();
        let outcome = event_loop.run(&mut bridge);
        debug!(
            "{} 管线目标状态 {}，最后观察到 {:?}",
            log_ctx(),
            pipeline.target_state(),
            bridge.observed_state()
        );
        drop(pipeline);

        self.teardown();
        Ok(outcome)
    }

    /// 启动流信息探测与命令解释器线程
    fn spawn_workers<R>(
        &mut self,
        pipeline: Arc<PipelineHandle>,
        event_loop: &EventLoop,
        input: R,
    ) -> Result<()>
    where
        R: BufRead + Send + 'static,
    {
        let inspector = TrackInspector::new(
            Arc::clone(&pipeline),
            self.shutdown.clone(),
            self.config.discovery_delay,
        );
        self.inspector_thread = Some(inspector.spawn()?);

        let interpreter =
            CommandInterpreter::new(pipeline, event_loop.quitter(), self.shutdown.clone());
        self.interpreter_thread = Some(interpreter.spawn(input)?);
        Ok(())
    }

    /// 停止后台线程并释放管线；可重复调用，也可在部分初始化时调用
    pub fn teardown(&mut self) {
        if self.state == LifecycleState::Stopped {
            return;
        }

        debug!("{} 开始清理 (当前状态 {:?})", log_ctx(), self.state);
        self.shutdown.trigger();

        if let Some(handle) = self.interpreter_thread.take() {
            match handle.join() {
                Ok(exit) => debug!("{} 命令线程已结束: {:?}", log_ctx(), exit),
                Err(_) => warn!("{} ⚠ 命令线程 panic", log_ctx()),
            }
        }
        if let Some(handle) = self.inspector_thread.take() {
            if handle.join().is_err() {
                warn!("{} ⚠ 流信息探测线程 panic", log_ctx());
            }
        }

        if let Some(pipeline) = self.pipeline.take() {
            pipeline.shutdown();
        }
        self.event_loop.take();

        self.state = LifecycleState::Stopped;
        info!("{} 🧹 Cleanup complete", log_ctx());
    }

    fn expect_state(&self, expected: LifecycleState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PlayerError::Lifecycle {
                expected,
                actual: self.state,
            })
        }
    }
}

impl Drop for LifecycleCoordinator {
    fn drop(&mut self) {
        self.teardown();
    }
}
