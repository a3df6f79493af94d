//! 测试用引擎：记录所有控制调用，按配置模拟总线通知

use crate::core::{
    EventOrigin, PipelineState, PlayerConfig, PlayerEvent, Result, TrackCounts, TrackKind,
};
use crate::player::engine::MediaEngine;
use crate::player::event_loop::EventSender;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    SetState(PipelineState),
    SetTrack(TrackKind, u32),
    Released,
}

#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    pub counts: TrackCounts,
    pub languages: HashMap<(TrackKind, u32), String>,
    /// 进入 PLAYING 时在总线上投递错误（模拟无法解析的 URL）
    pub error_on_play: Option<String>,
    /// 进入 PLAYING 时投递 EOS
    pub eos_on_play: bool,
}

/// 测试侧观察句柄
#[derive(Clone, Default)]
pub struct MockProbe {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    sender: Arc<Mutex<Option<EventSender>>>,
    created: Arc<Mutex<u32>>,
}

impl MockProbe {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    pub fn release_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| **call == EngineCall::Released)
            .count()
    }

    pub fn created_count(&self) -> u32 {
        *self.created.lock()
    }

    pub fn is_subscribed(&self) -> bool {
        self.sender.lock().is_some()
    }

    pub fn emit(&self, event: PlayerEvent) -> bool {
        self.sender
            .lock()
            .as_ref()
            .map(|sender| sender.post(event))
            .unwrap_or(false)
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }
}

pub struct MockEngine {
    behavior: MockBehavior,
    probe: MockProbe,
}

impl MockEngine {
    /// 返回可交给 PipelineHandle::configure 的构造函数
    pub fn factory(
        behavior: MockBehavior,
    ) -> (
        impl FnOnce(&PlayerConfig) -> Result<Box<dyn MediaEngine>>,
        MockProbe,
    ) {
        let probe = MockProbe::default();
        let factory_probe = probe.clone();
        let factory = move |_config: &PlayerConfig| -> Result<Box<dyn MediaEngine>> {
            *factory_probe.created.lock() += 1;
            Ok(Box::new(MockEngine {
                behavior,
                probe: factory_probe,
            }) as Box<dyn MediaEngine>)
        };
        (factory, probe)
    }
}

impl MediaEngine for MockEngine {
    fn subscribe(&self, sender: EventSender) -> Result<()> {
        *self.probe.sender.lock() = Some(sender);
        Ok(())
    }

    fn set_state(&self, state: PipelineState) -> Result<()> {
        self.probe.record(EngineCall::SetState(state));
        if state == PipelineState::Playing {
            self.probe.emit(PlayerEvent::StateChanged {
                origin: EventOrigin::Pipeline,
                old: PipelineState::Paused,
                current: PipelineState::Playing,
                pending: None,
            });
            if let Some(message) = &self.behavior.error_on_play {
                self.probe.emit(PlayerEvent::Error {
                    source: Some("/GstPlayBin:mock/GstURIDecodeBin:uridecodebin0".into()),
                    message: message.clone(),
                    debug: None,
                });
            }
            if self.behavior.eos_on_play {
                self.probe.emit(PlayerEvent::EndOfStream);
            }
        }
        Ok(())
    }

    fn set_current_track(&self, kind: TrackKind, index: u32) -> Result<()> {
        self.probe.record(EngineCall::SetTrack(kind, index));
        Ok(())
    }

    fn track_counts(&self) -> TrackCounts {
        self.behavior.counts
    }

    fn track_language(&self, kind: TrackKind, index: u32) -> Option<String> {
        self.behavior.languages.get(&(kind, index)).cloned()
    }

    fn description(&self) -> String {
        "mock engine".to_string()
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.probe.record(EngineCall::Released);
    }
}
