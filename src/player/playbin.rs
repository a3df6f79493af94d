use crate::core::{
    EventOrigin, PipelineState, PlayerConfig, PlayerError, PlayerEvent, Result, TrackCounts,
    TrackKind,
};
use crate::player::engine::MediaEngine;
use crate::player::event_loop::EventSender;
use gst::glib;
use gst::prelude::*;
use gstreamer as gst;
use log::{debug, info, warn};

/// GStreamer playbin 引擎
///
/// playbin 自己完成 HLS/DASH 的下载、解复用、解码和音视频输出。
pub struct PlaybinEngine {
    playbin: gst::Element,
}

impl PlaybinEngine {
    /// 初始化 GStreamer 并创建 playbin；缺少插件时返回 ElementCreation
    pub fn create(config: &PlayerConfig) -> Result<Box<dyn MediaEngine>> {
        gst::init().map_err(|e| PlayerError::EngineInit(e.to_string()))?;

        let playbin = gst::ElementFactory::make("playbin")
            .name("stream-player")
            .build()
            .map_err(|e| PlayerError::ElementCreation(format!("playbin: {}", e)))?;

        playbin.set_property("uri", config.uri.as_str());
        set_if_supported(&playbin, "buffer-size", config.buffer_size.to_value());
        set_if_supported(
            &playbin,
            "ring-buffer-max-size",
            config.ring_buffer_max_size.to_value(),
        );

        // latency 是源元素的属性（rtspsrc 等），playbin 本身没有
        let latency_ms = config.latency_ms();
        playbin.connect("source-setup", false, move |values| {
            if let Some(Ok(source)) = values.get(1).map(|v| v.get::<gst::Element>()) {
                if set_if_supported(&source, "latency", latency_ms.to_value()) {
                    debug!("源元素 {} latency = {}ms", source.name(), latency_ms);
                }
            }
            None
        });

        // DRM 解密器预留：取得授权后通过 video-sink 接入

        info!("✅ playbin 创建成功 (GStreamer {})", gst::version_string());
        Ok(Box::new(Self { playbin }))
    }
}

impl MediaEngine for PlaybinEngine {
    fn subscribe(&self, sender: EventSender) -> Result<()> {
        let bus = self
            .playbin
            .bus()
            .ok_or_else(|| PlayerError::Other("playbin 没有消息总线".into()))?;

        // 弱引用：总线 -> handler -> playbin 不能形成循环
        let pipeline = self.playbin.downgrade();
        bus.set_sync_handler(move |_, msg| {
            sender.post(translate_message(msg, &pipeline));
            gst::BusSyncReply::Drop
        });
        Ok(())
    }

    fn set_state(&self, state: PipelineState) -> Result<()> {
        self.playbin
            .set_state(to_gst_state(state))
            .map(|_| ())
            .map_err(|e| PlayerError::StateChange {
                target: state,
                reason: e.to_string(),
            })
    }

    fn set_current_track(&self, kind: TrackKind, index: u32) -> Result<()> {
        let index = i32::try_from(index)
            .map_err(|_| PlayerError::Property(format!("轨道索引超出范围: {}", index)))?;
        self.playbin.set_property(track_property(kind), index);
        Ok(())
    }

    fn track_counts(&self) -> TrackCounts {
        let count = |name: &str| self.playbin.property::<i32>(name).max(0) as u32;
        TrackCounts {
            video: count("n-video"),
            audio: count("n-audio"),
            subtitle: count("n-text"),
        }
    }

    fn track_language(&self, kind: TrackKind, index: u32) -> Option<String> {
        let index = i32::try_from(index).ok()?;
        let tags = self
            .playbin
            .emit_by_name::<Option<gst::TagList>>(tags_signal(kind), &[&index])?;
        tags.get::<gst::tags::LanguageCode>()
            .map(|code| code.get().to_string())
    }

    fn description(&self) -> String {
        format!("playbin ({})", self.playbin.name())
    }
}

impl Drop for PlaybinEngine {
    fn drop(&mut self) {
        if let Some(bus) = self.playbin.bus() {
            bus.unset_sync_handler();
        }
        let _ = self.playbin.set_state(gst::State::Null);
    }
}

/// 属性存在且类型匹配时才设置（GObject 对未知属性会直接 panic）
fn set_if_supported(element: &gst::Element, name: &str, value: glib::Value) -> bool {
    match element.find_property(name) {
        Some(pspec) if pspec.value_type() == value.type_() => {
            element.set_property_from_value(name, &value);
            true
        }
        Some(pspec) => {
            warn!(
                "⚠ {} 的属性 {} 类型为 {}，跳过设置",
                element.name(),
                name,
                pspec.value_type()
            );
            false
        }
        None => {
            debug!("{} 不支持属性 {}", element.name(), name);
            false
        }
    }
}

fn track_property(kind: TrackKind) -> &'static str {
    match kind {
        TrackKind::Video => "current-video",
        TrackKind::Audio => "current-audio",
        TrackKind::Subtitle => "current-text",
    }
}

fn tags_signal(kind: TrackKind) -> &'static str {
    match kind {
        TrackKind::Video => "get-video-tags",
        TrackKind::Audio => "get-audio-tags",
        TrackKind::Subtitle => "get-text-tags",
    }
}

fn to_gst_state(state: PipelineState) -> gst::State {
    match state {
        PipelineState::Null => gst::State::Null,
        PipelineState::Ready => gst::State::Ready,
        PipelineState::Paused => gst::State::Paused,
        PipelineState::Playing => gst::State::Playing,
    }
}

fn from_gst_state(state: gst::State) -> Option<PipelineState> {
    match state {
        gst::State::Null => Some(PipelineState::Null),
        gst::State::Ready => Some(PipelineState::Ready),
        gst::State::Paused => Some(PipelineState::Paused),
        gst::State::Playing => Some(PipelineState::Playing),
        _ => None,
    }
}

/// 总线消息 -> PlayerEvent（在 GStreamer 流线程中执行）
fn translate_message(msg: &gst::Message, pipeline: &glib::WeakRef<gst::Element>) -> PlayerEvent {
    use gst::MessageView;

    let source = msg.src().map(|s| s.path_string().to_string());
    match msg.view() {
        MessageView::Error(err) => PlayerEvent::Error {
            source,
            message: err.error().to_string(),
            debug: err.debug().map(|d| d.to_string()),
        },
        MessageView::Warning(w) => PlayerEvent::Warning {
            source,
            message: w.error().to_string(),
            debug: w.debug().map(|d| d.to_string()),
        },
        MessageView::Eos(..) => PlayerEvent::EndOfStream,
        MessageView::StateChanged(sc) => {
            let from_pipeline = pipeline
                .upgrade()
                .is_some_and(|p| msg.src() == Some(p.upcast_ref::<gst::Object>()));
            PlayerEvent::StateChanged {
                origin: if from_pipeline {
                    EventOrigin::Pipeline
                } else {
                    EventOrigin::Element(source.unwrap_or_default())
                },
                old: from_gst_state(sc.old()).unwrap_or_default(),
                current: from_gst_state(sc.current()).unwrap_or_default(),
                pending: from_gst_state(sc.pending()),
            }
        }
        MessageView::Buffering(b) => PlayerEvent::Buffering {
            percent: b.percent(),
        },
        _ => PlayerEvent::Other(format!("{:?}", msg.type_())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_mapping() {
        for state in [
            PipelineState::Null,
            PipelineState::Ready,
            PipelineState::Paused,
            PipelineState::Playing,
        ] {
            assert_eq!(from_gst_state(to_gst_state(state)), Some(state));
        }
        assert_eq!(from_gst_state(gst::State::VoidPending), None);
    }

    #[test]
    fn test_track_properties() {
        assert_eq!(track_property(TrackKind::Audio), "current-audio");
        assert_eq!(track_property(TrackKind::Subtitle), "current-text");
        assert_eq!(tags_signal(TrackKind::Audio), "get-audio-tags");
        assert_eq!(tags_signal(TrackKind::Subtitle), "get-text-tags");
    }

    /// 只用 GStreamer core 就能构造的管线和子元素，不依赖任何插件
    fn pipeline_with_child() -> (gst::Pipeline, gst::Bin) {
        gst::init().unwrap();
        let pipeline = gst::Pipeline::builder().name("test-pipeline").build();
        let child = gst::Bin::builder().name("child").build();
        pipeline.add(&child).unwrap();
        (pipeline, child)
    }

    fn weak_of(pipeline: &gst::Pipeline) -> glib::WeakRef<gst::Element> {
        pipeline.upcast_ref::<gst::Element>().downgrade()
    }

    #[test]
    fn test_state_change_from_pipeline_itself() {
        let (pipeline, _child) = pipeline_with_child();
        let msg = gst::message::StateChanged::builder(
            gst::State::Paused,
            gst::State::Playing,
            gst::State::VoidPending,
        )
        .src(&pipeline)
        .build();

        assert_eq!(
            translate_message(&msg, &weak_of(&pipeline)),
            PlayerEvent::StateChanged {
                origin: EventOrigin::Pipeline,
                old: PipelineState::Paused,
                current: PipelineState::Playing,
                pending: None,
            }
        );
    }

    #[test]
    fn test_state_change_from_child_keeps_path() {
        let (pipeline, child) = pipeline_with_child();
        let msg = gst::message::StateChanged::builder(
            gst::State::Null,
            gst::State::Ready,
            gst::State::Paused,
        )
        .src(&child)
        .build();

        match translate_message(&msg, &weak_of(&pipeline)) {
            PlayerEvent::StateChanged {
                origin: EventOrigin::Element(path),
                old,
                current,
                pending,
            } => {
                assert!(path.contains("test-pipeline"), "{path}");
                assert!(path.ends_with(":child"), "{path}");
                assert_eq!(old, PipelineState::Null);
                assert_eq!(current, PipelineState::Ready);
                assert_eq!(pending, Some(PipelineState::Paused));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_released_pipeline_is_never_matched() {
        let (pipeline, _child) = pipeline_with_child();
        let weak = weak_of(&pipeline);
        let msg = gst::message::StateChanged::builder(
            gst::State::Ready,
            gst::State::Null,
            gst::State::VoidPending,
        )
        .src(&pipeline)
        .build();
        drop(pipeline);

        assert!(matches!(
            translate_message(&msg, &weak),
            PlayerEvent::StateChanged {
                origin: EventOrigin::Element(_),
                ..
            }
        ));
    }

    #[test]
    fn test_eos_error_and_buffering_messages() {
        let (pipeline, child) = pipeline_with_child();
        let weak = weak_of(&pipeline);

        let eos = gst::message::Eos::builder().src(&pipeline).build();
        assert_eq!(translate_message(&eos, &weak), PlayerEvent::EndOfStream);

        let err = gst::message::Error::builder(gst::ResourceError::NotFound, "Not Found")
            .src(&child)
            .debug("souphttpsrc: 404")
            .build();
        match translate_message(&err, &weak) {
            PlayerEvent::Error {
                source,
                message,
                debug,
            } => {
                assert!(source.is_some_and(|s| s.ends_with(":child")));
                assert_eq!(message, "Not Found");
                assert_eq!(debug.as_deref(), Some("souphttpsrc: 404"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let buffering = gst::message::Buffering::builder(42).src(&pipeline).build();
        assert_eq!(
            translate_message(&buffering, &weak),
            PlayerEvent::Buffering { percent: 42 }
        );

        let latency = gst::message::Latency::builder().src(&pipeline).build();
        assert!(matches!(
            translate_message(&latency, &weak),
            PlayerEvent::Other(_)
        ));
    }

    #[test]
    fn test_set_if_supported_checks_name_and_type() {
        let (pipeline, child) = pipeline_with_child();
        let pipeline_element = pipeline.upcast_ref::<gst::Element>();
        let child_element = child.upcast_ref::<gst::Element>();

        // Bin 没有 latency 属性
        assert!(!set_if_supported(child_element, "latency", 500u32.to_value()));
        // Pipeline 的 latency 是 u64 (ClockTime)，传 u32 必须跳过而不是 panic
        assert!(!set_if_supported(pipeline_element, "latency", 500u32.to_value()));

        assert!(set_if_supported(
            child_element,
            "async-handling",
            true.to_value()
        ));
        assert!(child.property::<bool>("async-handling"));
    }
}
