use std::fmt;

/// 轨道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Subtitle => "Subtitle",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 轨道描述（只读视图，每次探测重新计算）
///
/// index 只在当前管线配置下有效
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub kind: TrackKind,
    pub index: u32,
    pub language: Option<String>,
}

/// 各类轨道数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackCounts {
    pub video: u32,
    pub audio: u32,
    pub subtitle: u32,
}

/// 管线状态（与引擎的 NULL/READY/PAUSED/PLAYING 一一对应）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineState {
    #[default]
    Null,
    Ready,
    Paused,
    Playing,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Null => "NULL",
            PipelineState::Ready => "READY",
            PipelineState::Paused => "PAUSED",
            PipelineState::Playing => "PLAYING",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 通知来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOrigin {
    /// 我们持有的顶层管线
    Pipeline,
    /// 管线内部的子元素（路径）
    Element(String),
}

/// 引擎异步通知
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Error {
        source: Option<String>,
        message: String,
        debug: Option<String>,
    },
    Warning {
        source: Option<String>,
        message: String,
        debug: Option<String>,
    },
    EndOfStream,
    StateChanged {
        origin: EventOrigin,
        old: PipelineState,
        current: PipelineState,
        pending: Option<PipelineState>,
    },
    Buffering {
        percent: i32,
    },
    /// 其他消息类型，只保留类型名
    Other(String),
}

/// 事件循环退出原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    EndOfStream,
    Error { message: String },
    UserQuit,
    Stopped,
}

impl fmt::Display for PlaybackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackOutcome::EndOfStream => f.write_str("播放结束 (EOS)"),
            PlaybackOutcome::Error { message } => write!(f, "播放错误: {}", message),
            PlaybackOutcome::UserQuit => f.write_str("用户退出"),
            PlaybackOutcome::Stopped => f.write_str("已停止"),
        }
    }
}

/// 播放器生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Configured,
    Playing,
    Stopped,
}
