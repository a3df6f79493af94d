use std::time::Duration;

/// 目标延迟（毫秒），作用于支持 latency 属性的源元素
pub const DEFAULT_LATENCY_MS: u64 = 500;
/// 4MB 缓冲，用于 HLS/DASH 内容
pub const DEFAULT_BUFFER_SIZE: i32 = 4 * 1024 * 1024;
/// 0 = 不限制
pub const DEFAULT_RING_BUFFER_MAX_SIZE: u64 = 0;
/// 给引擎留出的流探测时间
pub const DEFAULT_DISCOVERY_DELAY: Duration = Duration::from_secs(3);

/// 播放器配置
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub uri: String,
    pub latency: Duration,
    pub buffer_size: i32,
    pub ring_buffer_max_size: u64,
    pub discovery_delay: Duration,
}

impl PlayerConfig {
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn latency_ms(&self) -> u32 {
        u32::try_from(self.latency.as_millis()).unwrap_or(u32::MAX)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            buffer_size: DEFAULT_BUFFER_SIZE,
            ring_buffer_max_size: DEFAULT_RING_BUFFER_MAX_SIZE,
            discovery_delay: DEFAULT_DISCOVERY_DELAY,
        }
    }
}
