use crate::core::{log_ctx, Result, ShutdownSignal, TrackCounts, TrackDescriptor, TrackKind};
use crate::player::pipeline::PipelineHandle;
use log::{debug, info};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 一次探测的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReport {
    pub counts: TrackCounts,
    pub audio: Vec<TrackDescriptor>,
    pub subtitles: Vec<TrackDescriptor>,
}

/// 流信息探测 - 播放开始后等待引擎完成流发现，再打印轨道摘要
///
/// 等待期间收到关闭信号会直接放弃；醒来后管线已释放也只是静默返回。
pub struct TrackInspector {
    pipeline: Arc<PipelineHandle>,
    shutdown: ShutdownSignal,
    delay: Duration,
}

impl TrackInspector {
    pub fn new(pipeline: Arc<PipelineHandle>, shutdown: ShutdownSignal, delay: Duration) -> Self {
        Self {
            pipeline,
            shutdown,
            delay,
        }
    }

    pub fn spawn(self) -> Result<JoinHandle<Option<TrackReport>>> {
        let handle = thread::Builder::new()
            .name("track-inspector".into())
            .spawn(move || self.run())?;
        Ok(handle)
    }

    pub fn run(&self) -> Option<TrackReport> {
        // 探测完成时间没有信号可用，只能固定等待
        if self.shutdown.wait_timeout(self.delay) {
            debug!("{} 流信息探测取消（已关闭）", log_ctx());
            return None;
        }

        if !self.pipeline.is_alive() {
            debug!("{} 管线已释放，跳过流信息探测", log_ctx());
            return None;
        }
        let report = Self::inspect(&self.pipeline)?;
        Self::log_report(&report);
        Some(report)
    }

    /// 读取当前轨道信息；管线已释放时返回 None
    pub fn inspect(pipeline: &PipelineHandle) -> Option<TrackReport> {
        let counts = pipeline.query_track_counts()?;
        Some(TrackReport {
            counts,
            audio: pipeline.describe_tracks(TrackKind::Audio, counts.audio),
            subtitles: pipeline.describe_tracks(TrackKind::Subtitle, counts.subtitle),
        })
    }

    fn log_report(report: &TrackReport) {
        info!("🔍 Stream Discovery:");
        info!("  Video tracks: {}", report.counts.video);
        info!("  Audio tracks: {}", report.counts.audio);
        info!("  Subtitle tracks: {}", report.counts.subtitle);

        for track in report.audio.iter().chain(report.subtitles.iter()) {
            if let Some(language) = &track.language {
                info!("  {}[{}] {}", track.kind, track.index, language);
            }
        }
    }
}
