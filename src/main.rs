use anyhow::Context;
use log::{error, info, warn};
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

mod core;
mod player;

use crate::core::{PlayerConfig, Result};
use player::{LifecycleCoordinator, MediaEngine, PlaybinEngine};

/// 缺少参数
const EXIT_USAGE: u8 = 1;
/// 管线无法创建
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    // 初始化日志（RUST_LOG 优先）
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let code = run(&args, PlaybinEngine::create, BufReader::new(io::stdin()));
    ExitCode::from(code)
}

fn run<F, R>(args: &[String], factory: F, input: R) -> u8
where
    F: FnOnce(&PlayerConfig) -> Result<Box<dyn MediaEngine>>,
    R: BufRead + Send + 'static,
{
    let program = args.first().map(String::as_str).unwrap_or("stream_player");
    let Some(uri) = args.get(1) else {
        eprintln!("Usage: {} <stream_url>", program);
        eprintln!(
            "Example: {} https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8",
            program
        );
        return EXIT_USAGE;
    };
    if args.len() > 2 {
        warn!("忽略多余参数: {:?}", &args[2..]);
    }

    let mut coordinator = LifecycleCoordinator::new(PlayerConfig::with_uri(uri));

    let configured = coordinator
        .configure(factory)
        .with_context(|| format!("FATAL: 无法创建播放管线 ({})", uri));
    if let Err(e) = configured {
        error!("{:#}", e);
        return EXIT_FATAL;
    }

    match coordinator.play(input).context("播放启动失败") {
        Ok(outcome) => {
            // 管线错误同样以 0 退出，原因只体现在日志里
            info!("🎬 播放结束: {}", outcome);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            EXIT_FATAL
        }
    }
}
