// 核心数据结构和类型定义

pub mod types;
pub mod config;
pub mod shutdown;
pub mod error;

pub use types::*;
pub use config::*;
pub use shutdown::ShutdownSignal;
pub use error::*;

use std::process;
use std::thread;

/// 日志上下文前缀（进程 / 线程）
pub fn log_ctx() -> String {
    format!("[pid:{}-tid:{:?}]", process::id(), thread::current().id())
}
