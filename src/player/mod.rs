// 播放器核心模块

pub mod engine;
pub mod playbin;
pub mod pipeline;
pub mod event_loop;
pub mod event_bridge;
pub mod track_inspector;
pub mod command;
pub mod coordinator;

#[cfg(test)]
pub(crate) mod mock;

pub use engine::MediaEngine;
pub use playbin::PlaybinEngine;
pub use coordinator::LifecycleCoordinator;
