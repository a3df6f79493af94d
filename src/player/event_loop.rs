use crate::core::{log_ctx, PlaybackOutcome, PlayerEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info};
use std::ops::ControlFlow;

enum LoopMessage {
    Event(PlayerEvent),
    Quit(PlaybackOutcome),
}

/// 事件监听器：返回 Break 即请求事件循环退出
pub trait EventListener {
    fn on_event(&mut self, event: PlayerEvent) -> ControlFlow<PlaybackOutcome>;
}

/// 事件发送端（交给引擎，通常在引擎的流线程中调用）
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<LoopMessage>,
}

impl EventSender {
    /// 投递通知；事件循环已销毁时返回 false
    pub fn post(&self, event: PlayerEvent) -> bool {
        self.tx.send(LoopMessage::Event(event)).is_ok()
    }
}

/// 事件循环退出句柄，可在任意线程（包括派发回调内部）调用
#[derive(Clone)]
pub struct LoopQuitter {
    tx: Sender<LoopMessage>,
}

impl LoopQuitter {
    pub fn quit(&self, outcome: PlaybackOutcome) {
        debug!("{} 请求事件循环退出: {}", log_ctx(), outcome);
        let _ = self.tx.send(LoopMessage::Quit(outcome));
    }
}

/// 阻塞式事件循环
///
/// 引擎通知按到达顺序串行派发给监听器，派发只发生在调用 run() 的线程上。
pub struct EventLoop {
    tx: Sender<LoopMessage>,
    rx: Receiver<LoopMessage>,
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    pub fn quitter(&self) -> LoopQuitter {
        LoopQuitter {
            tx: self.tx.clone(),
        }
    }

    /// 运行直到监听器返回 Break 或收到 quit
    pub fn run<L: EventListener + ?Sized>(&self, listener: &mut L) -> PlaybackOutcome {
        info!("{} 🔁 事件循环启动", log_ctx());

        // 自身持有发送端，recv() 不会因断开而返回 Err
        let outcome = loop {
            match self.rx.recv() {
                Ok(LoopMessage::Event(event)) => {
                    if let ControlFlow::Break(outcome) = listener.on_event(event) {
                        break outcome;
                    }
                }
                Ok(LoopMessage::Quit(outcome)) => break outcome,
                Err(_) => break PlaybackOutcome::Stopped,
            }
        };

        info!("{} ⏹ 事件循环退出: {}", log_ctx(), outcome);
        outcome
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
