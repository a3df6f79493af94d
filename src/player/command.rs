use crate::core::{log_ctx, PlaybackOutcome, Result, ShutdownSignal};
use crate::player::event_loop::LoopQuitter;
use crate::player::pipeline::PipelineHandle;
use crossbeam_channel::{bounded, select, Receiver};
use log::{debug, error, info, warn};
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    SelectAudio(u32),
    SelectSubtitle(u32),
    Invalid(String),
}

/// 解析一行输入：`q` / `a<N>` / `s<N>`
pub fn parse_command(line: &str) -> Command {
    // lines() 已去掉 \n，这里只再去掉 CRLF 留下的 \r
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line == "q" {
        return Command::Quit;
    }

    let select: fn(u32) -> Command = match line.chars().next() {
        Some('a') => Command::SelectAudio,
        Some('s') => Command::SelectSubtitle,
        _ => return Command::Invalid(line.to_string()),
    };

    // 只接受纯数字，拒绝符号与空白
    let digits = &line[1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Command::Invalid(line.to_string());
    }

    // 引擎的轨道属性是 i32，超出范围与非数字一样按无效命令处理
    match digits.parse::<i32>().ok().and_then(|i| u32::try_from(i).ok()) {
        Some(index) => select(index),
        None => Command::Invalid(line.to_string()),
    }
}

/// 交互线程的退出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterExit {
    Quit,
    EndOfInput,
    Shutdown,
}

/// 把阻塞的行读取放到独立线程
///
/// 读取线程是 detached 的：stdin 上没有输入时它会一直阻塞，直到进程退出，
/// 但解释器本身通过 select! 仍能及时响应关闭信号。
pub fn spawn_line_reader<R>(input: R) -> Result<Receiver<io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = bounded(16);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in input.lines() {
                let is_err = line.is_err();
                if tx.send(line).is_err() || is_err {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// 命令解释器 - 在独立线程中读取用户输入
pub struct CommandInterpreter {
    pipeline: Arc<PipelineHandle>,
    quitter: LoopQuitter,
    shutdown: ShutdownSignal,
}

impl CommandInterpreter {
    pub fn new(pipeline: Arc<PipelineHandle>, quitter: LoopQuitter, shutdown: ShutdownSignal) -> Self {
        Self {
            pipeline,
            quitter,
            shutdown,
        }
    }

    pub fn spawn<R>(self, input: R) -> Result<JoinHandle<InterpreterExit>>
    where
        R: BufRead + Send + 'static,
    {
        let lines = spawn_line_reader(input)?;
        let handle = thread::Builder::new()
            .name("command-interpreter".into())
            .spawn(move || self.run(lines))?;
        Ok(handle)
    }

    pub fn run(&self, lines: Receiver<io::Result<String>>) -> InterpreterExit {
        Self::print_controls();
        let shutdown_rx = self.shutdown.receiver();

        let exit = loop {
            if self.shutdown.is_triggered() {
                break InterpreterExit::Shutdown;
            }

            select! {
                recv(lines) -> msg => match msg {
                    Ok(Ok(line)) => {
                        if !self.handle_line(&line) {
                            break InterpreterExit::Quit;
                        }
                    }
                    Ok(Err(e)) => {
                        error!("{} ❌ 读取输入失败: {}", log_ctx(), e);
                        break InterpreterExit::EndOfInput;
                    }
                    Err(_) => break InterpreterExit::EndOfInput,
                },
                recv(shutdown_rx) -> _ => break InterpreterExit::Shutdown,
            }
        };

        debug!("{} 命令线程退出: {:?}", log_ctx(), exit);
        exit
    }

    /// 处理一行输入；返回 false 表示应退出循环
    pub fn handle_line(&self, line: &str) -> bool {
        match parse_command(line) {
            Command::Quit => {
                info!("👋 Shutting down...");
                self.shutdown.trigger();
                self.quitter.quit(PlaybackOutcome::UserQuit);
                false
            }
            Command::SelectAudio(index) => {
                self.pipeline.set_active_audio_track(index);
                true
            }
            Command::SelectSubtitle(index) => {
                self.pipeline.set_active_subtitle_track(index);
                true
            }
            Command::Invalid(input) => {
                warn!("Invalid track number: {:?}", input);
                true
            }
        }
    }

    fn print_controls() {
        info!("🎮 Controls:");
        info!("  'a0', 'a1'... = Audio track");
        info!("  's0', 's1'... = Subtitle track");
        info!("  'q'           = Quit");
    }
}
