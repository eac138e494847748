/// 采集线程 (Acquisition)
/// 职责: 从事件源读取帧 → 按顺序发送到处理线程
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use super::FrameSource;
use crate::detection::FrameEvents;
use crate::error::SentinelError;

/// 采集线程 → 处理线程
#[derive(Debug)]
pub enum AcquiredFrame {
    Frame(FrameEvents),
    Failed(SentinelError),
}

pub struct Acquisition<F> {
    source: F,
    tx: Sender<AcquiredFrame>,
}

impl<F: FrameSource> Acquisition<F> {
    pub fn new(source: F, tx: Sender<AcquiredFrame>) -> Self {
        Self { source, tx }
    }

    /// 读到流结束、出错或接收端关闭为止, 返回已发送帧数
    pub fn run(&mut self) -> u64 {
        log::debug!("🎬 采集线程启动");
        let mut sent = 0u64;
        loop {
            let message = match self.source.next_frame() {
                Ok(Some(frame)) => AcquiredFrame::Frame(frame),
                Ok(None) => break,
                Err(e) => {
                    log::error!("❌ 读取检测事件失败: {}", e);
                    AcquiredFrame::Failed(e)
                }
            };
            let failed = matches!(message, AcquiredFrame::Failed(_));
            if self.tx.send(message).is_err() {
                log::debug!("处理线程已退出, 停止采集");
                break;
            }
            if failed {
                break;
            }
            sent += 1;
        }
        log::debug!("采集线程退出, 共 {} 帧", sent);
        sent
    }
}

/// 启动采集线程, 通过有界通道交付帧
pub fn spawn<F>(source: F, capacity: usize) -> (Receiver<AcquiredFrame>, JoinHandle<u64>)
where
    F: FrameSource + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    let handle = thread::spawn(move || Acquisition::new(source, tx).run());
    (rx, handle)
}
