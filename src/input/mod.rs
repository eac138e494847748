/// 帧输入系统 (Frame Input System)
///
/// 独立工作线程, 负责按到达顺序交付每帧检测事件
/// - JsonlFrameSource: 录制的检测事件 (每行一帧)
/// - Acquisition:      采集线程 + 有界通道
pub mod acquisition;
pub mod events;

pub use acquisition::{spawn as spawn_acquisition, AcquiredFrame, Acquisition};
pub use events::JsonlFrameSource;

use crate::detection::FrameEvents;
use crate::error::Result;

/// 帧来源 (外部视觉子系统)
pub trait FrameSource {
    /// 读取下一帧, 流结束时返回 None
    fn next_frame(&mut self) -> Result<Option<FrameEvents>>;
}
