/// 处理流水线 (Processing Pipeline)
///
/// 两线程架构, 通过有界通道通信:
/// - Acquisition: 读取检测事件 (独立线程)
/// - Sentinel:    逐帧驱动考勤引擎与过线计数器 (当前线程)
///
/// 两个引擎互不交互, 第 N 帧的状态变更全部完成后才处理第 N+1 帧。
pub mod sentinel;

pub use sentinel::Sentinel;

use crate::counting::{Crossing, Point};
use crate::detection::{BBox, TrackId};

// ========== 每帧报告 (供渲染层标注) ==========

/// 单张人脸的处理结果
#[derive(Clone, Debug, PartialEq)]
pub struct FaceReport {
    pub bbox: BBox,
    /// None 表示未识别
    pub name: Option<String>,
    pub confidence: f32,
    /// 今日是否已打卡 (含本帧新打卡)
    pub marked: bool,
    /// 是否为本帧新打卡
    pub newly_marked: bool,
}

impl FaceReport {
    /// 标注文字: `✓ alice (87.5%)` / `Unknown`
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => {
                let status = if self.marked { "✓" } else { "○" };
                format!("{} {} ({:.1}%)", status, name, self.confidence)
            }
            None => "Unknown".to_string(),
        }
    }
}

/// 单个跟踪目标的处理结果
#[derive(Clone, Debug, PartialEq)]
pub struct TrackReport {
    pub track_id: TrackId,
    pub centroid: Point,
    pub crossing: Crossing,
}

/// 单帧处理结果
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// 帧序号 (从1开始)
    pub frame_index: u64,
    /// 本帧是否处理了人脸
    pub faces_processed: bool,
    pub faces: Vec<FaceReport>,
    pub tracks: Vec<TrackReport>,
    /// 本帧结束后的过线计数
    pub count: u64,
    pub present: usize,
    pub total_staff: usize,
}

impl FrameReport {
    pub fn status_line(&self) -> String {
        format!(
            "Staff Present: {}/{} | People Count: {}",
            self.present, self.total_staff, self.count
        )
    }
}

/// 整次运行统计
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub new_marks: usize,
    pub count: u64,
}
