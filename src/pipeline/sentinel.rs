//! 逐帧驱动 (Per-frame driver)
//! 职责: 接收FrameEvents → 考勤引擎 + 过线计数器 → FrameReport

use crossbeam_channel::Receiver;

use super::{FaceReport, FrameReport, RunStats, TrackReport};
use crate::attendance::{
    AttendanceEngine, Clock, EuclideanComparator, FaceComparator, LedgerStore, MarkOutcome,
    SystemClock,
};
use crate::counting::LineCounter;
use crate::detection::FrameEvents;
use crate::error::Result;
use crate::input::AcquiredFrame;

pub struct Sentinel<S, K = SystemClock, C = EuclideanComparator> {
    attendance: AttendanceEngine<S, K, C>,
    counter: LineCounter,

    /// 每N帧处理一次人脸
    face_interval: u32,

    /// 已处理帧数
    frame_index: u64,
}

impl<S: LedgerStore, K: Clock, C: FaceComparator> Sentinel<S, K, C> {
    pub fn new(
        attendance: AttendanceEngine<S, K, C>,
        counter: LineCounter,
        face_interval: u32,
    ) -> Self {
        Self {
            attendance,
            counter,
            face_interval: face_interval.max(1),
            frame_index: 0,
        }
    }

    /// 处理一帧
    pub fn process_frame(&mut self, events: &FrameEvents) -> Result<FrameReport> {
        self.frame_index += 1;
        self.attendance.sync_day()?;

        // 1. 人脸 → 考勤
        let faces_processed = self.frame_index % u64::from(self.face_interval) == 0;
        let mut faces = Vec::new();
        if faces_processed {
            for face in &events.faces {
                let outcome = self.attendance.record_if_absent(&face.embedding)?;
                let newly_marked = matches!(outcome, MarkOutcome::Marked { .. });
                let report = match outcome.identity() {
                    Some(identity) => FaceReport {
                        bbox: face.bbox.clone(),
                        name: Some(identity.name.clone()),
                        confidence: identity.confidence(),
                        marked: self.attendance.is_marked(&identity.name),
                        newly_marked,
                    },
                    None => FaceReport {
                        bbox: face.bbox.clone(),
                        name: None,
                        confidence: 0.0,
                        marked: false,
                        newly_marked,
                    },
                };
                faces.push(report);
            }
        }

        // 2. 跟踪目标 → 过线计数
        let mut tracks = Vec::with_capacity(events.tracks.len());
        for track in &events.tracks {
            let centroid = track.bbox.center();
            let crossing = self.counter.observe(track.track_id, centroid);
            tracks.push(TrackReport {
                track_id: track.track_id,
                centroid,
                crossing,
            });
        }
        self.counter.end_frame();

        let summary = self.attendance.summary();
        let report = FrameReport {
            frame_index: self.frame_index,
            faces_processed,
            faces,
            tracks,
            count: self.counter.count(),
            present: summary.present,
            total_staff: summary.total_staff,
        };
        log::debug!("帧 {}: {}", report.frame_index, report.status_line());
        Ok(report)
    }

    /// 按到达顺序处理直到采集结束
    pub fn run(&mut self, frames: Receiver<AcquiredFrame>) -> Result<RunStats> {
        log::info!("✅ 系统就绪, 开始处理...");
        let mut stats = RunStats::default();
        for message in frames.iter() {
            let events = match message {
                AcquiredFrame::Frame(events) => events,
                AcquiredFrame::Failed(e) => return Err(e),
            };
            let report = self.process_frame(&events)?;
            stats.frames += 1;
            stats.new_marks += report.faces.iter().filter(|f| f.newly_marked).count();
        }
        stats.count = self.counter.count();
        log::info!(
            "🏁 事件流结束: {} 帧, 新打卡 {} 人, 过线 {} 人",
            stats.frames,
            stats.new_marks,
            stats.count
        );
        Ok(stats)
    }

    pub fn attendance(&self) -> &AttendanceEngine<S, K, C> {
        &self.attendance
    }

    pub fn counter(&self) -> &LineCounter {
        &self.counter
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
