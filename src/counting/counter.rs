//! 过线计数器 (Line-crossing counter)
//!
//! 核心规则:
//! 1. 首次出现的跟踪ID只记录位置
//! 2. 仅 负侧 → 非负侧 的跨越计数, 反方向永不计数
//! 3. 每个跟踪ID在本次运行中最多计数一次
//! 4. 无论是否计数, 都用当前位置覆盖历史位置

use std::collections::{HashMap, HashSet};

use super::geometry::{CountingLine, Point, Side};
use crate::detection::TrackId;

/// 单帧观测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// 首次出现, 无法判断跨越
    FirstSighting,
    /// 未跨越计数线 (或反方向跨越)
    None,
    /// 跨越并计数
    Counted,
    /// 跨越, 但该ID已计过数
    AlreadyCounted,
}

/// 跟踪历史
#[derive(Debug, Clone, Copy)]
struct TrackState {
    position: Point,
    last_seen_frame: u64,
}

/// 过线计数器
pub struct LineCounter {
    line: CountingLine,

    /// 每个跟踪ID最后的中心点
    history: HashMap<TrackId, TrackState>,

    /// 已计数的跟踪ID (只增不减)
    counted: HashSet<TrackId>,

    count: u64,

    /// 当前帧序号
    frame: u64,

    /// 超过多少帧未出现即丢弃历史 (0 = 不丢弃)
    eviction_frames: u32,
}

impl LineCounter {
    pub fn new(line: CountingLine) -> Self {
        Self::with_eviction(line, 0)
    }

    pub fn with_eviction(line: CountingLine, eviction_frames: u32) -> Self {
        Self {
            line,
            history: HashMap::new(),
            counted: HashSet::new(),
            count: 0,
            frame: 0,
            eviction_frames,
        }
    }

    /// 处理一次观测
    pub fn observe(&mut self, track_id: TrackId, centroid: Point) -> Crossing {
        let state = TrackState {
            position: centroid,
            last_seen_frame: self.frame,
        };

        let Some(previous) = self.history.insert(track_id, state) else {
            return Crossing::FirstSighting;
        };

        let crossed = self.line.side(previous.position) == Side::Negative
            && self.line.side(centroid) == Side::NonNegative;
        if !crossed {
            return Crossing::None;
        }

        if self.counted.insert(track_id) {
            self.count += 1;
            log::info!("🚶 ID {} 过线, 当前计数: {}", track_id, self.count);
            Crossing::Counted
        } else {
            log::trace!("ID {} 再次过线, 已计数", track_id);
            Crossing::AlreadyCounted
        }
    }

    /// 结束当前帧, 按策略丢弃过期历史, 返回丢弃数量
    pub fn end_frame(&mut self) -> usize {
        let mut evicted = 0;
        if self.eviction_frames > 0 {
            let frame = self.frame;
            let max_unseen = u64::from(self.eviction_frames);
            let before = self.history.len();
            self.history
                .retain(|_, state| frame - state.last_seen_frame <= max_unseen);
            evicted = before - self.history.len();
            if evicted > 0 {
                log::debug!("丢弃 {} 条过期轨迹", evicted);
            }
        }
        self.frame += 1;
        evicted
    }

    /// 当前计数 (单调不减)
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_counted(&self, track_id: TrackId) -> bool {
        self.counted.contains(&track_id)
    }

    /// 当前保留的轨迹数量
    pub fn track_count(&self) -> usize {
        self.history.len()
    }

    pub fn last_position(&self, track_id: TrackId) -> Option<Point> {
        self.history.get(&track_id).map(|state| state.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal() -> CountingLine {
        // 水平线: side 值等于 y
        CountingLine::new(Point::new(0, 0), Point::new(1, 0))
    }

    fn at(y: i64) -> Point {
        Point::new(50, y)
    }

    #[test]
    fn test_counts_negative_to_positive_once() {
        let mut counter = LineCounter::new(horizontal());
        assert_eq!(counter.observe(1, at(-3)), Crossing::FirstSighting);
        assert_eq!(counter.observe(1, at(-1)), Crossing::None);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.observe(1, at(2)), Crossing::Counted);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_reverse_crossing_ignored() {
        let mut counter = LineCounter::new(horizontal());
        counter.observe(1, at(2));
        assert_eq!(counter.observe(1, at(-1)), Crossing::None);
        assert_eq!(counter.count(), 0);
        assert!(!counter.is_counted(1));
    }

    #[test]
    fn test_jitter_counts_once_per_track() {
        let mut counter = LineCounter::new(horizontal());
        for y in [-2, 1, -1, 3, -4, 5] {
            counter.observe(9, at(y));
        }
        assert_eq!(counter.count(), 1);
        assert!(counter.is_counted(9));
    }

    #[test]
    fn test_repeat_crossing_reports_already_counted() {
        let mut counter = LineCounter::new(horizontal());
        counter.observe(4, at(-1));
        assert_eq!(counter.observe(4, at(1)), Crossing::Counted);
        counter.observe(4, at(-1));
        assert_eq!(counter.observe(4, at(1)), Crossing::AlreadyCounted);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_landing_on_line_counts() {
        let mut counter = LineCounter::new(horizontal());
        counter.observe(3, at(-1));
        assert_eq!(counter.observe(3, at(0)), Crossing::Counted);
    }

    #[test]
    fn test_starting_on_line_is_not_negative() {
        let mut counter = LineCounter::new(horizontal());
        counter.observe(3, at(0));
        assert_eq!(counter.observe(3, at(4)), Crossing::None);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_tracks_are_independent() {
        let mut counter = LineCounter::new(horizontal());
        counter.observe(1, at(-5));
        counter.observe(2, at(-5));
        counter.observe(1, at(5));
        counter.observe(2, at(5));
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.track_count(), 2);
    }

    #[test]
    fn test_history_overwritten_every_observation() {
        let mut counter = LineCounter::new(horizontal());
        counter.observe(1, at(-5));
        counter.observe(1, at(-2));
        assert_eq!(counter.last_position(1), Some(at(-2)));
    }

    #[test]
    fn test_no_eviction_by_default() {
        let mut counter = LineCounter::new(horizontal());
        counter.observe(1, at(-5));
        for _ in 0..1000 {
            counter.end_frame();
        }
        assert_eq!(counter.track_count(), 1);
    }

    #[test]
    fn test_eviction_drops_stale_history_only() {
        let mut counter = LineCounter::with_eviction(horizontal(), 2);
        counter.observe(1, at(-1));
        counter.observe(1, at(1));
        assert_eq!(counter.count(), 1);

        // 帧 0 观测, 帧 1..=2 未出现仍保留, 帧 3 结束时丢弃
        assert_eq!(counter.end_frame(), 0);
        assert_eq!(counter.end_frame(), 0);
        assert_eq!(counter.end_frame(), 0);
        assert_eq!(counter.end_frame(), 1);
        assert_eq!(counter.track_count(), 0);

        // 丢弃后重新出现视为首次出现, 且不会重复计数
        assert_eq!(counter.observe(1, at(-1)), Crossing::FirstSighting);
        assert_eq!(counter.observe(1, at(1)), Crossing::AlreadyCounted);
        assert_eq!(counter.count(), 1);
    }
}
