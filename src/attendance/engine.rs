//! 考勤去重与台账引擎 (Attendance engine)
//!
//! 每人每天最多一条记录:
//! 1. 特征匹配 → 未识别则结束
//! 2. 今日已打卡 → 幂等返回, 不写盘
//! 3. 否则 读取台账 → 写入 (今天, 姓名) → 整体写回 → 更新内存状态

use std::collections::HashSet;

use serde::Serialize;

use super::clock::{time_key, Clock, SystemClock};
use super::identity::IdentitySet;
use super::ledger::{AttendanceRecord, DayRecords, Ledger, LedgerStore};
use super::matcher::{
    EuclideanComparator, FaceComparator, IdentityMatch, IdentityMatcher, MatchOutcome,
};
use crate::detection::Embedding;
use crate::error::Result;

/// 单次打卡结果
#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
    /// 未匹配到任何已注册人员
    Unknown,
    /// 今日已打卡, 未写盘
    AlreadyMarked(IdentityMatch),
    /// 新打卡并已写盘
    Marked {
        identity: IdentityMatch,
        record: AttendanceRecord,
    },
}

impl MarkOutcome {
    pub fn identity(&self) -> Option<&IdentityMatch> {
        match self {
            MarkOutcome::Unknown => None,
            MarkOutcome::AlreadyMarked(identity) => Some(identity),
            MarkOutcome::Marked { identity, .. } => Some(identity),
        }
    }
}

/// 今日考勤汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub date: String,
    pub total_staff: usize,
    pub present: usize,
    pub absent: usize,
    pub attendance_records: DayRecords,
}

pub struct AttendanceEngine<S, K = SystemClock, C = EuclideanComparator> {
    identities: IdentitySet,
    matcher: IdentityMatcher<C>,
    store: S,
    clock: K,

    /// 当前日期键
    today: String,

    /// 今日记录缓存
    today_records: DayRecords,

    /// 今日已打卡姓名 (当天只增不减)
    marked_today: HashSet<String>,
}

impl<S: LedgerStore, K: Clock, C: FaceComparator> AttendanceEngine<S, K, C> {
    /// 创建引擎, 从台账恢复今日状态
    pub fn new(
        identities: IdentitySet,
        matcher: IdentityMatcher<C>,
        store: S,
        clock: K,
    ) -> Result<Self> {
        let mut engine = Self {
            identities,
            matcher,
            store,
            clock,
            today: String::new(),
            today_records: DayRecords::new(),
            marked_today: HashSet::new(),
        };
        let today = engine.clock.date_key();
        engine.load_day(today)?;
        Ok(engine)
    }

    fn load_day(&mut self, date: String) -> Result<()> {
        let mut ledger = self.store.load()?;
        self.today_records = ledger.shift_remove(&date).unwrap_or_default();
        self.marked_today = self.today_records.keys().cloned().collect();
        log::info!(
            "📋 {} 已打卡 {}/{}",
            date,
            self.marked_today.len(),
            self.identities.len()
        );
        self.today = date;
        Ok(())
    }

    /// 日期变化时从台账重建今日状态, 返回是否发生跨天
    pub fn sync_day(&mut self) -> Result<bool> {
        let date = self.clock.date_key();
        if date == self.today {
            return Ok(false);
        }
        log::info!("📅 日期变更 {} → {}", self.today, date);
        self.load_day(date)?;
        Ok(true)
    }

    /// 识别一张人脸, 今日未打卡则写入台账
    pub fn record_if_absent(&mut self, embedding: &Embedding) -> Result<MarkOutcome> {
        let identity = match self.matcher.best_match(&self.identities, embedding) {
            MatchOutcome::Matched(identity) => identity,
            MatchOutcome::Unknown => {
                log::trace!("未识别人脸");
                return Ok(MarkOutcome::Unknown);
            }
        };

        self.sync_day()?;
        if self.marked_today.contains(&identity.name) {
            log::debug!("{} 今日已打卡", identity.name);
            return Ok(MarkOutcome::AlreadyMarked(identity));
        }

        let now = self.clock.now();
        let record = AttendanceRecord::present(time_key(&now));

        let mut ledger = self.store.load()?;
        ledger
            .entry(self.today.clone())
            .or_default()
            .insert(identity.name.clone(), record.clone());
        self.store.save(&ledger)?;

        self.today_records.insert(identity.name.clone(), record.clone());
        self.marked_today.insert(identity.name.clone());
        log::info!(
            "✅ {} 打卡成功 {} ({:.1}%)",
            identity.name,
            record.time,
            identity.confidence()
        );

        Ok(MarkOutcome::Marked { identity, record })
    }

    /// 今日汇总
    pub fn summary(&self) -> AttendanceSummary {
        let total_staff = self.identities.len();
        let present = self.marked_today.len();
        AttendanceSummary {
            date: self.today.clone(),
            total_staff,
            present,
            absent: total_staff.saturating_sub(present),
            attendance_records: self.today_records.clone(),
        }
    }

    /// 磁盘上的完整台账, 尚无台账时为空
    pub fn all_records(&self) -> Result<Ledger> {
        self.store.load()
    }

    pub fn is_marked(&self, name: &str) -> bool {
        self.marked_today.contains(name)
    }

    pub fn today(&self) -> &str {
        &self.today
    }

    pub fn identities(&self) -> &IdentitySet {
        &self.identities
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
