/// 考勤系统 (Attendance System)
///
/// - Ledger:   考勤台账存储 (日期 → 姓名 → 记录)
/// - Identity: 已注册人员特征库
/// - Matcher:  人脸特征匹配
/// - Engine:   每人每天一次的去重打卡
pub mod clock;
pub mod engine;
pub mod identity;
pub mod ledger;
pub mod matcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{AttendanceEngine, AttendanceSummary, MarkOutcome};
pub use identity::IdentitySet;
pub use ledger::{AttendanceRecord, DayRecords, JsonLedgerStore, Ledger, LedgerStore, MemoryLedgerStore};
pub use matcher::{
    Candidate, EuclideanComparator, FaceComparator, IdentityMatch, IdentityMatcher, MatchOutcome,
    DEFAULT_TOLERANCE,
};
