// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod attendance; // 考勤去重与台账
pub mod config; // 命令行与配置文件
pub mod counting; // 过线计数
pub mod detection; // 视觉子系统输入
pub mod error; // 错误类型
pub mod input; // 帧输入系统
pub mod pipeline; // 逐帧驱动

pub use crate::attendance::{AttendanceEngine, AttendanceSummary, MarkOutcome};
pub use crate::config::{Args, SentinelConfig};
pub use crate::counting::{CountingLine, LineCounter, Point};
pub use crate::error::{Result, SentinelError};
pub use crate::pipeline::{FrameReport, Sentinel};
