/// 过线计数系统 (Line-Crossing Counting)
///
/// - Geometry: 点在有向线段哪一侧
/// - Counter:  基于轨迹的单向过线计数
pub mod counter;
pub mod geometry;

pub use counter::{Crossing, LineCounter};
pub use geometry::{side_of_line, CountingLine, Point, Side};
