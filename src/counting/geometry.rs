//! 计数线几何 (Line geometry)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentinelError};

/// 像素坐标点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// 点位于有向线段的哪一侧
///
/// 二维叉积 `(b - a) × (p - a)`, 落在线上时为 0
///
/// 在 i128 中计算; 只有坐标接近 i64 边界时乘积才会饱和, 符号不变
pub fn side_of_line(p: Point, a: Point, b: Point) -> i128 {
    let delta = |to: i64, from: i64| i128::from(to) - i128::from(from);
    let lhs = delta(b.x, a.x).saturating_mul(delta(p.y, a.y));
    let rhs = delta(b.y, a.y).saturating_mul(delta(p.x, a.x));
    lhs.saturating_sub(rhs)
}

/// 侧别 (0 归入非负侧)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Negative,
    NonNegative,
}

impl Side {
    pub fn of(value: i128) -> Self {
        if value < 0 {
            Side::Negative
        } else {
            Side::NonNegative
        }
    }
}

/// 计数线 (line.json: `{ "x1", "y1", "x2", "y2" }`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountingLine {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl CountingLine {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    /// 从JSON文件加载, 文件缺失或格式错误都无法计数
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| SentinelError::io(path, e))?;
        let line: Self =
            serde_json::from_str(&json).map_err(|source| SentinelError::CorruptLine {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!(
            "✅ 计数线已加载: ({}, {}) → ({}, {})",
            line.x1,
            line.y1,
            line.x2,
            line.y2
        );
        Ok(line)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn side_value(&self, p: Point) -> i128 {
        side_of_line(p, self.start(), self.end())
    }

    pub fn side(&self, p: Point) -> Side {
        Side::of(self.side_value(p))
    }
}
