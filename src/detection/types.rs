/// 视觉子系统输入数据结构定义
/// Data structures delivered by the vision collaborators, one batch per frame
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::counting::Point;

// ========== 类型别名 ==========

/// 跟踪ID (由外部跟踪器分配, 在目标生命周期内稳定)
pub type TrackId = u64;

// ========== 数据结构 ==========

/// 检测框 (Detection bounding box)
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub class_id: u32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            ..Default::default()
        }
    }

    /// 获取中心点 (像素坐标, 先取整再求中点)
    ///
    /// 越界坐标取整时饱和到 i64 边界, NaN 取 0
    pub fn center(&self) -> Point {
        Point::new(
            midpoint(self.x1 as i64, self.x2 as i64),
            midpoint(self.y1 as i64, self.y2 as i64),
        )
    }
}

/// 向零取整的整数中点, 在 i128 中求和避免溢出
fn midpoint(a: i64, b: i64) -> i64 {
    ((i128::from(a) + i128::from(b)) / 2) as i64
}

/// 人脸特征向量 (定长 float32 向量)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<f32>", into = "Vec<f32>")]
pub struct Embedding {
    data: Array1<f32>,
}

impl Embedding {
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data: Array1::from(data),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 欧氏距离, 维度不一致时返回 None
    pub fn distance(&self, other: &Embedding) -> Option<f32> {
        if self.len() != other.len() {
            return None;
        }
        let diff = &self.data - &other.data;
        Some(diff.mapv(|x| x * x).sum().sqrt())
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(embedding: Embedding) -> Self {
        embedding.data.to_vec()
    }
}

/// 检测到的人脸 (人脸识别子系统 → 考勤引擎)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub embedding: Embedding,
    pub bbox: BBox,
}

/// 跟踪目标 (跟踪器 → 计数器), 类别已由跟踪器过滤
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedDetection {
    pub track_id: TrackId,
    pub bbox: BBox,
}

/// 单帧检测事件
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameEvents {
    #[serde(default)]
    pub faces: Vec<FaceDetection>,
    #[serde(default)]
    pub tracks: Vec<TrackedDetection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_truncates_like_pixels() {
        let bbox = BBox::new(10.7, 20.2, 31.9, 41.0);
        // (10 + 31) / 2 = 20, (20 + 41) / 2 = 30
        assert_eq!(bbox.center(), Point::new(20, 30));
    }

    #[test]
    fn test_center_of_out_of_range_bbox() {
        let far = BBox::new(1e30, 0.0, 1e30, 0.0);
        assert_eq!(far.center(), Point::new(i64::MAX, 0));

        let spread = BBox::new(-1e30, -1e30, 1e30, f32::NAN);
        assert_eq!(spread.center(), Point::new(0, i64::MIN / 2));

        let negative = BBox::new(-3.0, -5.0, 0.0, 0.0);
        assert_eq!(negative.center(), Point::new(-1, -2));
    }

    #[test]
    fn test_distance() {
        let a = Embedding::new(vec![0.0, 0.0]);
        let b = Embedding::new(vec![3.0, 4.0]);
        assert!((a.distance(&b).unwrap() - 5.0).abs() < 1e-6);
        assert_eq!(a.distance(&Embedding::new(vec![1.0])), None);
    }

    #[test]
    fn test_frame_events_defaults() {
        let events: FrameEvents =
            serde_json::from_str(r#"{"tracks":[{"track_id":7,"bbox":{"x1":0,"y1":0,"x2":4,"y2":4}}]}"#)
                .unwrap();
        assert!(events.faces.is_empty());
        assert_eq!(events.tracks[0].track_id, 7);
        assert_eq!(events.tracks[0].bbox.center(), Point::new(2, 2));
    }
}
