/// 检测输入 (Detection Input)
///
/// 视觉子系统每帧交付的结构化事件
/// - FaceDetection:    人脸特征 + 人脸框
/// - TrackedDetection: 跟踪ID + 目标框
pub mod types;

pub use types::{BBox, Embedding, FaceDetection, FrameEvents, TrackId, TrackedDetection};
