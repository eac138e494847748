//! 错误类型 (Error taxonomy)
//!
//! 引擎内部的 "未识别" 与 "重复打卡" 不是错误,不会出现在这里。
//! 存储读写失败以具体类型返回给调用方,由外层决定重试或退出。

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("读写文件失败 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("考勤记录文件已损坏 {}: {source}", .path.display())]
    CorruptLedger {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("人脸特征库已损坏 {}: {reason}", .path.display())]
    CorruptIdentities { path: PathBuf, reason: String },

    #[error("计数线配置无效 {}: {source}", .path.display())]
    CorruptLine {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置文件无效 {}: {reason}", .path.display())]
    CorruptConfig { path: PathBuf, reason: String },

    #[error("检测事件第 {line} 行格式错误: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SentinelError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SentinelError>;
