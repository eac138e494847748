//! 配置 - 命令行参数 + JSON配置文件

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::attendance::DEFAULT_TOLERANCE;
use crate::error::{Result, SentinelError};

/// 考勤 + 过线计数
#[derive(Parser, Debug)]
#[command(author, version, about = "CCTV 考勤与过线计数", long_about = None)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "sentinel.json")]
    pub config: PathBuf,

    /// 覆盖配置中的考勤台账路径
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// 覆盖配置中的人脸特征库路径
    #[arg(long)]
    pub identities: Option<PathBuf>,

    /// 覆盖配置中的计数线路径
    #[arg(long)]
    pub line: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 处理录制的检测事件流直到结束
    Run {
        /// 检测事件文件 (每行一帧JSON)
        #[arg(short, long)]
        events: PathBuf,
    },
    /// 输出今日考勤汇总
    Summary,
    /// 输出完整考勤台账
    Records,
}

/// 运行参数配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    // === 文件 ===
    pub identities_file: PathBuf, // 人脸特征库
    pub ledger_file: PathBuf,     // 考勤台账
    pub line_file: PathBuf,       // 计数线

    // === 考勤参数 ===
    pub tolerance: f32,               // 特征距离容差
    pub face_detection_interval: u32, // 每N帧处理一次人脸

    // === 计数参数 ===
    pub track_eviction_frames: u32, // 轨迹超过N帧未出现即丢弃 (0 = 不丢弃)

    // === 采集 ===
    pub channel_capacity: usize, // 采集队列长度
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            identities_file: PathBuf::from("face_encodings.json"),
            ledger_file: PathBuf::from("attendance.json"),
            line_file: PathBuf::from("line.json"),
            tolerance: DEFAULT_TOLERANCE,
            face_detection_interval: 5,
            track_eviction_frames: 0,
            channel_capacity: 120,
        }
    }
}

impl SentinelConfig {
    /// 从JSON文件加载, 文件不存在时写出默认配置
    pub fn load(path: &Path) -> Result<Self> {
        let config = match fs::read_to_string(path) {
            Ok(json) => {
                let config: Self =
                    serde_json::from_str(&json).map_err(|e| SentinelError::CorruptConfig {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?;
                log::info!("✅ 配置已从 {} 加载", path.display());
                config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("📝 配置文件不存在, 创建默认配置...");
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    log::warn!("⚠️ {}", e);
                }
                config
            }
            Err(e) => return Err(SentinelError::io(path, e)),
        };
        config.validate(path)?;
        Ok(config)
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| SentinelError::io(path, e))?;
        log::info!("💾 配置已保存到 {}", path.display());
        Ok(())
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: &str| SentinelError::CorruptConfig {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if self.face_detection_interval == 0 {
            return Err(invalid("face_detection_interval 必须大于 0"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(invalid("tolerance 必须是非负数"));
        }
        Ok(())
    }

    /// 应用命令行覆盖项
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(path) = &args.ledger {
            self.ledger_file = path.clone();
        }
        if let Some(path) = &args.identities {
            self.identities_file = path.clone();
        }
        if let Some(path) = &args.line {
            self.line_file = path.clone();
        }
    }

    /// 打印当前配置
    pub fn log_summary(&self) {
        log::info!("🎛️ 当前配置:");
        log::info!("  人脸特征库: {}", self.identities_file.display());
        log::info!("  考勤台账: {}", self.ledger_file.display());
        log::info!("  计数线: {}", self.line_file.display());
        log::info!("  匹配容差: {:.2}", self.tolerance);
        log::info!("  人脸处理间隔: 每 {} 帧", self.face_detection_interval);
        log::info!("  轨迹丢弃帧数: {}", self.track_eviction_frames);
    }
}
