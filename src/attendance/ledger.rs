//! 考勤台账存储 (Ledger Store)
//!
//! 持久化格式:
//! ```json
//! { "2024-05-01": { "alice": { "time": "08:59:12", "status": "Present" } } }
//! ```
//! 每次打卡都读取整个台账、修改后整体写回 (单写者, 不加锁)。

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SentinelError};

pub const STATUS_PRESENT: &str = "Present";

/// 单条考勤记录, 未知字段原样保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub time: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttendanceRecord {
    pub fn present(time: String) -> Self {
        Self {
            time,
            status: STATUS_PRESENT.to_string(),
            extra: Map::new(),
        }
    }
}

/// 某一天的记录: 姓名 → 记录 (保持打卡顺序)
pub type DayRecords = IndexMap<String, AttendanceRecord>;

/// 完整台账: 日期 → 当天记录 (保持文件中的顺序)
pub type Ledger = IndexMap<String, DayRecords>;

/// 台账存储接口
pub trait LedgerStore {
    /// 读取完整台账, 尚不存在时返回空台账
    fn load(&self) -> Result<Ledger>;

    /// 写回完整台账快照
    fn save(&mut self, ledger: &Ledger) -> Result<()>;

    /// 本进程内已写入的快照次数
    fn writes(&self) -> u64;
}

/// JSON文件台账 (写临时文件后原子替换)
#[derive(Debug)]
pub struct JsonLedgerStore {
    path: PathBuf,
    writes: u64,
}

impl JsonLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: 0,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "attendance.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for JsonLedgerStore {
    fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            return Ok(Ledger::new());
        }
        let json = fs::read_to_string(&self.path).map_err(|e| SentinelError::io(&self.path, e))?;
        serde_json::from_str(&json).map_err(|source| SentinelError::CorruptLedger {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&mut self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SentinelError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(ledger)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| SentinelError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| SentinelError::io(&self.path, e))?;

        self.writes += 1;
        Ok(())
    }

    fn writes(&self) -> u64 {
        self.writes
    }
}

/// 内存台账 (不落盘)
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledger: Ledger,
    writes: u64,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self { ledger, writes: 0 }
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> Result<Ledger> {
        Ok(self.ledger.clone())
    }

    fn save(&mut self, ledger: &Ledger) -> Result<()> {
        self.ledger = ledger.clone();
        self.writes += 1;
        Ok(())
    }

    fn writes(&self) -> u64 {
        self.writes
    }
}
