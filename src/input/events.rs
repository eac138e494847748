/// 录制的检测事件流 (JSON Lines)
/// Recorded detection events, one frame per line
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::detection::FrameEvents;
use crate::error::{Result, SentinelError};

pub struct JsonlFrameSource<R> {
    reader: R,
    origin: PathBuf,
    line_no: usize,
    buf: String,
}

impl JsonlFrameSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| SentinelError::io(path, e))?;
        log::info!("📹 事件源: {}", path.display());
        let mut source = Self::new(BufReader::new(file));
        source.origin = path.to_path_buf();
        Ok(source)
    }
}

impl<R: BufRead> JsonlFrameSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            origin: PathBuf::from("<stream>"),
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> FrameSource for JsonlFrameSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameEvents>> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_line(&mut self.buf)
                .map_err(|e| SentinelError::io(&self.origin, e))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            let events = serde_json::from_str(line).map_err(|source| {
                SentinelError::InvalidEvent {
                    line: self.line_no,
                    source,
                }
            })?;
            return Ok(Some(events));
        }
    }
}
