//! 时钟 (Wall clock)

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Local, NaiveDateTime};

pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// 日期键 `YYYY-MM-DD`
    fn date_key(&self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }
}

/// 本地系统时间
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 可手动拨动的时钟 (克隆后共享同一时间)
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// 时间键 `HH:MM:SS`
pub fn time_key(now: &NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}
