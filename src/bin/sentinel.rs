/// CCTV 考勤与过线计数 (Sentinel)
///
/// 系统架构:
/// 1. 采集线程: 读取视觉子系统输出的检测事件 (独立工作线程)
/// 2. 主线程:   逐帧驱动考勤引擎与过线计数器
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cctv_sentinel::attendance::{
    AttendanceEngine, IdentityMatcher, IdentitySet, JsonLedgerStore, SystemClock,
};
use cctv_sentinel::config::{Args, Command, SentinelConfig};
use cctv_sentinel::counting::{CountingLine, LineCounter};
use cctv_sentinel::input::{spawn_acquisition, JsonlFrameSource};
use cctv_sentinel::pipeline::Sentinel;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = SentinelConfig::load(&args.config)
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?;
    config.apply_overrides(&args);

    match &args.command {
        Command::Run { events } => run(&config, events),
        Command::Summary => {
            let engine = attendance_engine(&config)?;
            println!("{}", serde_json::to_string_pretty(&engine.summary())?);
            Ok(())
        }
        Command::Records => {
            let engine = attendance_engine(&config)?;
            let records = engine.all_records().context("读取考勤台账失败")?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
    }
}

fn attendance_engine(config: &SentinelConfig) -> Result<AttendanceEngine<JsonLedgerStore>> {
    let identities = IdentitySet::load(&config.identities_file).context("加载人脸特征库失败")?;
    let store = JsonLedgerStore::new(&config.ledger_file);
    let engine = AttendanceEngine::new(
        identities,
        IdentityMatcher::new(config.tolerance),
        store,
        SystemClock,
    )
    .context("加载考勤台账失败")?;
    Ok(engine)
}

fn run(config: &SentinelConfig, events: &Path) -> Result<()> {
    println!("🚀 考勤与过线计数系统启动");
    config.log_summary();

    let attendance = attendance_engine(config)?;
    let line = CountingLine::load(&config.line_file).context("加载计数线失败")?;
    let counter = LineCounter::with_eviction(line, config.track_eviction_frames);
    let mut sentinel = Sentinel::new(attendance, counter, config.face_detection_interval);

    // ========== 启动采集线程 ==========
    let source = JsonlFrameSource::open(events)?;
    let (rx, handle) = spawn_acquisition(source, config.channel_capacity);

    // ========== 主线程: 逐帧处理 ==========
    let result = sentinel.run(rx);
    if handle.join().is_err() {
        log::error!("❌ 采集线程异常退出");
    }
    let stats = result.context("处理检测事件失败")?;

    let summary = sentinel.attendance().summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("People Count: {}", stats.count);
    Ok(())
}
