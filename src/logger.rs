//! 日誌初始化
//!
//! 每次執行在 logs/ 下建立一個帶時間戳記的日誌檔，
//! 同時輸出到終端與檔案。

use anyhow::Result;
use chrono::Local;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日誌，回傳本次執行的日誌檔路徑
pub fn init() -> Result<PathBuf> {
    let log_dir = PathBuf::from("logs");
    fs::create_dir_all(&log_dir)?;

    let file_name = format!("hpc_account_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let log_path = log_dir.join(file_name);
    let log_file = File::create(&log_path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(log_file)))
        .init();

    Ok(log_path)
}
