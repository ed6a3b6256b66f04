//! 批次申請處理器 - 編排層
//!
//! ## 職責
//!
//! 本模組是整個應用的入口，負責整批申請的處理與統計。
//!
//! ## 核心功能
//!
//! 1. **應用初始化**：建立單筆申請的處理流程
//! 2. **名單載入**：讀入並驗證整份申請名單
//! 3. **循序處理**：一筆申請完整結束（開帳號、寄信）後才處理下一筆
//! 4. **全域統計**：維護六項計數並在結束時輸出總結
//!
//! ## 設計特點
//!
//! - **頂層編排**：不處理單筆申請的細節，向下委託 ApplicantFlow
//! - **單筆失敗不中斷**：每筆申請的錯誤只計入統計，整批照常跑完
//! - **dry-run**：驗證與記錄照常執行，但不接觸遠端主機與寄信伺服器

use crate::config::Config;
use crate::models::loaders::csv_loader;
use crate::models::{ApplicantRecord, RowOutcome};
use crate::workflow::{ApplicantFlow, FlowResult};
use anyhow::Result;
use std::path::Path;
use tracing::{error, info};

/// 應用主結構
pub struct App {
    flow: ApplicantFlow,
    dry_run: bool,
}

/// 整批處理統計
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// 名單中的申請總數（含被跳過的列）
    pub total: usize,
    /// 帳號建立成功數
    pub created: usize,
    /// 帳號建立失敗數
    pub failed: usize,
    /// 驗證不通過而跳過的列數
    pub skipped: usize,
    /// 通知信寄出數
    pub emails_sent: usize,
    /// 通知信寄送失敗數
    pub emails_failed: usize,
}

impl App {
    /// 初始化應用
    pub fn initialize(config: Config, dry_run: bool) -> Result<Self> {
        Ok(Self {
            flow: ApplicantFlow::new(&config, dry_run)?,
            dry_run,
        })
    }

    /// 依名單順序逐筆處理申請
    pub async fn run(&self, csv_path: &Path) -> Result<RunStats> {
        info!(
            "{}正在處理申請名單: {}",
            if self.dry_run { "[DRY RUN] " } else { "" },
            csv_path.display()
        );

        let rows = csv_loader::load_applicants(csv_path)?;
        let mut stats = RunStats::default();

        // 嚴格循序：一筆申請的連線與信件都結束後才開始下一筆
        for row in rows {
            stats.total += 1;
            match row {
                RowOutcome::Skipped { .. } => {
                    // 跳過原因已在載入階段記錄
                    stats.skipped += 1;
                }
                RowOutcome::Valid(record) => {
                    log_record_banner(&record);
                    match self.flow.run(&record).await {
                        FlowResult::Created { email_sent } => {
                            stats.created += 1;
                            if email_sent {
                                stats.emails_sent += 1;
                            } else {
                                stats.emails_failed += 1;
                            }
                        }
                        FlowResult::Failed => {
                            error!("❌ 建立帳號 {} 失敗", record.username);
                            stats.failed += 1;
                        }
                    }
                }
            }
        }

        log_summary(&stats);
        Ok(stats)
    }
}

// ========== 日誌輔助函數 ==========

fn log_record_banner(record: &ApplicantRecord) {
    info!("\n{}", "=".repeat(60));
    info!(
        "處理中: {} ({}) - {}",
        record.display_name, record.student_id, record.username
    );
    info!("Email: {}", record.email);
    info!("群組: {} ({})", record.tier.code(), record.tier.name());
    if let Some(advisor) = &record.advisor_name {
        info!("指導教授: {}", advisor);
    }
    info!("{}", "=".repeat(60));
}

fn log_summary(stats: &RunStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 處理結果統計");
    info!("{}", "=".repeat(60));
    info!("申請總數: {}", stats.total);
    info!("✅ 建立成功: {}", stats.created);
    info!("❌ 建立失敗: {}", stats.failed);
    info!("跳過: {}", stats.skipped);
    info!("📧 通知信寄出: {}", stats.emails_sent);
    info!("通知信失敗: {}", stats.emails_failed);
    info!("{}", "=".repeat(60));
}
