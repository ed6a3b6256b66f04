//! 申請處理流程 - 流程層
//!
//! 核心職責：定義「一筆申請」的完整處理流程
//!
//! 流程順序：
//! 1. 遠端建立帳號（dry-run 模式只記錄不執行）
//! 2. 建立成功才寄通知信
//! 3. 寄信成敗獨立計算，不影響帳號建立的結果

use crate::config::Config;
use crate::models::ApplicantRecord;
use crate::services::{Mailer, Provisioner};
use anyhow::Result;
use tracing::{info, warn};

/// 單筆申請的處理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
    /// 帳號已建立
    Created {
        /// 通知信是否寄出
        email_sent: bool,
    },
    /// 帳號建立失敗（含重複帳號）
    Failed,
}

/// 申請處理流程
///
/// - 編排單筆申請的完整流程
/// - 不持有任何連線資源（每筆申請各自開關連線）
/// - 只依賴業務能力（services）
pub struct ApplicantFlow {
    provisioner: Provisioner,
    mailer: Mailer,
    dry_run: bool,
}

impl ApplicantFlow {
    /// 建立新的申請處理流程
    pub fn new(config: &Config, dry_run: bool) -> Result<Self> {
        Ok(Self {
            provisioner: Provisioner::new(config),
            mailer: Mailer::new(config)?,
            dry_run,
        })
    }

    pub async fn run(&self, record: &ApplicantRecord) -> FlowResult {
        if self.dry_run {
            info!(
                "[DRY RUN] 將建立帳號 {} (群組: {})",
                record.username,
                record.tier.code()
            );
            info!("[DRY RUN] 將寄送通知信到 {}", record.email);
            return FlowResult::Created { email_sent: true };
        }

        let outcome = self.provisioner.create_account(record).await;
        if !outcome.succeeded {
            return FlowResult::Failed;
        }

        let password = outcome.password.unwrap_or_default();
        let email_sent = self
            .mailer
            .send_credentials(&record.email, &record.username, &password, &record.display_name)
            .await;

        if !email_sent {
            warn!("⚠️ 帳號 {} 已建立但通知信寄送失敗", record.username);
        }

        FlowResult::Created { email_sent }
    }
}
