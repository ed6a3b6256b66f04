//! 通知信寄送 - 業務能力層
//!
//! 只負責「寄一封開通通知信」能力，不關心批次流程。
//!
//! 信件為中英雙語純文字，附上 Slurm 使用說明 PDF（若檔案存在），
//! 透過 STARTTLS 升級加密後再登入寄信。

use crate::config::Config;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// 通知信主旨（整批固定）
const SUBJECT: &str = "HPC 帳號建立通知 / HPC Account Created";

/// 通知信寄送服務
///
/// 職責：
/// - 組出雙語通知信並附上使用說明
/// - 每封信走一次加密的 SMTP 提交
/// - 只處理單一收件人
/// - 不關心帳號建立流程
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    ssh_host: String,
    ssh_port: u16,
    guide_paths: [String; 2],
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self> {
        // STARTTLS：先以明文連線，升級加密後才進行認證
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .context("無法建立 SMTP 傳輸設定")?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender: config.smtp_user.clone(),
            ssh_host: config.ssh_host.clone(),
            ssh_port: config.ssh_port,
            guide_paths: [config.pdf_guide_path.clone(), config.pdf_guide_path_2.clone()],
        })
    }

    /// 寄送開通通知信
    ///
    /// 地址無效或寄送過程中的任何錯誤都只記錄並回傳 false，
    /// 不會影響帳號建立的結果。
    pub async fn send_credentials(
        &self,
        recipient: &str,
        username: &str,
        password: &str,
        name: &str,
    ) -> bool {
        info!("正在準備通知信: {}", recipient);

        if !is_plausible_address(recipient) {
            error!("收件地址無效: '{}'", recipient);
            return false;
        }
        if !is_plausible_address(&self.sender) {
            error!("寄件地址 (SMTP_USER) 無效: '{}'", self.sender);
            return false;
        }

        match self.try_send(recipient, username, password, name).await {
            Ok(()) => {
                info!("📧 通知信已寄出: {}", recipient);
                true
            }
            Err(e) => {
                error!("寄送通知信到 {} 失敗: {:#}", recipient, e);
                false
            }
        }
    }

    async fn try_send(
        &self,
        recipient: &str,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<()> {
        let from: Mailbox = format!("HPC Admin <{}>", self.sender)
            .parse()
            .context("寄件地址格式錯誤")?;
        let to: Mailbox = recipient.parse().context("收件地址格式錯誤")?;

        let body = compose_body(name, username, password, &self.ssh_host, self.ssh_port);
        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body));

        for guide_path in &self.guide_paths {
            match load_attachment(guide_path)? {
                Some(part) => multipart = multipart.singlepart(part),
                None => warn!("找不到使用說明 {}，略過附件", guide_path),
            }
        }

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(SUBJECT)
            .multipart(multipart)
            .context("組信失敗")?;

        debug!("正在連線 SMTP 伺服器...");
        self.transport.send(message).await.context("SMTP 寄送失敗")?;

        Ok(())
    }
}

/// 最低限度的地址檢查：只要求包含 '@'
fn is_plausible_address(address: &str) -> bool {
    address.contains('@')
}

/// 將存在於磁碟上的 PDF 讀成附件；檔案不存在時回傳 None
fn load_attachment(path: &str) -> Result<Option<SinglePart>> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = std::fs::read(path).with_context(|| format!("無法讀取附件 {}", path))?;
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment.pdf".to_string());
    let content_type = ContentType::parse("application/pdf").context("附件型別無效")?;

    debug!("已附上使用說明: {}", path);
    Ok(Some(Attachment::new(file_name).body(content, content_type)))
}

/// 組出中英雙語的通知信內文
fn compose_body(name: &str, username: &str, password: &str, ssh_host: &str, ssh_port: u16) -> String {
    format!(
        r#"您好 {name}，

您申請的高效能運算（HPC）平台帳號已經建立，相關資訊如下：

帳號 (Username)：{username}
預設密碼 (Initial Password)：{password}

請於首次登入後立即修改密碼，以確保帳號安全。

登入方式：
  SSH：ssh {username}@{ssh_host} -p {ssh_port}

為協助您熟悉系統操作，本信附上 Slurm 簡易使用說明 PDF，供您參考。

若有任何使用上的問題，請聯繫系統管理團隊：
  ntueehpc@googlegroups.com

感謝您的使用，祝研究與學習順利。

HPC 系統管理團隊

━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

Dear {name},

Your High-Performance Computing (HPC) platform account has been successfully created.

Please find the account information below:

Username: {username}
Initial Password: {password}

Please change your password immediately after your first login for security.

Login methods:
  SSH: ssh {username}@{ssh_host} -p {ssh_port}

To help you get started, we have attached a Slurm User Guide (PDF).

For any questions or technical support, please contact the system administration team:
  ntueehpc@googlegroups.com

Thank you for using our HPC platform. We wish you success in your research and studies.

HPC System Administration Team
"#
    )
}
