//! 帳號開通 - 業務能力層
//!
//! 只負責「在遠端主機開一個帳號」能力，不關心批次流程。
//!
//! 流程：SSH 連線 → LDAP 重複檢查 → 互動式執行 add_user.sh →
//! 收集輸出 → 關鍵字判讀。所有錯誤都在這一層攔截，
//! 呼叫端只會拿到成功或失敗的結果。

use crate::config::Config;
use crate::infrastructure::SshShell;
use crate::models::ApplicantRecord;
use crate::services::outcome;
use anyhow::Result;
use std::time::Duration;
use tokio::task;
use tracing::{error, info, warn};

/// 等待 sudo 密碼提示與提權完成的時間
const SUDO_SETTLE: Duration = Duration::from_secs(3);
/// 逐行餵入腳本輸入之間的間隔
const INPUT_DELAY: Duration = Duration::from_secs(1);
/// 兩次輸出輪詢之間的間隔
const POLL_PAUSE: Duration = Duration::from_millis(500);
/// 輸出輪詢次數上限，避免腳本沒結束時卡死
const MAX_POLL_ATTEMPTS: usize = 5;

/// 單筆開帳號結果
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// 帳號是否建立成功
    pub succeeded: bool,
    /// 生效的密碼（自訂密碼或腳本產生的密碼）
    pub password: Option<String>,
    /// 遠端腳本的完整輸出
    pub transcript: String,
}

impl ProvisionOutcome {
    fn failure(transcript: String) -> Self {
        Self {
            succeeded: false,
            password: None,
            transcript,
        }
    }
}

/// 帳號開通服務
///
/// 職責：
/// - 每筆申請開一條 SSH 連線，結束時必定關閉
/// - 互動式驅動遠端 add_user.sh
/// - 不出現 Vec<ApplicantRecord>
/// - 不關心統計與寄信
pub struct Provisioner {
    config: Config,
}

impl Provisioner {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 在遠端主機上建立帳號
    ///
    /// 認證失敗、連線中斷與非預期錯誤都會被攔截並記錄，
    /// 一律轉成失敗結果回傳，不會向呼叫端拋出。
    pub async fn create_account(&self, record: &ApplicantRecord) -> ProvisionOutcome {
        let config = self.config.clone();
        let record = record.clone();

        // libssh2 是阻塞式 API，整段流程丟到 blocking 執行緒
        match task::spawn_blocking(move || run_provisioning(&config, &record)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("開帳號工作執行失敗: {}", e);
                ProvisionOutcome::failure(String::new())
            }
        }
    }
}

fn run_provisioning(config: &Config, record: &ApplicantRecord) -> ProvisionOutcome {
    match try_provision(config, record) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("建立帳號 {} 時發生錯誤: {:#}", record.username, e);
            ProvisionOutcome::failure(String::new())
        }
    }
}

fn try_provision(config: &Config, record: &ApplicantRecord) -> Result<ProvisionOutcome> {
    let shell = SshShell::connect(config)?;

    info!(
        "正在建立帳號: {} (群組: {}, 指導教授: {})",
        record.username,
        record.tier.code(),
        record.advisor_name.as_deref().unwrap_or("N/A")
    );

    // 重複檢查：LDAP 已有同名帳號就不再嘗試建立
    if ldap_entry_exists(&shell, config, &record.username)? {
        warn!("⚠️ 帳號 {} 已存在於 LDAP，跳過建立", record.username);
        return Ok(ProvisionOutcome::failure(String::new()));
    }

    let transcript = drive_add_user_script(&shell, config, record)?;
    info!("腳本輸出:\n{}", transcript);

    if !outcome::classify_transcript(&transcript, &record.username) {
        error!("腳本執行可能失敗，請檢查日誌");
        return Ok(ProvisionOutcome::failure(transcript));
    }

    info!("✅ 帳號建立成功: {}", record.username);

    // 自訂密碼優先；留空時從輸出擷取腳本產生的密碼
    let password = match &record.explicit_password {
        Some(password) => Some(password.clone()),
        None => {
            let extracted = outcome::extract_generated_password(&transcript);
            if extracted.is_some() {
                info!("已從腳本輸出擷取產生的密碼");
            }
            extracted
        }
    };

    Ok(ProvisionOutcome {
        succeeded: true,
        password,
        transcript,
    })
}

/// 查詢 LDAP 是否已有同名帳號
fn ldap_entry_exists(shell: &SshShell, config: &Config, username: &str) -> Result<bool> {
    let command = format!(
        "ldapsearch -x -H {} -D '{}' -w '{}' -b '{}' '(cn={})'",
        config.ldap_uri,
        config.ldap_bind_dn,
        config.ldap_bind_password,
        config.ldap_base_dn,
        username
    );
    let output = shell.exec(&command)?;
    Ok(output.contains(&format!("cn: {}", username)))
}

/// 以固定延遲逐行餵入 add_user.sh 所需的輸入，回傳收集到的完整輸出
///
/// 遠端腳本的提示沒有可靠的同步訊號，只能依賴固定等待時間；
/// 提示若晚於等待時間出現，輸入順序會錯位，輸出也可能被截斷。
fn drive_add_user_script(
    shell: &SshShell,
    config: &Config,
    record: &ApplicantRecord,
) -> Result<String> {
    let mut channel = shell.open_shell()?;

    info!("正在執行 add_user.sh ({})...", record.username);
    channel.send_line(&format!("sudo {}", config.add_user_script_path))?;
    std::thread::sleep(SUDO_SETTLE); // 等待 sudo 密碼提示

    channel.send_line(&config.ssh_pass)?;
    std::thread::sleep(SUDO_SETTLE);

    channel.send_line(&record.username)?;
    std::thread::sleep(INPUT_DELAY);
    channel.send_line(&record.tier.code().to_string())?;
    std::thread::sleep(INPUT_DELAY);
    channel.send_line(record.advisor_name.as_deref().unwrap_or(""))?;
    std::thread::sleep(INPUT_DELAY);
    // 密碼列：留空代表由遠端腳本產生
    channel.send_line(record.explicit_password.as_deref().unwrap_or(""))?;
    std::thread::sleep(INPUT_DELAY);

    // 收集所有輸出：最多輪詢 MAX_POLL_ATTEMPTS 次，沒有資料就提前結束
    let mut transcript = String::new();
    for _ in 0..MAX_POLL_ATTEMPTS {
        let chunk = channel.read_available()?;
        if chunk.is_empty() {
            break;
        }
        transcript.push_str(&chunk);
        std::thread::sleep(POLL_PAUSE);
    }

    channel.close();
    Ok(transcript)
}
