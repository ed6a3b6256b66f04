//! SSH 連線 - 基礎設施層
//!
//! 持有唯一的 SSH session 資源，只暴露「執行指令」與「互動式 shell」能力

use crate::config::Config;
use anyhow::{Context, Result};
use ssh2::{CheckResult, KnownHostFileKind, Session};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// SSH 連線
///
/// 職責：
/// - 持有唯一的 Session 資源
/// - 暴露 exec() 與 open_shell() 能力
/// - 不認識 ApplicantRecord
/// - 不處理業務流程
pub struct SshShell {
    session: Session,
}

impl SshShell {
    /// 建立已認證的 SSH 連線
    ///
    /// 金鑰檔有設定且存在時優先使用金鑰，否則退回密碼認證。
    pub fn connect(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.ssh_host, config.ssh_port);
        info!("🔗 正在連線 SSH 伺服器 {}", addr);

        let tcp = TcpStream::connect(&addr).with_context(|| format!("無法連線到 {}", addr))?;
        let mut session = Session::new().context("無法建立 SSH session")?;
        session.set_tcp_stream(tcp);
        session.handshake().context("SSH 交握失敗")?;

        if config.accept_unknown_host_keys {
            // 沿用既有行為：不驗證主機金鑰，首次連線的主機一律信任
            debug!("主機金鑰驗證已停用 (ACCEPT_UNKNOWN_HOST_KEYS=true)");
        } else {
            verify_host_key(&session, &config.ssh_host, config.ssh_port)?;
        }

        match &config.ssh_key_file {
            Some(key_file) if Path::new(key_file).exists() => {
                debug!("使用金鑰檔認證: {}", key_file);
                session
                    .userauth_pubkey_file(&config.ssh_user, None, Path::new(key_file), None)
                    .context("SSH 金鑰認證失敗")?;
            }
            _ => {
                session
                    .userauth_password(&config.ssh_user, &config.ssh_pass)
                    .context("SSH 密碼認證失敗")?;
            }
        }

        debug!("SSH 連線認證成功");
        Ok(Self { session })
    }

    /// 執行單一指令並回傳完整輸出
    pub fn exec(&self, command: &str) -> Result<String> {
        let mut channel = self.session.channel_session()?;
        channel.exec(command)?;

        let mut raw = Vec::new();
        channel.read_to_end(&mut raw)?;
        channel.wait_close()?;

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// 開啟帶 PTY 的互動式 shell
    pub fn open_shell(&self) -> Result<InteractiveChannel> {
        let mut channel = self.session.channel_session()?;
        channel.request_pty("xterm", None, None)?;
        channel.shell()?;

        Ok(InteractiveChannel {
            channel,
            session: self.session.clone(),
        })
    }
}

/// 互動式 shell 通道
///
/// 提供逐行送出輸入與非阻塞讀取輸出的能力，
/// 對應遠端腳本一問一答的操作方式。
pub struct InteractiveChannel {
    channel: ssh2::Channel,
    session: Session,
}

impl InteractiveChannel {
    /// 送出一行輸入（自動補換行）
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        self.channel.write_all(line.as_bytes())?;
        self.channel.write_all(b"\n")?;
        self.channel.flush()?;
        Ok(())
    }

    /// 讀取目前所有可讀的輸出
    ///
    /// 沒有資料時立即回傳空字串，不會阻塞等待。
    pub fn read_available(&mut self) -> Result<String> {
        self.session.set_blocking(false);

        let mut collected = Vec::new();
        let mut buf = [0u8; 8192];
        let outcome = loop {
            match self.channel.read(&mut buf) {
                Ok(0) => break Ok(()),
                Ok(n) => collected.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.session.set_blocking(true);
        outcome?;

        Ok(String::from_utf8_lossy(&collected).into_owned())
    }

    /// 關閉通道
    pub fn close(mut self) {
        if let Err(e) = self.channel.close() {
            warn!("關閉 SSH 通道時發生錯誤: {}", e);
        }
    }
}

/// 以 ~/.ssh/known_hosts 驗證主機金鑰，未知或不符即中止
fn verify_host_key(session: &Session, host: &str, port: u16) -> Result<()> {
    let mut known_hosts = session.known_hosts()?;
    let file = known_hosts_file().context("找不到 HOME 目錄，無法讀取 known_hosts")?;
    known_hosts
        .read_file(&file, KnownHostFileKind::OpenSSH)
        .with_context(|| format!("無法讀取 {}", file.display()))?;

    let (key, _) = session
        .host_key()
        .context("伺服器未提供主機金鑰")?;

    match known_hosts.check_port(host, port, key) {
        CheckResult::Match => Ok(()),
        CheckResult::NotFound => anyhow::bail!("未知的主機金鑰: {}", host),
        CheckResult::Mismatch => anyhow::bail!("主機金鑰與 known_hosts 記錄不符: {}", host),
        CheckResult::Failure => anyhow::bail!("主機金鑰檢查失敗: {}", host),
    }
}

fn known_hosts_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".ssh").join("known_hosts"))
}
