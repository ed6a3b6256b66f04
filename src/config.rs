use crate::error::AppError;

/// 程式設定
///
/// 啟動時從環境變數載入一次，之後以唯讀引用傳給各元件。
#[derive(Clone, Debug)]
pub struct Config {
    // --- SMTP 設定 ---
    /// 寄信伺服器位址
    pub smtp_server: String,
    /// 寄信伺服器連接埠
    pub smtp_port: u16,
    /// 寄件帳號（同時作為寄件地址）
    pub smtp_user: String,
    /// 寄件密碼
    pub smtp_pass: String,
    // --- SSH 設定 ---
    /// 管理主機位址
    pub ssh_host: String,
    /// 管理主機連接埠
    pub ssh_port: u16,
    /// 管理主機帳號
    pub ssh_user: String,
    /// 管理主機密碼（也用於 sudo 提權）
    pub ssh_pass: String,
    /// SSH 金鑰檔路徑（設定且存在時優先於密碼）
    pub ssh_key_file: Option<String>,
    /// 是否接受未知的主機金鑰
    pub accept_unknown_host_keys: bool,
    /// 遠端開帳號腳本路徑
    pub add_user_script_path: String,
    // --- LDAP 設定（重複帳號檢查用）---
    /// LDAP 伺服器 URI
    pub ldap_uri: String,
    /// LDAP 管理者 DN
    pub ldap_bind_dn: String,
    /// LDAP 管理者密碼
    pub ldap_bind_password: String,
    /// 帳號搜尋的 base DN
    pub ldap_base_dn: String,
    // --- 附件設定 ---
    /// Slurm 使用說明 PDF 路徑
    pub pdf_guide_path: String,
    /// 第二份使用說明 PDF 路徑
    pub pdf_guide_path_2: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smtp_server: String::new(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_pass: String::new(),
            ssh_host: String::new(),
            ssh_port: 2201,
            ssh_user: String::new(),
            ssh_pass: String::new(),
            ssh_key_file: None,
            accept_unknown_host_keys: true,
            add_user_script_path: "/home/sudoer1/add_user.sh".to_string(),
            ldap_uri: "ldap://192.168.110.21".to_string(),
            ldap_bind_dn: "cn=Manager,dc=hpc,dc=ntuee,dc=org".to_string(),
            ldap_bind_password: "ntuee123".to_string(),
            ldap_base_dn: "ou=People,dc=hpc,dc=ntuee,dc=org".to_string(),
            pdf_guide_path: "Slurm_User_Guide.pdf".to_string(),
            pdf_guide_path_2: "Slurm_User_Guide_EN.pdf".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            smtp_server: std::env::var("SMTP_SERVER").unwrap_or(default.smtp_server),
            smtp_port: std::env::var("SMTP_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.smtp_port),
            smtp_user: std::env::var("SMTP_USER").unwrap_or(default.smtp_user),
            smtp_pass: std::env::var("SMTP_PASS").unwrap_or(default.smtp_pass),
            ssh_host: std::env::var("SSH_HOST").unwrap_or(default.ssh_host),
            ssh_port: std::env::var("SSH_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.ssh_port),
            ssh_user: std::env::var("SSH_USER").unwrap_or(default.ssh_user),
            ssh_pass: std::env::var("SSH_PASS").unwrap_or(default.ssh_pass),
            ssh_key_file: std::env::var("SSH_KEY_FILE").ok().filter(|v| !v.is_empty()),
            accept_unknown_host_keys: std::env::var("ACCEPT_UNKNOWN_HOST_KEYS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.accept_unknown_host_keys),
            add_user_script_path: std::env::var("ADD_USER_SCRIPT_PATH").unwrap_or(default.add_user_script_path),
            ldap_uri: std::env::var("LDAP_URI").unwrap_or(default.ldap_uri),
            ldap_bind_dn: std::env::var("LDAP_BIND_DN").unwrap_or(default.ldap_bind_dn),
            ldap_bind_password: std::env::var("LDAP_BIND_PASSWORD").unwrap_or(default.ldap_bind_password),
            ldap_base_dn: std::env::var("LDAP_BASE_DN").unwrap_or(default.ldap_base_dn),
            pdf_guide_path: std::env::var("PDF_GUIDE_PATH").unwrap_or(default.pdf_guide_path),
            pdf_guide_path_2: std::env::var("PDF_GUIDE_PATH_2").unwrap_or(default.pdf_guide_path_2),
        }
    }

    /// 檢查必要設定是否齊全
    ///
    /// 缺少任何一項都會在處理名單前直接中止整個批次。
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("SMTP_SERVER", &self.smtp_server),
            ("SMTP_USER", &self.smtp_user),
            ("SMTP_PASS", &self.smtp_pass),
            ("SSH_HOST", &self.ssh_host),
            ("SSH_USER", &self.ssh_user),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingConfig {
                missing: missing.join(", "),
            })
        }
    }
}
