//! 輸出判讀 - 業務能力層
//!
//! 只負責「從遠端腳本輸出判斷成敗」能力，不關心流程。
//!
//! 遠端腳本沒有結構化的結束碼，成敗只能靠關鍵字比對終端輸出。
//! 已知限制：輸出中若出現無害的 "error" / "failed" 字樣
//! 仍會被判定為失敗，此行為刻意保留不做改動。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// 成功關鍵字（全部以小寫比對）
const SUCCESS_KEYWORDS: [&str; 4] = [
    "done ! please check",
    "successfully",
    "storage directory",
    "adding user(s)",
];

/// 失敗關鍵字，出現任何一個即否決成功判定
const ERROR_KEYWORDS: [&str; 4] = [
    "error",
    "failed",
    "invalid group",
    "username and group are required",
];

static GENERATED_PASSWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)generated password:\s*(\S+)").expect("密碼擷取 regex 無效")
});

/// 判斷遠端腳本輸出是否代表開帳號成功
///
/// 成功條件：至少命中一個成功關鍵字，且完全沒有失敗關鍵字。
pub fn classify_transcript(transcript: &str, username: &str) -> bool {
    let lower = transcript.to_lowercase();
    let user_added = format!("user {} added to ldap successfully", username.to_lowercase());

    let success = SUCCESS_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
        || lower.contains(&user_added);
    let has_errors = ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword));

    debug!(
        "輸出判讀: 成功關鍵字 {}，失敗關鍵字 {}",
        success, has_errors
    );

    success && !has_errors
}

/// 從輸出中擷取遠端腳本產生的密碼
///
/// 比對不分大小寫的 "Generated password:" 標記，
/// 取其後第一段非空白字元。
pub fn extract_generated_password(transcript: &str) -> Option<String> {
    GENERATED_PASSWORD
        .captures(transcript)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 實際擷取自 add_user.sh 的一段輸出
    const SAMPLE_TRANSCRIPT: &str = r#"sudoer1@A12-01:~$ sudo ./add_user.sh
Enter the username to add: b10202010
Enter the group (1: undergrad, 2: master, 3: phd, 4: professor, 5: admin): 1
Enter the professor's name: (required for master and phd, else leave blank):
Enter the password (leave blank to generate a random one):
Generated password: YUQ54LyaHtnS
adding new entry "cn=b10202010,ou=People,dc=hpc,dc=ntuee,dc=org"

User b10202010 added to LDAP successfully!
Storage directory /storage/undergrad/b10202010 created!
create account: b10202010
 Adding Account(s)
  b10202010
 Settings
  QOS           = studentbasic
  DefQOS        = studentbasic
  done ! please check with the following command
  sacctmgr show assoc where user=b10202010
"#;

    #[test]
    fn test_sample_transcript_is_success() {
        assert!(classify_transcript(SAMPLE_TRANSCRIPT, "b10202010"));
    }

    #[test]
    fn test_success_requires_affirmative_keyword() {
        assert!(!classify_transcript("Enter the username to add:", "b10202010"));
        assert!(!classify_transcript("", "b10202010"));
    }

    #[test]
    fn test_error_keyword_vetoes_success() {
        // 同時出現成功與失敗關鍵字時，一律判定失敗
        let transcript = "User x added to LDAP successfully!\nInvalid group\n";
        assert!(!classify_transcript(transcript, "x"));

        let transcript = "Storage directory created!\nerror: quota exceeded\n";
        assert!(!classify_transcript(transcript, "x"));
    }

    #[test]
    fn test_username_specific_phrase() {
        let transcript = "User b10202010 added to LDAP successfully!";
        assert!(classify_transcript(transcript, "b10202010"));
    }

    #[test]
    fn test_missing_input_message_is_failure() {
        let transcript = "Username and group are required\ndone ! please check";
        assert!(!classify_transcript(transcript, "b10202010"));
    }

    #[test]
    fn test_extract_generated_password() {
        assert_eq!(
            extract_generated_password(SAMPLE_TRANSCRIPT).as_deref(),
            Some("YUQ54LyaHtnS")
        );
    }

    #[test]
    fn test_extract_password_marker_is_case_insensitive() {
        assert_eq!(
            extract_generated_password("GENERATED PASSWORD:   Abc123XY\n").as_deref(),
            Some("Abc123XY")
        );
    }

    #[test]
    fn test_extract_password_absent() {
        assert_eq!(extract_generated_password("no marker here"), None);
    }
}
