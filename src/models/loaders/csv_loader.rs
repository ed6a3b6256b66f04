//! 申請者名單載入 - 資料層
//!
//! 讀取 CSV 申請者名單並轉成 `ApplicantRecord`。
//! 同時支援舊格式（email / username）與 Google 表單格式
//! （email_ntu / student_id / user_type）兩種欄位命名。

use crate::error::AppError;
use crate::models::applicant::ApplicantRecord;
use crate::models::tier::Tier;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// 單列資料的驗證結果
///
/// 驗證不通過的列只會被跳過並記錄原因，不會中斷整批處理。
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// 驗證通過
    Valid(ApplicantRecord),
    /// 跳過此列
    Skipped {
        /// CSV 中的資料列編號（從 1 起算）
        row: usize,
        reason: SkipReason,
    },
}

/// 跳過原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 缺少 email 或帳號名稱
    MissingContact,
    /// 碩博士申請缺少指導教授
    MissingAdvisor,
    /// 該列無法解析
    Unreadable,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingContact => write!(f, "缺少 email 或帳號"),
            SkipReason::MissingAdvisor => write!(f, "碩博士申請缺少指導教授"),
            SkipReason::Unreadable => write!(f, "該列格式無法解析"),
        }
    }
}

/// 從檔案載入申請者名單
pub fn load_applicants(path: &Path) -> Result<Vec<RowOutcome>, AppError> {
    if !path.exists() {
        return Err(AppError::CsvNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path).map_err(|source| AppError::CsvOpen {
        path: path.display().to_string(),
        source,
    })?;

    load_applicants_from_reader(file, &path.display().to_string())
}

/// 從任意資料來源載入申請者名單
pub fn load_applicants_from_reader<R: Read>(
    reader: R,
    origin: &str,
) -> Result<Vec<RowOutcome>, AppError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| AppError::CsvRead {
            path: origin.to_string(),
            source,
        })?
        .clone();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = idx + 1;
        match result {
            Ok(record) => rows.push(parse_row(row, &headers, &record)),
            Err(e) => {
                warn!("⚠️ 第 {} 列無法解析，跳過: {}", row, e);
                rows.push(RowOutcome::Skipped {
                    row,
                    reason: SkipReason::Unreadable,
                });
            }
        }
    }

    Ok(rows)
}

/// 驗證並轉換單列資料
fn parse_row(row: usize, headers: &StringRecord, record: &StringRecord) -> RowOutcome {
    // 兩種欄位命名：優先取新格式欄位，取不到再退回舊格式
    let email = field(headers, record, &["email_ntu", "email"]);
    let username = field(headers, record, &["student_id", "username"]);

    if email.is_empty() || username.is_empty() {
        warn!(
            "⚠️ 第 {} 列缺少 email 或帳號，跳過 (email: '{}', username: '{}')",
            row, email, username
        );
        return RowOutcome::Skipped {
            row,
            reason: SkipReason::MissingContact,
        };
    }

    let name = field(headers, record, &["name"]);
    let display_name = if name.is_empty() { "User".to_string() } else { name };
    let student_id = field(headers, record, &["student_id"]);
    let group = field(headers, record, &["group"]);
    let user_type = field(headers, record, &["user_type"]);

    // 層級判定：有效的群組代碼優先，其次用身份描述轉換，都沒有則預設大學部
    let tier = match group.parse::<u8>().ok().and_then(Tier::from_code) {
        Some(tier) => tier,
        None => {
            if !group.is_empty() {
                warn!("⚠️ {} 的群組代碼 '{}' 無效", username, group);
            }
            if !user_type.is_empty() {
                Tier::classify(&user_type)
            } else {
                Tier::Undergrad
            }
        }
    };

    let advisor_name = non_empty(field(headers, record, &["professor"]));

    if tier.requires_advisor() && advisor_name.is_none() {
        warn!("⚠️ 碩博士申請者 {} 未填指導教授，跳過", username);
        return RowOutcome::Skipped {
            row,
            reason: SkipReason::MissingAdvisor,
        };
    }

    let explicit_password = non_empty(field(headers, record, &["password"]));

    RowOutcome::Valid(ApplicantRecord {
        email,
        username,
        display_name,
        student_id,
        tier,
        advisor_name,
        explicit_password,
    })
}

/// 依序嘗試多個欄位名稱，回傳第一個非空白的值（去除前後空白）
fn field(headers: &StringRecord, record: &StringRecord, names: &[&str]) -> String {
    for name in names {
        let value = headers
            .iter()
            .position(|h| h.trim() == *name)
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("");
        if !value.is_empty() {
            return value.to_string();
        }
    }
    String::new()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(csv: &str) -> Vec<RowOutcome> {
        load_applicants_from_reader(Cursor::new(csv.as_bytes()), "test.csv").unwrap()
    }

    fn expect_valid(outcome: &RowOutcome) -> &ApplicantRecord {
        match outcome {
            RowOutcome::Valid(record) => record,
            RowOutcome::Skipped { row, reason } => {
                panic!("第 {} 列不應被跳過 (原因: {})", row, reason)
            }
        }
    }

    #[test]
    fn test_google_form_schema() {
        let rows = load(
            "email_ntu,student_id,name,user_type,professor\n\
             a@ntu.edu.tw,b10202010,王小明,大學部學生,\n",
        );
        assert_eq!(rows.len(), 1);
        let record = expect_valid(&rows[0]);
        assert_eq!(record.email, "a@ntu.edu.tw");
        assert_eq!(record.username, "b10202010");
        assert_eq!(record.display_name, "王小明");
        assert_eq!(record.tier, Tier::Undergrad);
        assert_eq!(record.advisor_name, None);
        assert_eq!(record.explicit_password, None);
    }

    #[test]
    fn test_legacy_schema() {
        let rows = load(
            "email,username,name,group,professor,password\n\
             b@x.edu,r12921001,李大華,2,陳教授,s3cret\n",
        );
        let record = expect_valid(&rows[0]);
        assert_eq!(record.email, "b@x.edu");
        assert_eq!(record.username, "r12921001");
        assert_eq!(record.tier, Tier::Master);
        assert_eq!(record.advisor_name.as_deref(), Some("陳教授"));
        assert_eq!(record.explicit_password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_missing_contact_is_skipped() {
        let rows = load(
            "email,username,name\n\
             ,b10202010,甲\n\
             a@x.edu,,乙\n",
        );
        assert_eq!(rows.len(), 2);
        for (idx, outcome) in rows.iter().enumerate() {
            match outcome {
                RowOutcome::Skipped { row, reason } => {
                    assert_eq!(*row, idx + 1);
                    assert_eq!(*reason, SkipReason::MissingContact);
                }
                RowOutcome::Valid(record) => panic!("不應通過驗證: {:?}", record),
            }
        }
    }

    #[test]
    fn test_master_without_advisor_is_skipped() {
        let rows = load(
            "email,username,user_type,professor\n\
             a@x.edu,r12921001,碩士班學生,\n",
        );
        match &rows[0] {
            RowOutcome::Skipped { reason, .. } => {
                assert_eq!(*reason, SkipReason::MissingAdvisor)
            }
            RowOutcome::Valid(record) => panic!("不應通過驗證: {:?}", record),
        }
    }

    #[test]
    fn test_group_code_wins_over_user_type() {
        let rows = load(
            "email,username,group,user_type,professor\n\
             a@x.edu,d11921001,3,大學部學生,林教授\n",
        );
        let record = expect_valid(&rows[0]);
        assert_eq!(record.tier, Tier::Phd);
    }

    #[test]
    fn test_invalid_group_code_defaults_to_undergrad() {
        let rows = load(
            "email,username,group\n\
             a@x.edu,b10202010,9\n",
        );
        let record = expect_valid(&rows[0]);
        assert_eq!(record.tier, Tier::Undergrad);
    }

    #[test]
    fn test_invalid_group_code_falls_back_to_user_type() {
        let rows = load(
            "email,username,group,user_type,professor\n\
             a@x.edu,r12921001,99,碩士班學生,陳教授\n",
        );
        let record = expect_valid(&rows[0]);
        assert_eq!(record.tier, Tier::Master);
    }

    #[test]
    fn test_no_group_no_user_type_defaults_to_undergrad() {
        let rows = load(
            "email,username\n\
             a@x.edu,b10202010\n",
        );
        let record = expect_valid(&rows[0]);
        assert_eq!(record.tier, Tier::Undergrad);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let rows = load(
            "email,username,name\n\
             \" a@x.edu \",\" b10202010 \",\" 王小明 \"\n",
        );
        let record = expect_valid(&rows[0]);
        assert_eq!(record.email, "a@x.edu");
        assert_eq!(record.username, "b10202010");
        assert_eq!(record.display_name, "王小明");
    }

    #[test]
    fn test_blank_name_falls_back_to_user() {
        let rows = load(
            "email,username,name\n\
             a@x.edu,b10202010,\n",
        );
        let record = expect_valid(&rows[0]);
        assert_eq!(record.display_name, "User");
    }
}
