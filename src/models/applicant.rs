use crate::models::tier::Tier;

/// 一筆申請者資料
///
/// 從 CSV 的一列建構，經批次處理後即丟棄，不做任何持久化。
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApplicantRecord {
    /// 通知信收件地址
    pub email: String,
    /// HPC 帳號名稱（通常為學號）
    pub username: String,
    /// 申請者姓名（僅用於信件抬頭）
    pub display_name: String,
    /// 學號
    pub student_id: String,
    /// 帳號層級
    pub tier: Tier,
    /// 指導教授（碩博士必填）
    pub advisor_name: Option<String>,
    /// 自訂密碼（留空代表由遠端腳本產生）
    pub explicit_password: Option<String>,
}
