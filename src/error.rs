use thiserror::Error;

/// 應用程式錯誤類型
///
/// 只有啟動階段的錯誤（設定缺漏、名單無法讀取）會讓程式中止；
/// 單筆申請的遠端或寄信失敗一律由流程層攔截並計入統計。
#[derive(Debug, Error)]
pub enum AppError {
    /// 缺少必要的環境變數
    #[error("缺少必要的環境變數: {missing}，請檢查 .env 檔案")]
    MissingConfig { missing: String },

    /// 找不到申請者名單
    #[error("找不到申請者名單: {path}")]
    CsvNotFound { path: String },

    /// 無法開啟申請者名單
    #[error("無法開啟申請者名單 {path}: {source}")]
    CsvOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 申請者名單讀取失敗
    #[error("無法讀取申請者名單 {path}: {source}")]
    CsvRead {
        path: String,
        #[source]
        source: csv::Error,
    },
}
