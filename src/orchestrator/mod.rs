//! 編排層（Orchestration Layer）
//!
//! ## 職責
//!
//! 本層負責整批申請的處理與統計，是整個系統的「指揮中心」。
//!
//! ### `batch_processor` - 批次申請處理器
//! - 管理應用生命週期（初始化、執行、總結）
//! - 載入申請名單（Vec<RowOutcome>）
//! - 嚴格逐筆循序處理（前一筆結束才開始下一筆）
//! - 維護六項統計計數
//!
//! ## 層次關係
//!
//! ```text
//! batch_processor (處理整份名單)
//!     ↓
//! workflow::ApplicantFlow (處理單筆申請)
//!     ↓
//! services (能力層：provisioner / outcome / mailer)
//!     ↓
//! infrastructure (基礎設施：SshShell)
//! ```

pub mod batch_processor;

pub use batch_processor::{App, RunStats};
