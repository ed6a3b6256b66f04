//! # HPC Account
//!
//! NTUEE HPC 帳號自動開通工具：讀取申請名單，透過 SSH 驅動遠端的
//! add_user.sh 建立帳號，再以通知信把帳號密碼寄給申請者。
//!
//! ## 架構設計
//!
//! 本系統採用分層架構：
//!
//! ### ① 基礎設施層（Infrastructure）
//! - `infrastructure/` - 持有連線資源，只暴露能力
//! - `SshShell` - 唯一的 SSH session owner，提供 exec() 與互動式 shell
//!
//! ### ② 業務能力層（Services）
//! - `services/` - 描述「我能做什麼」，只處理單筆申請
//! - `Provisioner` - 遠端開帳號能力
//! - `outcome` - 腳本輸出判讀能力
//! - `Mailer` - 通知信寄送能力
//!
//! ### ③ 流程層（Workflow）
//! - `workflow/` - 定義「一筆申請」的完整處理流程
//! - `ApplicantFlow` - 流程編排（開帳號 → 判讀 → 寄信）
//!
//! ### ④ 編排層（Orchestration）
//! - `orchestrator/batch_processor` - 批次申請處理器，循序處理與統計
//!
//! ## 模組結構

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod workflow;

// 重新導出常用類型
pub use config::Config;
pub use error::AppError;
pub use infrastructure::SshShell;
pub use models::{ApplicantRecord, RowOutcome, SkipReason, Tier};
pub use orchestrator::{App, RunStats};
pub use services::{Mailer, ProvisionOutcome, Provisioner};
pub use workflow::{ApplicantFlow, FlowResult};
