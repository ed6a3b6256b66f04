use anyhow::Result;
use clap::Parser;
use hpc_account::config::Config;
use hpc_account::logger;
use hpc_account::orchestrator::App;
use std::path::PathBuf;
use tracing::info;

/// HPC 帳號自動開通工具
#[derive(Parser, Debug)]
#[command(
    name = "hpc_account",
    about = "從申請名單批次建立 HPC 帳號並寄送通知信",
    version
)]
struct Cli {
    /// 申請名單 CSV 路徑
    #[arg(long, default_value = "applicants.csv")]
    csv: PathBuf,

    /// 只驗證與記錄，不建立帳號也不寄信
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 載入 .env（檔案不存在時忽略）
    dotenvy::dotenv().ok();

    let log_path = logger::init()?;
    let cli = Cli::parse();

    info!("🚀 HPC 帳號自動開通工具啟動");
    info!("申請名單: {}", cli.csv.display());
    info!("Dry run: {}", cli.dry_run);

    // 必要設定缺漏時在處理任何申請前直接中止
    let config = Config::from_env();
    config.validate()?;

    let app = App::initialize(config, cli.dry_run)?;
    app.run(&cli.csv).await?;

    info!("處理完成，日誌已保存至: {}", log_path.display());
    Ok(())
}
