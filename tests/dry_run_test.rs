use hpc_account::config::Config;
use hpc_account::orchestrator::App;
use std::fs;
use std::path::{Path, PathBuf};

fn test_config() -> Config {
    Config {
        smtp_server: "smtp.example.com".to_string(),
        smtp_user: "hpcadmin@example.com".to_string(),
        smtp_pass: "secret".to_string(),
        ssh_host: "hpc.example.com".to_string(),
        ssh_user: "sudoer1".to_string(),
        ssh_pass: "secret".to_string(),
        ..Config::default()
    }
}

fn write_temp_csv(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}_{}.csv", name, std::process::id()));
    fs::write(&path, content).expect("無法寫入測試名單");
    path
}

#[tokio::test]
async fn test_dry_run_counts_valid_rows_as_successes() {
    let csv = write_temp_csv(
        "dry_run_valid",
        "email,username,user_type,professor\n\
         a@x.edu,b10202010,大學部學生,\n\
         b@x.edu,r12921001,碩士班學生,陳教授\n",
    );

    let app = App::initialize(test_config(), true).expect("初始化失敗");
    let stats = app.run(&csv).await.expect("dry run 不應失敗");
    fs::remove_file(&csv).ok();

    // dry run 不接觸遠端主機與寄信伺服器，但計數與實際成功時一致
    assert_eq!(stats.total, 2);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.emails_sent, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.emails_failed, 0);
}

#[tokio::test]
async fn test_dry_run_still_validates_rows() {
    // 缺 email 的列與碩士缺指導教授的列照樣被跳過
    let csv = write_temp_csv(
        "dry_run_invalid",
        "email,username,user_type,professor\n\
         ,b10202010,大學部學生,\n\
         a@x.edu,r12921001,碩士班學生,\n\
         c@x.edu,b10202011,大學部學生,\n",
    );

    let app = App::initialize(test_config(), true).expect("初始化失敗");
    let stats = app.run(&csv).await.expect("dry run 不應失敗");
    fs::remove_file(&csv).ok();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.emails_sent, 1);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_missing_csv_is_an_error() {
    let app = App::initialize(test_config(), true).expect("初始化失敗");
    let result = app.run(Path::new("no_such_applicants.csv")).await;
    assert!(result.is_err(), "名單不存在時應回報錯誤");
}
