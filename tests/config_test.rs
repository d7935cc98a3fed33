// ==========================================
// 配置加载集成测试
// ==========================================

use pos_txn_relay::config::config_keys;
use pos_txn_relay::{ApiError, ConfigError, ConfigManager, IntakeApi, RelayConfigReader};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("创建临时文件失败");
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_json_file_overrides_defaults() {
    let file = write_config(
        r#"{
            "notification_url": "http://127.0.0.1:9000/notify",
            "request_timeout_ms": 1500,
            "strict_header": false
        }"#,
    );

    let config = ConfigManager::load(Some(file.path())).unwrap();

    assert_eq!(
        config.get_notification_url().await.unwrap(),
        "http://127.0.0.1:9000/notify"
    );
    assert_eq!(
        config.get_request_timeout().await.unwrap(),
        Duration::from_millis(1500)
    );
    // 未出现在文件中的键保持默认值
    assert_eq!(
        config.get_connect_timeout().await.unwrap(),
        Duration::from_millis(10000)
    );
    assert!(!config.is_strict_header().await.unwrap());
}

#[tokio::test]
async fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = ConfigManager::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError { .. }));
}

#[tokio::test]
async fn test_malformed_file_is_format_error() {
    let not_json = write_config("notification_url = http://x");
    let err = ConfigManager::load(Some(not_json.path())).unwrap_err();
    assert!(matches!(err, ConfigError::FileFormatError { .. }));

    let nested = write_config(r#"{"notification_url": {"host": "x"}}"#);
    let err = ConfigManager::load(Some(nested.path())).unwrap_err();
    assert!(matches!(err, ConfigError::FileFormatError { .. }));
}

#[tokio::test]
async fn test_intake_api_rejects_invalid_config() {
    let bad_url = ConfigManager::new().with_value(config_keys::NOTIFICATION_URL, "ftp://host/x");
    let err = IntakeApi::from_config(&bad_url).await.err().unwrap();
    assert!(matches!(
        err,
        ApiError::ConfigError(ConfigError::InvalidValue { .. })
    ));

    let bad_timeout = ConfigManager::new().with_value(config_keys::REQUEST_TIMEOUT_MS, "soon");
    let err = IntakeApi::from_config(&bad_timeout).await.err().unwrap();
    assert!(err.to_string().contains("request_timeout_ms"));
}

#[tokio::test]
async fn test_intake_api_from_default_config() {
    assert!(IntakeApi::from_config(&ConfigManager::new()).await.is_ok());
}
