// ==========================================
// POS 交易通知中继 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 优先级: 内置默认值 < JSON 配置文件 < 环境变量（POS_TXN_RELAY_*）
// ==========================================

use crate::config::error::ConfigError;
use crate::config::relay_config_trait::RelayConfigReader;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "POS_TXN_RELAY_";

/// 指定配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "POS_TXN_RELAY_CONFIG";

fn is_true(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 仅包含内置默认值
    pub fn new() -> Self {
        let values = defaults::ALL
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { values }
    }

    /// 按完整优先级加载
    ///
    /// # 参数
    /// - config_path: 显式配置文件路径;为空时读取 POS_TXN_RELAY_CONFIG
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut manager = Self::new();

        let env_path = std::env::var(CONFIG_FILE_ENV).ok();
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| env_path.map(Into::into));

        if let Some(path) = path {
            manager.overlay_json_file(&path)?;
        }

        manager.overlay_env();
        Ok(manager)
    }

    /// 覆写单个配置项（测试/命令行）
    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// 叠加 JSON 配置文件（扁平对象,值可为字符串/数字/布尔）
    pub fn overlay_json_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let path_display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path_display.clone(),
            message: e.to_string(),
        })?;
        self.overlay_json_str(&raw)
            .map_err(|message| ConfigError::FileFormatError {
                path: path_display.clone(),
                message,
            })?;
        debug!(path = %path_display, "配置文件已加载");
        Ok(())
    }

    fn overlay_json_str(&mut self, raw: &str) -> Result<(), String> {
        let parsed: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let object = parsed
            .as_object()
            .ok_or_else(|| "顶层必须为 JSON 对象".to_string())?;

        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => return Err(format!("配置项 {} 的值类型不支持: {}", key, other)),
            };
            self.values.insert(key.clone(), text);
        }
        Ok(())
    }

    /// 叠加环境变量（键名大写并加前缀）
    pub fn overlay_env(&mut self) {
        for (key, _) in defaults::ALL {
            let env_key = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Ok(value) = std::env::var(&env_key) {
                debug!(key = %key, "环境变量覆写配置");
                self.values.insert(key.to_string(), value);
            }
        }
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_config_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_config_value(key).unwrap_or(default)
    }

    fn get_millis(&self, key: &str, default: &str) -> Result<Duration, ConfigError> {
        let raw = self.get_config_or_default(key, default);
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                message: format!("期望毫秒数: {}", e),
            })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayConfigReader for ConfigManager {
    async fn get_notification_url(&self) -> Result<String, ConfigError> {
        let raw = self.get_config_or_default(config_keys::NOTIFICATION_URL, defaults::NOTIFICATION_URL);
        let url = raw.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: config_keys::NOTIFICATION_URL.to_string(),
                value: raw.to_string(),
                message: "必须为 http(s) 地址".to_string(),
            });
        }
        Ok(url.to_string())
    }

    async fn get_request_timeout(&self) -> Result<Duration, ConfigError> {
        self.get_millis(config_keys::REQUEST_TIMEOUT_MS, defaults::REQUEST_TIMEOUT_MS)
    }

    async fn get_connect_timeout(&self) -> Result<Duration, ConfigError> {
        self.get_millis(config_keys::CONNECT_TIMEOUT_MS, defaults::CONNECT_TIMEOUT_MS)
    }

    async fn is_strict_header(&self) -> Result<bool, ConfigError> {
        let raw = self.get_config_or_default(config_keys::STRICT_HEADER, defaults::STRICT_HEADER);
        is_true(raw).ok_or_else(|| ConfigError::InvalidValue {
            key: config_keys::STRICT_HEADER.to_string(),
            value: raw.to_string(),
            message: "期望 true/false".to_string(),
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 下游通知
    pub const NOTIFICATION_URL: &str = "notification_url";
    pub const REQUEST_TIMEOUT_MS: &str = "request_timeout_ms";
    pub const CONNECT_TIMEOUT_MS: &str = "connect_timeout_ms";

    // 导入
    pub const STRICT_HEADER: &str = "strict_header";
}

mod defaults {
    use super::config_keys;

    pub const NOTIFICATION_URL: &str =
        "https://tms-trans-notification.arcamoney.com/transaction/notification";
    pub const REQUEST_TIMEOUT_MS: &str = "30000";
    pub const CONNECT_TIMEOUT_MS: &str = "10000";
    pub const STRICT_HEADER: &str = "true";

    pub const ALL: [(&str, &str); 4] = [
        (config_keys::NOTIFICATION_URL, NOTIFICATION_URL),
        (config_keys::REQUEST_TIMEOUT_MS, REQUEST_TIMEOUT_MS),
        (config_keys::CONNECT_TIMEOUT_MS, CONNECT_TIMEOUT_MS),
        (config_keys::STRICT_HEADER, STRICT_HEADER),
    ];
}
