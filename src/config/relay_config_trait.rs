// ==========================================
// POS 交易通知中继 - 配置读取 Trait
// ==========================================
// 职责: 定义导入/分发所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigError;
use async_trait::async_trait;
use std::time::Duration;

// ==========================================
// RelayConfigReader Trait
// ==========================================
// 实现者: ConfigManager（默认值 ← JSON 文件 ← 环境变量）
#[async_trait]
pub trait RelayConfigReader: Send + Sync {
    /// 下游通知接口地址
    ///
    /// # 默认值
    /// - https://tms-trans-notification.arcamoney.com/transaction/notification
    async fn get_notification_url(&self) -> Result<String, ConfigError>;

    /// 单笔请求超时（超时的记录归为失败）
    ///
    /// # 默认值
    /// - 30000 ms
    async fn get_request_timeout(&self) -> Result<Duration, ConfigError>;

    /// 建连超时
    ///
    /// # 默认值
    /// - 10000 ms
    async fn get_connect_timeout(&self) -> Result<Duration, ConfigError>;

    /// 是否校验表头列数
    ///
    /// # 默认值
    /// - true
    async fn is_strict_header(&self) -> Result<bool, ConfigError>;
}
