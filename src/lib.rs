// ==========================================
// POS 交易通知中继 - 核心库
// ==========================================
// 流程: 上传文件 → 抽取交易记录 → 逐笔推送下游 → 汇总结果
// 系统定位: 批量推送中继（失败记录退回调用方,不做持久化）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 交易记录与批次结果
pub mod domain;

// 导入层 - Excel/CSV 抽取
pub mod importer;

// 分发层 - 下游通知
pub mod dispatcher;

// 配置层 - 系统配置
pub mod config;

// API 层 - 对外边界
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{BatchResult, DispatchOutcome, TransactionRecord};

pub use importer::{BatchExtractor, ColumnSchema, ImportError, RowMapper};

pub use dispatcher::{DispatchError, Dispatcher, HttpNotificationClient, NotificationClient};

pub use config::{ConfigError, ConfigManager, RelayConfigReader};

pub use api::{ApiError, IntakeApi, IntakeResponse, IntakeStatus, UploadedFile};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "POS 交易通知中继";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
