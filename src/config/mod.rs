// ==========================================
// POS 交易通知中继 - 配置层
// ==========================================
// 职责: 下游地址/超时/导入开关的加载与读取
// 来源: 内置默认值、JSON 配置文件、环境变量
// ==========================================

pub mod config_manager;
pub mod error;
pub mod relay_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::ConfigError;
pub use relay_config_trait::RelayConfigReader;
