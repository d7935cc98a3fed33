// ==========================================
// POS 交易通知中继 - API层错误类型
// ==========================================
// 职责: 汇总导入/配置/客户端初始化错误,给调用方明确原因
// ==========================================

use crate::config::ConfigError;
use crate::dispatcher::DispatchError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("导入失败: {0}")]
    ImportError(#[from] ImportError),

    #[error("配置错误: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("下游客户端初始化失败: {0}")]
    ClientSetupError(#[from] DispatchError),

    #[error("内部错误: {0}")]
    InternalError(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
