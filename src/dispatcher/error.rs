// ==========================================
// POS 交易通知中继 - 分发错误类型
// ==========================================
// 说明: 单笔失败只作为归类结果,不中断批次
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("下游返回非成功状态: HTTP {status}")]
    Rejected { status: u16 },

    #[error("请求超时")]
    Timeout,

    #[error("网络传输失败: {0}")]
    Transport(String),

    #[error("HTTP 客户端初始化失败: {0}")]
    ClientBuild(String),
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout
        } else if let Some(status) = err.status() {
            DispatchError::Rejected {
                status: status.as_u16(),
            }
        } else {
            DispatchError::Transport(err.to_string())
        }
    }
}
