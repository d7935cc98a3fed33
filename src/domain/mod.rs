// ==========================================
// POS 交易通知中继 - 领域模型层
// ==========================================
// 职责: 定义交易记录与批次结果
// 红线: 不含文件解析逻辑,不含网络逻辑
// ==========================================

pub mod transaction;

// 重导出核心类型
pub use transaction::{BatchResult, DispatchOutcome, TransactionRecord};
