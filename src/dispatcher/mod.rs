// ==========================================
// POS 交易通知中继 - 分发层
// ==========================================
// 职责: 逐笔推送下游通知接口,汇总成功计数与失败记录
// ==========================================

pub mod batch_dispatcher;
pub mod error;
pub mod notification_client;

pub use batch_dispatcher::Dispatcher;
pub use error::DispatchError;
pub use notification_client::{HttpNotificationClient, NotificationClient};
