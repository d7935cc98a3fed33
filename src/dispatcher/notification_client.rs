// ==========================================
// POS 交易通知中继 - 下游通知客户端
// ==========================================
// 职责: 单笔 TransactionRecord → 下游通知接口（JSON POST）
// 判定: 2xx 为成功;非 2xx / 传输失败 / 超时 为失败
// ==========================================

use crate::dispatcher::error::DispatchError;
use crate::domain::TransactionRecord;
use async_trait::async_trait;
use std::time::Duration;
use tracing::trace;

// ==========================================
// NotificationClient Trait
// ==========================================
// 实现者: HttpNotificationClient（测试中注入伪实现）
// 约束: 跨请求共享,必须可并发使用
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// 推送单笔记录
    ///
    /// # 返回
    /// - Ok(()): 下游确认成功
    /// - Err(DispatchError): 失败归类
    async fn notify(&self, record: &TransactionRecord) -> Result<(), DispatchError>;
}

// ==========================================
// HttpNotificationClient - reqwest 实现
// ==========================================
// reqwest::Client 内部带连接池,克隆开销低
#[derive(Debug, Clone)]
pub struct HttpNotificationClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotificationClient {
    pub fn new(
        endpoint: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| DispatchError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationClient for HttpNotificationClient {
    async fn notify(&self, record: &TransactionRecord) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        trace!(id = record.id, status = status.as_u16(), "下游响应");

        if status.is_success() {
            Ok(())
        } else {
            Err(DispatchError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}
