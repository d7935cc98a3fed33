// ==========================================
// POS 交易通知中继 - 批次分发器
// ==========================================
// 职责: 有序记录 → 逐笔推送 → BatchResult
// 约束: 严格串行（第 N+1 笔在第 N 笔结果确定后发送）,批内不重试
// 结果: 每笔归类为 Success / Failure(record),再折叠为计数 + 失败列表
// ==========================================

use crate::dispatcher::notification_client::NotificationClient;
use crate::domain::{BatchResult, DispatchOutcome, TransactionRecord};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn NotificationClient>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn NotificationClient>) -> Self {
        Self { client }
    }

    /// 逐笔分发整批记录
    ///
    /// # 返回
    /// - BatchResult: 失败记录（保持输入顺序）+ 成功计数
    #[instrument(skip(self, records), fields(total = records.len()))]
    pub async fn dispatch(&self, records: Vec<TransactionRecord>) -> BatchResult {
        let outcomes: Vec<DispatchOutcome> = stream::iter(records.into_iter().enumerate())
            .then(|(position, record)| self.dispatch_one(position, record))
            .collect()
            .await;

        let result: BatchResult = outcomes.into_iter().collect();
        info!(
            successful = result.successful_count,
            failed = result.failed_data.len(),
            "批次分发完成"
        );
        result
    }

    /// 推送单笔并归类
    pub async fn dispatch_one(&self, position: usize, record: TransactionRecord) -> DispatchOutcome {
        match self.client.notify(&record).await {
            Ok(()) => {
                debug!(position, id = record.id, "推送成功");
                DispatchOutcome::Success
            }
            Err(e) => {
                warn!(position, id = record.id, error = %e, "推送失败，记录退回调用方");
                DispatchOutcome::Failure(record)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::error::DispatchError;
    use crate::domain::transaction::fixtures::sample_record;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// 按 id 决定失败的伪客户端,记录调用顺序
    struct ScriptedClient {
        failing_ids: HashSet<i64>,
        calls: Mutex<Vec<i64>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(failing_ids: &[i64]) -> Self {
            Self {
                failing_ids: failing_ids.iter().copied().collect(),
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NotificationClient for ScriptedClient {
        async fn notify(&self, record: &TransactionRecord) -> Result<(), DispatchError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.calls.lock().unwrap().push(record.id);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing_ids.contains(&record.id) {
                Err(DispatchError::Rejected { status: 500 })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_middle_failure_scenario() {
        let client = Arc::new(ScriptedClient::new(&[2]));
        let dispatcher = Dispatcher::new(client.clone());

        let records = vec![sample_record(1), sample_record(2), sample_record(3)];
        let result = dispatcher.dispatch(records).await;

        assert_eq!(result.successful_count, 2);
        assert_eq!(result.failed_data, vec![sample_record(2)]);
        assert_eq!(*client.calls.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_sequential_and_order_preserving() {
        let client = Arc::new(ScriptedClient::new(&[5, 1, 3]));
        let dispatcher = Dispatcher::new(client.clone());

        let records: Vec<_> = (1..=6).map(sample_record).collect();
        let result = dispatcher.dispatch(records).await;

        let failed: Vec<i64> = result.failed_data.iter().map(|r| r.id).collect();
        assert_eq!(failed, vec![1, 3, 5]);
        assert_eq!(result.successful_count + result.failed_data.len(), 6);
        assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let client = Arc::new(ScriptedClient::new(&[]));
        let dispatcher = Dispatcher::new(client.clone());

        let result = dispatcher.dispatch(Vec::new()).await;

        assert_eq!(result, BatchResult::empty());
        assert!(client.calls.lock().unwrap().is_empty());
    }
}
