// ==========================================
// POS 交易通知中继 - 交易文件接收API
// ==========================================
// 职责: 接收上传文件 → 抽取 → 分发 → 汇总结果（边界薄层）
// 约定: 空文件/无数据行 → BadRequest + 空结果,且不触达下游
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::RelayConfigReader;
use crate::dispatcher::{Dispatcher, HttpNotificationClient, NotificationClient};
use crate::domain::{BatchResult, TransactionRecord};
use crate::importer::{load_sheet, BatchExtractor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::spawn_blocking;
use tracing::{info, instrument, warn, Span};
use uuid::Uuid;

/// 上传文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 原始文件名（用于识别格式,可缺省）
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, content: Vec<u8>) -> Self {
        Self { file_name, content }
    }
}

/// 响应状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeStatus {
    Ok,
    BadRequest,
}

/// 接收API响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub status: IntakeStatus,
    pub body: BatchResult,
}

impl IntakeResponse {
    fn ok(body: BatchResult) -> Self {
        Self {
            status: IntakeStatus::Ok,
            body,
        }
    }

    fn empty() -> Self {
        Self {
            status: IntakeStatus::BadRequest,
            body: BatchResult::empty(),
        }
    }
}

/// 交易文件接收API
#[derive(Clone)]
pub struct IntakeApi {
    extractor: Arc<BatchExtractor>,
    dispatcher: Dispatcher,
}

impl IntakeApi {
    pub fn new(extractor: BatchExtractor, client: Arc<dyn NotificationClient>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            dispatcher: Dispatcher::new(client),
        }
    }

    /// 从配置构建（reqwest 客户端跨请求共享）
    pub async fn from_config<C: RelayConfigReader + ?Sized>(config: &C) -> ApiResult<Self> {
        let endpoint = config.get_notification_url().await?;
        let client = HttpNotificationClient::new(
            endpoint,
            config.get_request_timeout().await?,
            config.get_connect_timeout().await?,
        )?;
        let extractor = BatchExtractor::new().with_strict_header(config.is_strict_header().await?);

        info!(endpoint = %client.endpoint(), "接收API初始化完成");
        Ok(Self::new(extractor, Arc::new(client)))
    }

    /// 接收上传文件并逐笔推送
    ///
    /// # 返回
    /// - Ok(IntakeResponse{Ok}): 分发完成（含部分失败）
    /// - Ok(IntakeResponse{BadRequest}): 文件缺失/为空/不可解析/无数据行
    /// - Err(ApiError): 表头布局或行映射失败（整批未推送）
    #[instrument(skip(self, file), fields(batch_id = tracing::field::Empty))]
    pub async fn upload_and_dispatch(&self, file: Option<UploadedFile>) -> ApiResult<IntakeResponse> {
        let file = match file {
            Some(f) if !f.content.is_empty() => f,
            _ => {
                warn!("上传文件缺失或为空");
                return Ok(IntakeResponse::empty());
            }
        };

        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());
        let start_time = Instant::now();
        info!(
            file_name = file.file_name.as_deref().unwrap_or("unknown"),
            size = file.content.len(),
            "开始处理上传文件"
        );

        // === 步骤 1: 抽取（同步解析放到阻塞线程池）===
        let extractor = Arc::clone(&self.extractor);
        let extracted = spawn_blocking(move || {
            let sheet = load_sheet(file.file_name.as_deref(), &file.content)?;
            extractor.extract(sheet.as_ref())
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("抽取任务异常: {}", e)))?;

        let records = match extracted {
            Ok(records) => records,
            Err(e) if e.is_unreadable_file() => {
                warn!(error = %e, "上传文件无法解析");
                return Ok(IntakeResponse::empty());
            }
            Err(e) => return Err(e.into()),
        };

        if records.is_empty() {
            warn!("文件无数据行");
            return Ok(IntakeResponse::empty());
        }

        // === 步骤 2: 分发 ===
        let result = self.dispatcher.dispatch(records).await;

        info!(
            successful = result.successful_count,
            failed = result.failed_data.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "上传文件处理完成"
        );
        Ok(IntakeResponse::ok(result))
    }

    /// 重新推送此前失败的记录（跳过抽取）
    #[instrument(skip(self, records), fields(total = records.len()))]
    pub async fn resubmit(&self, records: Vec<TransactionRecord>) -> IntakeResponse {
        if records.is_empty() {
            return IntakeResponse::empty();
        }
        IntakeResponse::ok(self.dispatcher.dispatch(records).await)
    }
}
