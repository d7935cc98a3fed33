// ==========================================
// POS 交易通知中继 - 批次抽取器实现
// ==========================================
// 职责: 遍历第一个工作表的数据行 → 有序 TransactionRecord 列表
// 流程: 校验列映射表 → 校验表头宽度 → 采样批次时刻 → 逐行映射
// 策略: 完全缺失的行跳过;任一行映射失败则整个文件失败
// ==========================================

use crate::domain::TransactionRecord;
use crate::importer::column_schema::ColumnSchema;
use crate::importer::error::ImportResult;
use crate::importer::row_mapper::RowMapper;
use crate::importer::tabular_reader::TabularSheet;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

// ==========================================
// Clock - 批次时刻来源
// ==========================================
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟（UTC）
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定时钟（测试/重放）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ==========================================
// BatchExtractor - 批次抽取器
// ==========================================
pub struct BatchExtractor {
    mapper: RowMapper,
    clock: Arc<dyn Clock>,
    strict_header: bool,
}

impl BatchExtractor {
    /// 标准布局 + 系统时钟 + 严格表头校验
    pub fn new() -> Self {
        Self {
            mapper: RowMapper::default(),
            clock: Arc::new(SystemClock),
            strict_header: true,
        }
    }

    /// 自定义映射表（映射表无效时构造失败）
    pub fn with_parts(
        schema: ColumnSchema,
        clock: Arc<dyn Clock>,
        strict_header: bool,
    ) -> ImportResult<Self> {
        Ok(Self {
            mapper: RowMapper::new(schema)?,
            clock,
            strict_header,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_strict_header(mut self, strict_header: bool) -> Self {
        self.strict_header = strict_header;
        self
    }

    /// 抽取全部数据行
    ///
    /// # 返回
    /// - Ok(Vec<TransactionRecord>): 按源文件行序排列
    /// - Err: 列布局错误或任一行映射失败（不返回部分结果）
    #[instrument(skip(self, sheet), fields(rows = sheet.row_count()))]
    pub fn extract(&self, sheet: &dyn TabularSheet) -> ImportResult<Vec<TransactionRecord>> {
        // === 步骤 1: 校验列映射表 ===
        let schema = self.mapper.schema();
        schema.validate()?;

        // === 步骤 2: 校验表头宽度 ===
        if self.strict_header {
            if let Some(header) = sheet.row(0) {
                schema.check_header_width(header.width()).map_err(|e| {
                    error!(error = %e, "表头列数不足");
                    e
                })?;
            }
        }

        // === 步骤 3: 采样批次时刻（整批共用一次）===
        let batch_started_at = self.clock.now();
        debug!(batch_started_at = %batch_started_at, "批次时刻已采样");

        // === 步骤 4: 逐行映射（第 0 行为表头）===
        let row_count = sheet.row_count();
        let mut records = Vec::with_capacity(row_count.saturating_sub(1));
        let mut skipped = 0usize;

        for row_index in 1..row_count {
            let row = match sheet.row(row_index) {
                Some(row) if !row.is_blank() => row,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let record = self
                .mapper
                .map_row(&row, row_index, batch_started_at)
                .map_err(|e| {
                    error!(row_index, error = %e, "行映射失败，整批中止");
                    e
                })?;
            records.push(record);
        }

        info!(records = records.len(), skipped, "数据行抽取完成");
        Ok(records)
    }
}

impl Default for BatchExtractor {
    fn default() -> Self {
        Self::new()
    }
}
