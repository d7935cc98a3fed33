// ==========================================
// POS 交易通知中继 - 列映射表
// ==========================================
// 职责: 列序号 → 标准字段 + 解码规则（数据化描述,替代散落的位置常量）
// 约束: 序号从 0 连续递增,每个字段恰好出现一次
// 校验: 每次抽取开始时校验一次,布局漂移时快速失败
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashSet;

// ==========================================
// ColumnRule - 解码规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    Identity,         // 64 位整数,缺失即错误
    Text,             // 自由文本,缺失 → 空字符串
    Amount,           // 金额 → 最小货币单位
    TransmissionDate, // yyyy-MM-dd,失败回退批次时刻
    LocalTime,        // 缺失 → 批次时刻 HHmmss
    Flag,             // true/false,缺失即错误
}

macro_rules! transaction_fields {
    ($( $variant:ident => ($name:literal, $rule:ident) ),+ $(,)?) => {
        /// 交易记录字段（声明顺序即标准列顺序）
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TransactionField {
            $( $variant, )+
        }

        impl TransactionField {
            /// 标准列顺序下的全部字段
            pub const ALL: &'static [TransactionField] = &[ $( TransactionField::$variant, )+ ];

            /// 下游 JSON 键名（同时作为诊断信息中的列名）
            pub fn name(self) -> &'static str {
                match self {
                    $( TransactionField::$variant => $name, )+
                }
            }

            pub fn rule(self) -> ColumnRule {
                match self {
                    $( TransactionField::$variant => ColumnRule::$rule, )+
                }
            }
        }
    };
}

transaction_fields! {
    AgentAccountId => ("agentAccountId", Identity),
    MsgType => ("msgType", Text),
    CardNo => ("cardNo", Text),
    ProcCode => ("procCode", Text),
    Balance => ("balance", Text),
    Amount => ("amt", Amount),
    TransmissionDateTime => ("transmissionDateTime", TransmissionDate),
    TransactionType => ("transactionType", Text),
    CustomerNum => ("customerNum", Text),
    Stan => ("stan", Text),
    LocalTime => ("localTime", LocalTime),
    LocalDate => ("localDate", Text),
    MerchType => ("merchType", Text),
    PosEntryMode => ("posEntryMode", Text),
    CardSequenceNo => ("cardSequenceNo", Text),
    PosConditionCode => ("posConditionCode", Text),
    PosPinCaptureCode => ("posPinCaptureCode", Text),
    Surcharge => ("surcharge", Text),
    AcqInstId => ("acqInstId", Text),
    AcquirerId => ("acquirerId", Text),
    FwdInstId => ("fwdInstId", Text),
    RetRefNo => ("retRefNo", Text),
    Track2 => ("track2", Text),
    ServiceRestrictionCode => ("serviceRestrictionCode", Text),
    TerminalId => ("terminalId", Text),
    MerchantName => ("merchantName", Text),
    MerchantLoc => ("merchantLoc", Text),
    MerchantAddress => ("merchantAddress", Text),
    MerchantExtId => ("merchantExtId", Text),
    StatusCode => ("statusCode", Text),
    ExpDate => ("expDate", Text),
    CurrencyCode => ("currencyCode", Text),
    PinData => ("pinData", Text),
    IccData => ("iccData", Text),
    MsgReasonCode => ("msgReasonCode", Text),
    PosDataCode => ("posDataCode", Text),
    ResponseCode => ("responseCode", Text),
    AuthNum => ("authNum", Text),
    Reversed => ("reversed", Text),
    Completed => ("completed", Text),
    CreatedOn => ("createdOn", Text),
    MaskedPan => ("maskedPan", Text),
    CardHolderName => ("cardHolderName", Text),
    CardTypeName => ("cardTypeName", Text),
    AccountType => ("accountType", Text),
    AuthenticationMethod => ("authenticationMethod", Text),
    Notified => ("notified", Text),
    Latency => ("latency", Text),
    TotalSales => ("totalSales", Text),
    SalesAmt => ("salesAmt", Text),
    SalesId => ("salesId", Text),
    UserName => ("userName", Text),
    ResponseMessage => ("responseMessage", Text),
    PosResponseCode => ("posResponseCode", Text),
    PosResponseMessage => ("posResponseMessage", Text),
    ProcessorResponseCode => ("processorResponseCode", Text),
    OverallStatusCode => ("overallStatusCode", Text),
    ReceiptPrinted => ("receiptPrinted", Flag),
    AppChannel => ("appChannel", Text),
    Id => ("id", Identity),
}

/// 单列定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub index: usize,
    pub field: TransactionField,
}

// ==========================================
// ColumnSchema - 列映射表
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    columns: Vec<ColumnSpec>,
}

impl ColumnSchema {
    /// 标准 60 列布局（列序号 = 字段声明顺序）
    pub fn standard() -> Self {
        let columns = TransactionField::ALL
            .iter()
            .enumerate()
            .map(|(index, &field)| ColumnSpec { index, field })
            .collect();
        Self { columns }
    }

    /// 自定义列表（主要用于校验测试）
    pub fn from_columns(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// 布局要求的最小列数
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// 字段所在列
    pub fn index_of(&self, field: TransactionField) -> Option<usize> {
        self.columns
            .iter()
            .find(|spec| spec.field == field)
            .map(|spec| spec.index)
    }

    /// 校验映射表
    ///
    /// # 规则
    /// 1. 序号必须为 0..n 连续递增
    /// 2. 每个字段恰好出现一次（不缺、不重）
    pub fn validate(&self) -> ImportResult<()> {
        for (position, spec) in self.columns.iter().enumerate() {
            if spec.index != position {
                return Err(ImportError::SchemaInvalid(format!(
                    "第 {} 项的列序号为 {}，期望 {}",
                    position, spec.index, position
                )));
            }
        }

        let mut seen = HashSet::new();
        for spec in &self.columns {
            if !seen.insert(spec.field) {
                return Err(ImportError::SchemaInvalid(format!(
                    "字段 {} 重复映射（列 {}）",
                    spec.field.name(),
                    spec.index
                )));
            }
        }

        if let Some(missing) = TransactionField::ALL
            .iter()
            .find(|field| !seen.contains(*field))
        {
            return Err(ImportError::SchemaInvalid(format!(
                "字段 {} 未映射",
                missing.name()
            )));
        }

        Ok(())
    }

    /// 校验表头宽度（表头列数不得少于映射表列数）
    pub fn check_header_width(&self, header_width: usize) -> ImportResult<()> {
        if header_width < self.width() {
            return Err(ImportError::LayoutMismatch {
                expected: self.width(),
                found: header_width,
            });
        }
        Ok(())
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::standard()
    }
}
