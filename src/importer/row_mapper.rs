// ==========================================
// POS 交易通知中继 - 行映射器实现
// ==========================================
// 职责: 单行单元格 → TransactionRecord（仅按列序号寻址,不绑定表头名称）
// 依据: ColumnSchema 列映射表 + field_normalizer 规范化规则
// ==========================================

use crate::domain::TransactionRecord;
use crate::importer::column_schema::{ColumnRule, ColumnSchema, TransactionField};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_normalizer::{
    coerce_boolean, free_text, local_time_or_default, parse_amount_to_minor_units,
    parse_identity, resolve_transmission_date,
};
use crate::importer::tabular_reader::SheetRow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// ==========================================
// FieldValue - 单列解码结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Identity(i64),
    Text(String),
    Amount(Decimal),
    Instant(DateTime<Utc>),
    Flag(bool),
}

/// 按字段收集的解码值（下标 = 字段声明序号）
struct DecodedRow {
    values: Vec<Option<FieldValue>>,
}

impl DecodedRow {
    fn new() -> Self {
        Self {
            values: vec![None; TransactionField::ALL.len()],
        }
    }

    fn put(&mut self, field: TransactionField, value: FieldValue) {
        self.values[field as usize] = Some(value);
    }

    fn take(&mut self, field: TransactionField) -> Option<FieldValue> {
        self.values[field as usize].take()
    }

    // 映射表已校验,每个字段恰好解码一次;以下取值的兜底分支不可达

    fn text(&mut self, field: TransactionField) -> String {
        match self.take(field) {
            Some(FieldValue::Text(s)) => s,
            _ => String::new(),
        }
    }

    fn identity(&mut self, field: TransactionField) -> i64 {
        match self.take(field) {
            Some(FieldValue::Identity(v)) => v,
            _ => 0,
        }
    }

    fn amount(&mut self, field: TransactionField) -> Decimal {
        match self.take(field) {
            Some(FieldValue::Amount(v)) => v,
            _ => Decimal::ZERO,
        }
    }

    fn instant(&mut self, field: TransactionField, fallback: DateTime<Utc>) -> DateTime<Utc> {
        match self.take(field) {
            Some(FieldValue::Instant(v)) => v,
            _ => fallback,
        }
    }

    fn flag(&mut self, field: TransactionField) -> bool {
        matches!(self.take(field), Some(FieldValue::Flag(true)))
    }
}

// ==========================================
// RowMapper - 行映射器
// ==========================================
// 映射表在构造时校验,map_row 不会遇到缺失或重复字段
#[derive(Debug, Clone, Default)]
pub struct RowMapper {
    schema: ColumnSchema,
}

impl RowMapper {
    /// 使用自定义映射表构造
    ///
    /// # 返回
    /// - Err(SchemaInvalid): 列序号不连续、字段缺失或重复
    pub fn new(schema: ColumnSchema) -> ImportResult<Self> {
        schema.validate()?;
        Ok(Self { schema })
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// 将一行映射为 TransactionRecord
    ///
    /// # 参数
    /// - row: 行单元格（调用方已跳过完全缺失的行）
    /// - row_index: 行号（0 为表头,用于错误定位）
    /// - batch_started_at: 批次起始时刻（日期回退/本地时间默认值）
    ///
    /// # 返回
    /// - Err(RowMappingError): 任一列规范化失败
    pub fn map_row(
        &self,
        row: &SheetRow,
        row_index: usize,
        batch_started_at: DateTime<Utc>,
    ) -> ImportResult<TransactionRecord> {
        let mut decoded = DecodedRow::new();

        for spec in self.schema.columns() {
            let raw = row.cell(spec.index);
            let value = match spec.field.rule() {
                ColumnRule::Identity => parse_identity(raw).map(FieldValue::Identity),
                ColumnRule::Text => Ok(FieldValue::Text(free_text(raw))),
                ColumnRule::Amount => parse_amount_to_minor_units(raw).map(FieldValue::Amount),
                ColumnRule::TransmissionDate => Ok(FieldValue::Instant(
                    resolve_transmission_date(raw, batch_started_at),
                )),
                ColumnRule::LocalTime => Ok(FieldValue::Text(local_time_or_default(
                    raw,
                    batch_started_at,
                ))),
                ColumnRule::Flag => coerce_boolean(raw).map(FieldValue::Flag),
            }
            .map_err(|cause| ImportError::RowMappingError {
                row_index,
                column: spec.index,
                field: spec.field.name(),
                cause,
            })?;

            decoded.put(spec.field, value);
        }

        Ok(Self::assemble(decoded, batch_started_at))
    }

    fn assemble(mut d: DecodedRow, batch_started_at: DateTime<Utc>) -> TransactionRecord {
        use TransactionField as F;

        TransactionRecord {
            id: d.identity(F::Id),
            agent_account_id: d.identity(F::AgentAccountId),
            msg_type: d.text(F::MsgType),
            card_no: d.text(F::CardNo),
            proc_code: d.text(F::ProcCode),
            balance: d.text(F::Balance),
            amount: d.amount(F::Amount),
            transmission_date_time: d.instant(F::TransmissionDateTime, batch_started_at),
            transaction_type: d.text(F::TransactionType),
            customer_num: d.text(F::CustomerNum),
            stan: d.text(F::Stan),
            local_time: d.text(F::LocalTime),
            local_date: d.text(F::LocalDate),
            merch_type: d.text(F::MerchType),
            pos_entry_mode: d.text(F::PosEntryMode),
            card_sequence_no: d.text(F::CardSequenceNo),
            pos_condition_code: d.text(F::PosConditionCode),
            pos_pin_capture_code: d.text(F::PosPinCaptureCode),
            surcharge: d.text(F::Surcharge),
            acq_inst_id: d.text(F::AcqInstId),
            acquirer_id: d.text(F::AcquirerId),
            fwd_inst_id: d.text(F::FwdInstId),
            ret_ref_no: d.text(F::RetRefNo),
            track2: d.text(F::Track2),
            service_restriction_code: d.text(F::ServiceRestrictionCode),
            terminal_id: d.text(F::TerminalId),
            merchant_name: d.text(F::MerchantName),
            merchant_loc: d.text(F::MerchantLoc),
            merchant_address: d.text(F::MerchantAddress),
            merchant_ext_id: d.text(F::MerchantExtId),
            status_code: d.text(F::StatusCode),
            exp_date: d.text(F::ExpDate),
            currency_code: d.text(F::CurrencyCode),
            pin_data: d.text(F::PinData),
            icc_data: d.text(F::IccData),
            msg_reason_code: d.text(F::MsgReasonCode),
            pos_data_code: d.text(F::PosDataCode),
            response_code: d.text(F::ResponseCode),
            auth_num: d.text(F::AuthNum),
            reversed: d.text(F::Reversed),
            completed: d.text(F::Completed),
            created_on: d.text(F::CreatedOn),
            masked_pan: d.text(F::MaskedPan),
            card_holder_name: d.text(F::CardHolderName),
            card_type_name: d.text(F::CardTypeName),
            account_type: d.text(F::AccountType),
            authentication_method: d.text(F::AuthenticationMethod),
            notified: d.text(F::Notified),
            latency: d.text(F::Latency),
            total_sales: d.text(F::TotalSales),
            sales_amt: d.text(F::SalesAmt),
            sales_id: d.text(F::SalesId),
            user_name: d.text(F::UserName),
            response_message: d.text(F::ResponseMessage),
            pos_response_code: d.text(F::PosResponseCode),
            pos_response_message: d.text(F::PosResponseMessage),
            processor_response_code: d.text(F::ProcessorResponseCode),
            overall_status_code: d.text(F::OverallStatusCode),
            receipt_printed: d.flag(F::ReceiptPrinted),
            app_channel: d.text(F::AppChannel),
        }
    }
}
