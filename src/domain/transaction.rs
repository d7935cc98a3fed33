// ==========================================
// POS 交易通知中继 - 交易领域模型
// ==========================================
// 职责: 交易记录（导入层产出、分发层消费）与批次结果
// 红线: 记录构造后不可变,分发层只做归类不做修改
// ==========================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// TransactionRecord - 标准化交易记录
// ==========================================
// 用途: 每个数据行映射为一条记录,逐笔推送下游
// 对齐: 下游通知接口 JSON 结构（camelCase,金额键名为 amt）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    // ===== 标识 =====
    pub id: i64,               // 交易 ID（列 59）
    pub agent_account_id: i64, // 代理账户 ID（列 0）

    // ===== 报文/卡信息 =====
    pub msg_type: String,
    pub card_no: String,
    pub proc_code: String,
    pub balance: String,

    // ===== 金额（最小货币单位,×100）=====
    #[serde(rename = "amt", with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,

    // ===== 时间 =====
    pub transmission_date_time: DateTime<Utc>, // 传输时间（UTC）
    pub transaction_type: String,
    pub customer_num: String,
    pub stan: String,
    pub local_time: String, // 本地时间（HHmmss,不解析）
    pub local_date: String, // 本地日期（不解析）

    // ===== POS 终端与收单 =====
    pub merch_type: String,
    pub pos_entry_mode: String,
    pub card_sequence_no: String,
    pub pos_condition_code: String,
    pub pos_pin_capture_code: String,
    pub surcharge: String,
    pub acq_inst_id: String,
    pub acquirer_id: String,
    pub fwd_inst_id: String,
    pub ret_ref_no: String,
    pub track2: String,
    pub service_restriction_code: String,
    pub terminal_id: String,

    // ===== 商户 =====
    pub merchant_name: String,
    pub merchant_loc: String,
    pub merchant_address: String,
    pub merchant_ext_id: String,

    // ===== 处理结果 =====
    pub status_code: String,
    pub exp_date: String,
    pub currency_code: String,
    pub pin_data: String,
    pub icc_data: String,
    pub msg_reason_code: String,
    pub pos_data_code: String,
    pub response_code: String,
    pub auth_num: String,
    pub reversed: String,
    pub completed: String,
    pub created_on: String,
    pub masked_pan: String,
    pub card_holder_name: String,
    pub card_type_name: String,
    pub account_type: String,
    pub authentication_method: String,
    pub notified: String,
    pub latency: String,
    pub total_sales: String,
    pub sales_amt: String,
    pub sales_id: String,
    pub user_name: String,
    pub response_message: String,
    pub pos_response_code: String,
    pub pos_response_message: String,
    pub processor_response_code: String,
    pub overall_status_code: String,

    // ===== 终端标记 =====
    pub receipt_printed: bool,
    pub app_channel: String,
}

// ==========================================
// DispatchOutcome - 单笔分发结果
// ==========================================
// 成功只计数,失败原样带回记录
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Success,
    Failure(TransactionRecord),
}

// ==========================================
// BatchResult - 批次分发结果
// ==========================================
// 不变量: successful_count + failed_data.len() == 输入记录数
// 不变量: failed_data 保持输入相对顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub failed_data: Vec<TransactionRecord>,
    pub successful_count: usize,
}

impl BatchResult {
    /// 空结果（空文件/无数据行时返回）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 本批次处理的记录总数
    pub fn total(&self) -> usize {
        self.successful_count + self.failed_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl FromIterator<DispatchOutcome> for BatchResult {
    fn from_iter<I: IntoIterator<Item = DispatchOutcome>>(outcomes: I) -> Self {
        outcomes
            .into_iter()
            .fold(BatchResult::empty(), |mut result, outcome| {
                match outcome {
                    DispatchOutcome::Success => result.successful_count += 1,
                    DispatchOutcome::Failure(record) => result.failed_data.push(record),
                }
                result
            })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// 构造一条最小测试记录
    pub fn sample_record(id: i64) -> TransactionRecord {
        TransactionRecord {
            id,
            agent_account_id: 1001,
            msg_type: "0200".to_string(),
            card_no: String::new(),
            proc_code: String::new(),
            balance: String::new(),
            amount: Decimal::from(1234),
            transmission_date_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            transaction_type: String::new(),
            customer_num: String::new(),
            stan: String::new(),
            local_time: "101500".to_string(),
            local_date: String::new(),
            merch_type: String::new(),
            pos_entry_mode: String::new(),
            card_sequence_no: String::new(),
            pos_condition_code: String::new(),
            pos_pin_capture_code: String::new(),
            surcharge: String::new(),
            acq_inst_id: String::new(),
            acquirer_id: String::new(),
            fwd_inst_id: String::new(),
            ret_ref_no: String::new(),
            track2: String::new(),
            service_restriction_code: String::new(),
            terminal_id: "2058TID1".to_string(),
            merchant_name: String::new(),
            merchant_loc: String::new(),
            merchant_address: String::new(),
            merchant_ext_id: String::new(),
            status_code: String::new(),
            exp_date: String::new(),
            currency_code: "566".to_string(),
            pin_data: String::new(),
            icc_data: String::new(),
            msg_reason_code: String::new(),
            pos_data_code: String::new(),
            response_code: "00".to_string(),
            auth_num: String::new(),
            reversed: String::new(),
            completed: String::new(),
            created_on: String::new(),
            masked_pan: String::new(),
            card_holder_name: String::new(),
            card_type_name: String::new(),
            account_type: String::new(),
            authentication_method: String::new(),
            notified: String::new(),
            latency: String::new(),
            total_sales: String::new(),
            sales_amt: String::new(),
            sales_id: String::new(),
            user_name: String::new(),
            response_message: String::new(),
            pos_response_code: String::new(),
            pos_response_message: String::new(),
            processor_response_code: String::new(),
            overall_status_code: String::new(),
            receipt_printed: true,
            app_channel: "POS".to_string(),
        }
    }
}
