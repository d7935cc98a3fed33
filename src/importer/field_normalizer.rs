// ==========================================
// POS 交易通知中继 - 字段规范化
// ==========================================
// 职责: 单元格原始文本 → 类型化值（金额/日期/布尔/标识）
// 约定: 入参 None 表示单元格缺失,Some("") 表示存在但为空
// ==========================================

use crate::importer::error::FieldError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// 传输日期的唯一接受格式（yyyy-MM-dd）
pub const TRANSMISSION_DATE_FORMAT: &str = "%Y-%m-%d";

/// 本地时间默认值格式（HHmmss）
pub const LOCAL_TIME_FORMAT: &str = "%H%M%S";

/// 金额 → 最小货币单位（×100）
///
/// # 规则
/// - 缺失或空字符串 → 0
/// - 否则按不变区域解析后 ×100（小数点为 '.',',' 为千分位分隔符）
/// - 非空且无法解析 → InvalidAmount
pub fn parse_amount_to_minor_units(text: Option<&str>) -> Result<Decimal, FieldError> {
    let raw = match text {
        None => return Ok(Decimal::ZERO),
        Some(t) if t.is_empty() => return Ok(Decimal::ZERO),
        Some(t) => t,
    };

    let digits: String = raw.trim().chars().filter(|c| *c != ',').collect();

    Decimal::from_str(&digits)
        .ok()
        .and_then(|value| value.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| FieldError::InvalidAmount(raw.to_string()))
}

/// 解析传输日期,失败时回退到批次起始时刻
///
/// # 规则
/// - 仅接受 yyyy-MM-dd（月、日固定两位,不允许多余内容）
/// - 解析结果无时区信息,按 UTC 零点处理,不做偏移换算
/// - 缺失/空/格式不符 → fallback
pub fn resolve_transmission_date(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(parse_exact_date)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
        .unwrap_or(fallback)
}

fn parse_exact_date(text: &str) -> Option<NaiveDate> {
    // chrono 的 %Y 接受多于 4 位、%m/%d 接受单位数,先按固定位置校验字符
    let shape_ok = text.len() == 10
        && text.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, TRANSMISSION_DATE_FORMAT).ok()
}

/// 布尔值强制转换（true/false,不区分大小写）
///
/// 缺失单元格同样视为错误,不做默认
pub fn coerce_boolean(text: Option<&str>) -> Result<bool, FieldError> {
    let normalized = text.map(|t| t.trim().to_ascii_lowercase());
    match normalized.as_deref() {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        _ => Err(FieldError::InvalidBoolean(text.map(str::to_string))),
    }
}

/// 64 位整数标识（id / agentAccountId）
pub fn parse_identity(text: Option<&str>) -> Result<i64, FieldError> {
    text.and_then(|t| t.trim().parse::<i64>().ok())
        .ok_or_else(|| FieldError::InvalidIdentity(text.map(str::to_string)))
}

/// 自由文本: 缺失 → 空字符串,存在 → 原样保留
pub fn free_text(text: Option<&str>) -> String {
    text.map(str::to_string).unwrap_or_default()
}

/// 本地时间: 缺失时使用批次起始时刻（HHmmss）
pub fn local_time_or_default(text: Option<&str>, batch_started_at: DateTime<Utc>) -> String {
    match text {
        Some(t) => t.to_string(),
        None => batch_started_at.format(LOCAL_TIME_FORMAT).to_string(),
    }
}
