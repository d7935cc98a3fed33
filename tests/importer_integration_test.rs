// ==========================================
// 导入层集成测试（真实 xlsx / CSV 字节）
// ==========================================

use chrono::{TimeZone, Utc};
use pos_txn_relay::importer::{load_sheet, BatchExtractor, FieldError, FixedClock, ImportError};
use rust_decimal::Decimal;
use std::sync::Arc;

use test_helpers::{build_csv, build_workbook, build_workbook_with_header, TestRow};

fn fixed_extractor() -> BatchExtractor {
    let started_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    BatchExtractor::new().with_clock(Arc::new(FixedClock(started_at)))
}

#[test]
fn test_xlsx_extraction_normalizes_fields() {
    let bytes = build_workbook(&[Some(TestRow::valid(7).text(24, "2058TID1"))]).unwrap();
    let sheet = load_sheet(Some("batch.xlsx"), &bytes).unwrap();

    let records = fixed_extractor().extract(sheet.as_ref()).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, 7);
    assert_eq!(record.agent_account_id, 1001);
    assert_eq!(record.msg_type, "0200");
    assert_eq!(record.amount, Decimal::from(1234));
    assert_eq!(
        record.transmission_date_time,
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(record.local_time, "101500");
    assert_eq!(record.local_date, "0301");
    assert!(record.receipt_printed);
    assert_eq!(record.app_channel, "POS");
    assert_eq!(record.terminal_id, "2058TID1");
    // 未填写的文本列为空串
    assert_eq!(record.card_no, "");
}

#[test]
fn test_xlsx_date_cell_resolves_to_calendar_date() {
    let bytes = build_workbook(&[Some(TestRow::valid(1).date(6, 2024, 5, 6))]).unwrap();
    let sheet = load_sheet(Some("batch.xlsx"), &bytes).unwrap();

    let records = fixed_extractor().extract(sheet.as_ref()).unwrap();

    assert_eq!(
        records[0].transmission_date_time,
        Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_missing_amount_and_unparseable_date() {
    let started_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let bytes = build_workbook(&[
        Some(TestRow::valid(1).clear(5).text(6, "not-a-date").clear(10)),
        Some(TestRow::valid(2).clear(6)),
    ])
    .unwrap();
    let sheet = load_sheet(Some("batch.xlsx"), &bytes).unwrap();

    let records = fixed_extractor().extract(sheet.as_ref()).unwrap();

    assert_eq!(records[0].amount, Decimal::ZERO);
    assert_eq!(records[0].transmission_date_time, started_at);
    assert_eq!(records[0].local_time, "030405");
    assert_eq!(records[1].transmission_date_time, started_at);
}

#[test]
fn test_blank_rows_are_skipped() {
    let bytes = build_workbook(&[
        Some(TestRow::valid(1)),
        None,
        Some(TestRow::valid(2)),
        None,
        Some(TestRow::valid(3)),
    ])
    .unwrap();
    let sheet = load_sheet(Some("batch.xlsx"), &bytes).unwrap();

    let ids: Vec<i64> = fixed_extractor()
        .extract(sheet.as_ref())
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();

    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_invalid_boolean_fails_whole_file() {
    let bytes = build_workbook(&[
        Some(TestRow::valid(1)),
        Some(TestRow::valid(2).text(57, "maybe")),
    ])
    .unwrap();
    let sheet = load_sheet(Some("batch.xlsx"), &bytes).unwrap();

    let err = fixed_extractor().extract(sheet.as_ref()).unwrap_err();

    match err {
        ImportError::RowMappingError {
            row_index,
            column,
            cause,
            ..
        } => {
            assert_eq!(row_index, 2);
            assert_eq!(column, 57);
            assert_eq!(cause, FieldError::InvalidBoolean(Some("maybe".to_string())));
        }
        other => panic!("意外错误: {:?}", other),
    }
}

#[test]
fn test_boolean_cell_type_is_accepted() {
    let bytes = build_workbook(&[Some(TestRow::valid(1).boolean(57, false))]).unwrap();
    let sheet = load_sheet(Some("batch.xlsx"), &bytes).unwrap();

    let records = fixed_extractor().extract(sheet.as_ref()).unwrap();
    assert!(!records[0].receipt_printed);
}

#[test]
fn test_narrow_header_is_rejected() {
    let bytes = build_workbook_with_header(12, &[Some(TestRow::valid(1))]).unwrap();
    let sheet = load_sheet(Some("batch.xlsx"), &bytes).unwrap();

    let err = fixed_extractor().extract(sheet.as_ref()).unwrap_err();
    assert!(matches!(
        err,
        ImportError::LayoutMismatch {
            expected: 60,
            found: 12
        }
    ));
}

#[test]
fn test_extension_less_upload_is_sniffed() {
    let bytes = build_workbook(&[Some(TestRow::valid(9))]).unwrap();
    let sheet = load_sheet(None, &bytes).unwrap();

    let records = fixed_extractor().extract(sheet.as_ref()).unwrap();
    assert_eq!(records[0].id, 9);
}

#[test]
fn test_csv_extraction_uses_same_layout() {
    let bytes = build_csv(&[
        vec![(0, "1001"), (5, "0.5"), (6, "2024-03-01"), (57, "False"), (59, "11")],
        vec![(0, "1002"), (57, "TRUE"), (59, "12")],
    ]);
    let sheet = load_sheet(Some("batch.csv"), &bytes).unwrap();

    let records = fixed_extractor().extract(sheet.as_ref()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].amount, Decimal::from(50));
    assert!(!records[0].receipt_printed);
    assert_eq!(records[1].agent_account_id, 1002);
    assert_eq!(records[1].amount, Decimal::ZERO);
    assert!(records[1].receipt_printed);
}
