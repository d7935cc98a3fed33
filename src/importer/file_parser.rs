// ==========================================
// POS 交易通知中继 - 文件解析器实现
// ==========================================
// 职责: 上传字节 → TabularSheet（仅第一个工作表）
// 支持: Excel (.xlsx) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::tabular_reader::{MemorySheet, SheetRow, TabularSheet};
use calamine::{Data, DataType, Range, Reader, Xlsx};
use chrono::Timelike;
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::debug;

/// xlsx 为 zip 容器,以 PK\x03\x04 开头
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

// ==========================================
// Excel Sheet 实现
// ==========================================
// 单元格按绝对坐标寻址（calamine 的 Range 从首个非空单元格开始）
pub struct ExcelSheet {
    range: Range<Data>,
}

impl ExcelSheet {
    /// 从 xlsx 字节读取第一个工作表
    pub fn from_bytes(bytes: &[u8]) -> ImportResult<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        debug!(sheet = %sheet_name, end = ?range.end(), "工作表读取完成");

        Ok(Self { range })
    }

    fn last_column(&self) -> Option<u32> {
        self.range.end().map(|(_, col)| col)
    }
}

impl TabularSheet for ExcelSheet {
    fn row_count(&self) -> usize {
        self.range
            .end()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(0)
    }

    fn row(&self, index: usize) -> Option<SheetRow> {
        let last_column = self.last_column()?;
        let row_index = u32::try_from(index).ok()?;

        let row: SheetRow = (0..=last_column)
            .map(|col| self.range.get_value((row_index, col)).and_then(cell_text))
            .collect();

        if row.is_blank() {
            None
        } else {
            Some(row)
        }
    }
}

/// 单元格 → 文本（空单元格/错误单元格视为缺失）
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        // 整数值浮点显示为 "1234",小数保持 "12.34"
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(_) => cell.as_datetime().map(|dt| {
            if dt.num_seconds_from_midnight() == 0 {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

// ==========================================
// CSV Sheet 实现
// ==========================================
// 与 Excel 相同的固定列布局,首行为表头
pub struct CsvSheet;

impl CsvSheet {
    pub fn from_bytes(bytes: &[u8]) -> ImportResult<MemorySheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            // CSV 无法区分空单元格与缺失单元格,统一视为缺失
            let row: SheetRow = record
                .iter()
                .map(|value| (!value.is_empty()).then(|| value.to_string()))
                .collect();

            rows.push((!row.is_blank()).then_some(row));
        }

        Ok(MemorySheet::new(rows))
    }
}

// ==========================================
// 文件格式识别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    /// 按扩展名识别,无扩展名时按内容识别
    pub fn detect(file_name: Option<&str>, bytes: &[u8]) -> ImportResult<Self> {
        let ext = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase());

        match ext.as_deref() {
            Some("xlsx") => Ok(SheetFormat::Xlsx),
            Some("csv") => Ok(SheetFormat::Csv),
            Some(other) => Err(ImportError::UnsupportedFormat(other.to_string())),
            None if bytes.starts_with(ZIP_MAGIC) => Ok(SheetFormat::Xlsx),
            None => Ok(SheetFormat::Csv),
        }
    }
}

/// 通用加载入口（根据格式自动选择解析器）
pub fn load_sheet(file_name: Option<&str>, bytes: &[u8]) -> ImportResult<Box<dyn TabularSheet>> {
    match SheetFormat::detect(file_name, bytes)? {
        SheetFormat::Xlsx => Ok(Box::new(ExcelSheet::from_bytes(bytes)?)),
        SheetFormat::Csv => Ok(Box::new(CsvSheet::from_bytes(bytes)?)),
    }
}
