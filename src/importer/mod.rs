// ==========================================
// POS 交易通知中继 - 导入层
// ==========================================
// 职责: 上传文件 → 有序 TransactionRecord 列表
// 支持: Excel (.xlsx), CSV
// 流程: 解析 → 列映射表校验 → 逐行映射（规范化）
// ==========================================

// 模块声明
pub mod batch_extractor;
pub mod column_schema;
pub mod error;
pub mod field_normalizer;
pub mod file_parser;
pub mod row_mapper;
pub mod tabular_reader;

// 重导出核心类型
pub use batch_extractor::{BatchExtractor, Clock, FixedClock, SystemClock};
pub use column_schema::{ColumnRule, ColumnSchema, ColumnSpec, TransactionField};
pub use error::{FieldError, ImportError, ImportResult};
pub use file_parser::{load_sheet, CsvSheet, ExcelSheet, SheetFormat};
pub use row_mapper::RowMapper;

// 重导出 Trait 接口
pub use tabular_reader::{MemorySheet, SheetRow, TabularSheet};
