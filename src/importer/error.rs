// ==========================================
// POS 交易通知中继 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 策略: 任一行映射失败即中止整个文件（全有或全无）
// ==========================================

use thiserror::Error;

/// 单元格值的展示形式（缺失单元格显示为 <空>）
fn display_cell(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("\"{}\"", v),
        None => "<空>".to_string(),
    }
}

/// 字段级规范化错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("金额格式无效: \"{0}\"")]
    InvalidAmount(String),

    #[error("布尔值无效: {}（期望 true/false）", display_cell(.0))]
    InvalidBoolean(Option<String>),

    #[error("标识字段无效: {}（期望 64 位整数）", display_cell(.0))]
    InvalidIdentity(Option<String>),
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 列布局错误 =====
    #[error("列映射表无效: {0}")]
    SchemaInvalid(String),

    #[error("列布局不匹配: 表头仅有 {found} 列，至少需要 {expected} 列")]
    LayoutMismatch { expected: usize, found: usize },

    // ===== 行映射错误 =====
    #[error("行映射失败 (行 {row_index}, 列 {column} {field}): {cause}")]
    RowMappingError {
        row_index: usize,
        column: usize,
        field: &'static str,
        #[source]
        cause: FieldError,
    },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl ImportError {
    /// 文件整体不可读（格式/容器/编码错误）,区别于读到中途的行级失败
    pub fn is_unreadable_file(&self) -> bool {
        matches!(
            self,
            ImportError::FileReadError(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
        )
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
