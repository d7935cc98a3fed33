// ==========================================
// POS 交易通知中继 - 表格读取接口
// ==========================================
// 职责: 定义导入层消费的表格能力（不包含实现）
// 能力: 行数 / 按索引取行（可空）/ 按列取单元格（可空,文本化）
// 实现者: ExcelSheet, CsvSheet
// ==========================================

// ==========================================
// SheetRow - 单行单元格
// ==========================================
// None 表示单元格缺失（含空单元格/错误单元格）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: Vec<Option<String>>,
}

impl SheetRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// 按列序号取单元格文本（超出行宽视为缺失）
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }

    /// 行宽: 最后一个非空单元格序号 + 1
    pub fn width(&self) -> usize {
        self.cells
            .iter()
            .rposition(Option::is_some)
            .map(|last| last + 1)
            .unwrap_or(0)
    }

    /// 整行无任何单元格
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl<S: Into<String>> FromIterator<Option<S>> for SheetRow {
    fn from_iter<I: IntoIterator<Item = Option<S>>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|c| c.map(Into::into)).collect())
    }
}

// ==========================================
// TabularSheet Trait
// ==========================================
// 用途: 单工作表的只读视图（第 0 行为表头）
pub trait TabularSheet: Send + Sync {
    /// 行数: 最后一个有数据行的索引 + 1（含表头）
    fn row_count(&self) -> usize;

    /// 按索引取行
    ///
    /// # 返回
    /// - Some(SheetRow): 该行至少有一个单元格
    /// - None: 该行完全缺失
    fn row(&self, index: usize) -> Option<SheetRow>;
}

// ==========================================
// MemorySheet - 内存表格
// ==========================================
// 用途: CSV 解析结果承载 / 测试构造
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    rows: Vec<Option<SheetRow>>,
}

impl MemorySheet {
    pub fn new(rows: Vec<Option<SheetRow>>) -> Self {
        // 尾部空行不计入行数
        let mut rows = rows;
        while matches!(rows.last(), Some(None)) {
            rows.pop();
        }
        Self { rows }
    }
}

impl TabularSheet for MemorySheet {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<SheetRow> {
        self.rows.get(index).cloned().flatten()
    }
}
