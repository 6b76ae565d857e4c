//! xlsx 工作簿存储 - 基础设施层
//!
//! 唯一持有结果文件的组件：打开或新建工作簿，追加一行，整体写回

use crate::error::StorageError;
use crate::infrastructure::row_store::RowStore;
use crate::models::row::{ColumnLayout, WorkbookRow};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// 表头所在行（从 1 开始）
const HEADER_ROW: u32 = 1;

/// xlsx 工作簿存储
///
/// 每次追加都是完整的 读取 → 修改 → 写回，
/// 互斥锁保证同一进程内的并发提交不会互相覆盖。
pub struct XlsxWorkbookStore {
    path: PathBuf,
    sheet_name: String,
    lock: Mutex<()>,
}

impl XlsxWorkbookStore {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name: sheet_name.into(),
            lock: Mutex::new(()),
        }
    }

    /// 读取工作表中的所有行（含表头），空单元格为空字符串
    pub fn read_rows(&self) -> Result<Vec<Vec<String>>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let book = umya_spreadsheet::reader::xlsx::read(&self.path)
            .map_err(|e| StorageError::read_failed(self.location(), e))?;
        let sheet = book
            .get_sheet_by_name(&self.sheet_name)
            .ok_or_else(|| self.sheet_missing())?;

        let max_row = sheet.get_highest_row();
        let max_col = sheet.get_highest_column();
        Ok((1..=max_row)
            .map(|r| (1..=max_col).map(|c| sheet.get_value((c, r))).collect())
            .collect())
    }

    /// 打开已有工作簿；文件不存在时新建一个只含目标工作表的空工作簿
    fn load_or_init(&self) -> Result<Spreadsheet, StorageError> {
        match std::fs::metadata(&self.path) {
            Ok(_) => umya_spreadsheet::reader::xlsx::read(&self.path)
                .map_err(|e| StorageError::read_failed(self.location(), e)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("📄 结果文件不存在，新建工作簿: {}", self.location());
                let mut book = umya_spreadsheet::new_file_empty_worksheet();
                book.new_sheet(&self.sheet_name)
                    .map_err(|e| StorageError::write_failed(self.location(), e))?;
                Ok(book)
            }
            Err(e) => Err(StorageError::read_failed(self.location(), e)),
        }
    }

    fn sheet_missing(&self) -> StorageError {
        StorageError::SheetMissing {
            path: self.location(),
            sheet: self.sheet_name.clone(),
        }
    }
}

impl RowStore for XlsxWorkbookStore {
    fn append_row(&self, layout: &ColumnLayout, row: &WorkbookRow) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut book = self.load_or_init()?;
        let sheet = book
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| self.sheet_missing())?;

        let row_index = append_to_sheet(sheet, layout, row);
        debug!("写入第 {} 行: {}", row_index, self.location());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::write_failed(self.location(), e))?;
        }
        umya_spreadsheet::writer::xlsx::write(&book, &self.path)
            .map_err(|e| StorageError::write_failed(self.location(), e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// 读取表头：第一行从左到右，去掉末尾的空单元格
fn read_header(sheet: &Worksheet) -> Vec<String> {
    let mut header: Vec<String> = (1..=sheet.get_highest_column())
        .map(|c| sheet.get_value((c, HEADER_ROW)))
        .collect();
    while header.last().is_some_and(|h| h.is_empty()) {
        header.pop();
    }
    header
}

fn write_text(sheet: &mut Worksheet, col_index: usize, row: u32, value: &str) {
    let col = u32::try_from(col_index + 1).unwrap_or(u32::MAX);
    sheet.get_cell_mut((col, row)).set_value_string(value);
}

/// 把一行追加到工作表末尾，返回写入的行号
///
/// 表头为空时写入布局的表头；行中有表头里没有的列时追加到表头末尾。
fn append_to_sheet(sheet: &mut Worksheet, layout: &ColumnLayout, row: &WorkbookRow) -> u32 {
    let mut header = read_header(sheet);
    if header.is_empty() {
        header = layout.headers();
        for (i, name) in header.iter().enumerate() {
            write_text(sheet, i, HEADER_ROW, name);
        }
    }

    let row_index = sheet.get_highest_row().max(HEADER_ROW) + 1;
    for (column, value) in row.cells() {
        let col_index = match header.iter().position(|h| h == column) {
            Some(i) => i,
            None => {
                warn!("⚠️ 表头中没有列 {}，追加到表头末尾", column);
                header.push(column.clone());
                let i = header.len() - 1;
                write_text(sheet, i, HEADER_ROW, column);
                i
            }
        };
        write_text(sheet, col_index, row_index, value);
    }
    row_index
}
