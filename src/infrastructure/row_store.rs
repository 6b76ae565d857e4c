//! 行存储接口 - 基础设施层
//!
//! 提交服务只依赖这个接口，不关心底层是 xlsx 文件还是别的东西

use crate::error::StorageError;
use crate::models::row::{ColumnLayout, WorkbookRow};

/// 行存储
///
/// 职责：
/// - 首次写入时按布局建立表头
/// - 追加一行并持久化
///
/// 实现是阻塞式的，调用方负责把它放到阻塞线程池上执行。
pub trait RowStore: Send + Sync {
    /// 追加一行数据
    fn append_row(&self, layout: &ColumnLayout, row: &WorkbookRow) -> Result<(), StorageError>;

    /// 存储位置描述（用于日志）
    fn location(&self) -> String;
}
