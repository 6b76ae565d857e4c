pub mod row_store;
pub mod xlsx_store;

pub use row_store::RowStore;
pub use xlsx_store::XlsxWorkbookStore;
