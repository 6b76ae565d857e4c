//! # Survey Submit
//!
//! 一个收集问卷答案并写入 xlsx 表格的小型 Web 服务
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有结果文件，只暴露"追加一行"的能力
//! - `RowStore` - 行存储接口
//! - `XlsxWorkbookStore` - xlsx 工作簿实现，带进程内互斥锁
//!
//! ### ② 业务能力层（Services）
//! - `QuestionStore` - 启动时加载、之后只读的题目列表
//! - `SubmissionService` - 校验 → 创建用户目录 → 写入一行
//!
//! ### ③ 接口层（API）
//! - `GET /questions` - 返回题目列表
//! - `POST /submit` - 提交问卷
//! - 其余路径 - 静态前端
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult, StorageError, ValidationError};
pub use infrastructure::{RowStore, XlsxWorkbookStore};
pub use models::{ColumnLayout, Question, SubmitRequest, Submission, WorkbookRow};
pub use services::{QuestionStore, SubmissionService};
pub use state::AppState;
