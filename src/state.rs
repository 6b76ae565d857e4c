use crate::config::Config;
use crate::infrastructure::RowStore;
use crate::models::row::ColumnLayout;
use crate::services::{QuestionStore, SubmissionService};
use std::sync::Arc;

/// 请求处理共享的服务上下文
///
/// 题目列表只读，存储句柄由外部注入。
#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<QuestionStore>,
    pub submissions: Arc<SubmissionService>,
}

impl AppState {
    pub fn new(config: &Config, questions: Arc<QuestionStore>, store: Arc<dyn RowStore>) -> Self {
        let layout = ColumnLayout::from_config(config, questions.questions());
        let submissions = SubmissionService::new(
            Arc::clone(&questions),
            layout,
            config.data_dir.clone(),
            config.reserved_usernames(),
            store,
        );

        Self {
            questions,
            submissions: Arc::new(submissions),
        }
    }
}
