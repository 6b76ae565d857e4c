//! 提交处理服务 - 业务能力层
//!
//! 校验 → 创建用户目录 → 展开成行 → 交给行存储

use crate::error::{AppResult, StorageError};
use crate::infrastructure::RowStore;
use crate::models::row::ColumnLayout;
use crate::models::submission::{Submission, SubmitRequest};
use crate::services::question_store::QuestionStore;
use crate::utils::logging::truncate_text;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 提交处理服务
///
/// 职责：
/// - 按题目数量校验提交
/// - 创建 `<data_dir>/<username>` 目录（幂等，只是副作用）；
///   与结果文件同名的用户名在校验阶段就被拒绝
/// - 把提交展开成一行并写入存储
///
/// 校验失败时不产生任何副作用；写入失败时不回滚已创建的目录。
pub struct SubmissionService {
    questions: Arc<QuestionStore>,
    layout: Arc<ColumnLayout>,
    data_dir: PathBuf,
    reserved_names: Vec<String>,
    store: Arc<dyn RowStore>,
}

impl SubmissionService {
    pub fn new(
        questions: Arc<QuestionStore>,
        layout: ColumnLayout,
        data_dir: impl Into<PathBuf>,
        reserved_names: Vec<String>,
        store: Arc<dyn RowStore>,
    ) -> Self {
        Self {
            questions,
            layout: Arc::new(layout),
            data_dir: data_dir.into(),
            reserved_names,
            store,
        }
    }

    /// 处理一次提交
    pub async fn submit(&self, request: SubmitRequest) -> AppResult<()> {
        let submission = match request.validate(self.questions.len(), &self.reserved_names) {
            Ok(s) => s,
            Err(e) => {
                warn!("❌ 提交数据不合法: {}", e);
                return Err(e.into());
            }
        };

        debug!(
            "[用户 {}] 答案: {}",
            submission.username,
            truncate_text(&submission.answers.join(" | "), 120)
        );

        self.ensure_user_dir(&submission).await?;
        self.append(&submission).await?;

        info!(
            "[用户 {}] ✓ 已保存提交 → {}",
            submission.username,
            self.store.location()
        );
        Ok(())
    }

    async fn ensure_user_dir(&self, submission: &Submission) -> Result<(), StorageError> {
        let user_dir = self.data_dir.join(&submission.username);
        tokio::fs::create_dir_all(&user_dir)
            .await
            .map_err(|source| StorageError::CreateDirFailed {
                path: user_dir.display().to_string(),
                source,
            })
    }

    async fn append(&self, submission: &Submission) -> Result<(), StorageError> {
        let row = self.layout.flatten(submission);
        let layout = Arc::clone(&self.layout);
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || store.append_row(&layout, &row))
            .await
            .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }
}
