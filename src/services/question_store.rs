//! 题目仓库 - 业务能力层

use crate::error::QuestionLoadError;
use crate::models::loaders::load_questions;
use crate::models::question::Question;
use std::path::Path;

/// 题目仓库
///
/// 启动时加载一次，之后只读。
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
}

impl QuestionStore {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// 从题目文件加载
    pub async fn load(path: &Path) -> Result<Self, QuestionLoadError> {
        Ok(Self::new(load_questions(path).await?))
    }

    /// 全部题目，保持文件中的顺序
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
