use serde::{Deserialize, Serialize};

/// 问卷题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub question: String,
}

impl Question {
    pub fn new(number: u32, question: impl Into<String>) -> Self {
        Self {
            number,
            question: question.into(),
        }
    }

    /// 该题在结果表格中的列名，例如 `Q3`
    pub fn column_name(&self) -> String {
        format!("Q{}", self.number)
    }
}

/// TOML 题目文件的顶层结构
///
/// ```toml
/// [[questions]]
/// number = 1
/// question = "Câți ani ai?"
/// ```
#[derive(Debug, Deserialize)]
pub(crate) struct QuestionFile {
    pub questions: Vec<Question>,
}
