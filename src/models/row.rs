//! 结果表格的列布局与数据行

use crate::config::Config;
use crate::models::question::Question;
use crate::models::submission::Submission;

/// 表头布局：姓名列、用户名列、语义答案列，最后是每道题的 `Q<n>` 列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    name_header: String,
    username_header: String,
    answer_headers: Vec<String>,
    question_headers: Vec<String>,
}

impl ColumnLayout {
    pub fn new(
        name_header: impl Into<String>,
        username_header: impl Into<String>,
        answer_headers: Vec<String>,
        questions: &[Question],
    ) -> Self {
        Self {
            name_header: name_header.into(),
            username_header: username_header.into(),
            answer_headers,
            question_headers: questions.iter().map(Question::column_name).collect(),
        }
    }

    /// 根据配置和题目列表构建布局
    pub fn from_config(config: &Config, questions: &[Question]) -> Self {
        Self::new(
            config.name_header.clone(),
            config.username_header.clone(),
            config.answer_headers.clone(),
            questions,
        )
    }

    /// 完整表头，按列顺序
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.len());
        headers.push(self.name_header.clone());
        headers.push(self.username_header.clone());
        headers.extend(self.answer_headers.iter().cloned());
        headers.extend(self.question_headers.iter().cloned());
        headers
    }

    fn len(&self) -> usize {
        2 + self.answer_headers.len() + self.question_headers.len()
    }

    /// 把一份提交展开成一行
    ///
    /// 第 i 个语义列取第 i 个答案（答案不足时留空），
    /// 第 i 道题的 `Q<n>` 列取第 i 个答案。
    /// 因此前几个 `Q<n>` 列与语义列的值有意重复。
    pub fn flatten(&self, submission: &Submission) -> WorkbookRow {
        let answer_at = |i: usize| submission.answers.get(i).cloned().unwrap_or_default();

        let mut cells = Vec::with_capacity(self.len());
        cells.push((self.name_header.clone(), submission.name.clone()));
        cells.push((self.username_header.clone(), submission.username.clone()));
        for (i, header) in self.answer_headers.iter().enumerate() {
            cells.push((header.clone(), answer_at(i)));
        }
        for (i, header) in self.question_headers.iter().enumerate() {
            cells.push((header.clone(), answer_at(i)));
        }

        WorkbookRow { cells }
    }
}

/// 一行数据：列名 → 文本值，保持列顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookRow {
    cells: Vec<(String, String)>,
}

impl WorkbookRow {
    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    /// 按列名取值
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}
