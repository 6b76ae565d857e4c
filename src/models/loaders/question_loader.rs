use crate::error::QuestionLoadError;
use crate::models::question::{Question, QuestionFile};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// 从题目文件加载题目列表，按扩展名选择 JSON 或 TOML
pub async fn load_questions(path: &Path) -> Result<Vec<Question>, QuestionLoadError> {
    let path_display = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| QuestionLoadError::ReadFailed {
            path: path_display.clone(),
            source,
        })?;

    let questions = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => parse_json_questions(&content).map_err(|source| {
            QuestionLoadError::JsonParseFailed {
                path: path_display.clone(),
                source,
            }
        })?,
        Some("toml") => parse_toml_questions(&content).map_err(|source| {
            QuestionLoadError::TomlParseFailed {
                path: path_display.clone(),
                source,
            }
        })?,
        _ => return Err(QuestionLoadError::UnsupportedFormat { path: path_display }),
    };

    ensure_unique_numbers(&questions)?;

    tracing::info!("成功加载 {} 个题目: {}", questions.len(), path_display);
    Ok(questions)
}

/// JSON 格式：`[{"number": 1, "question": "..."}, ...]`
pub fn parse_json_questions(content: &str) -> Result<Vec<Question>, serde_json::Error> {
    serde_json::from_str(content)
}

/// TOML 格式：`[[questions]]` 表数组
pub fn parse_toml_questions(content: &str) -> Result<Vec<Question>, toml::de::Error> {
    let file: QuestionFile = toml::from_str(content)?;
    Ok(file.questions)
}

// 题号决定 Q<n> 列名，重复会产生同名列
fn ensure_unique_numbers(questions: &[Question]) -> Result<(), QuestionLoadError> {
    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.number) {
            return Err(QuestionLoadError::DuplicateNumber { number: q.number });
        }
    }
    Ok(())
}
